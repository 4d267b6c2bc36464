//! Import pipeline: format dispatch plus the semantic validation the
//! parsers themselves never perform.
//!
//! The parsers are best-effort extractors; this layer turns their output
//! (or a pasted JSON document) into something worth persisting, rejecting
//! empty titles, empty exercise lists, and malformed JSON shapes with
//! user-facing messages.

use chrono::{Duration, Local, NaiveDate};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::models::{Exercise, PlanDay, WarmUp, WeeklyPlan, Workout};
use crate::parser::dates::{plan_id, spanish_weekday};
use crate::parser::{
    detect_format, parse_weekly_plan_at, parse_workout_text_at, ImportFormat,
};

/// Emoji/color cycle applied to JSON week plans that carry no markers.
const CYCLE_EMOJIS: [&str; 5] = ["🟢", "🔵", "🟠", "🟣", "🔴"];

/// Validation failures surfaced to the user.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No se encontraron días en el plan semanal")]
    NoDaysInPlan,

    #[error("JSON inválido: {0}")]
    InvalidJson(String),

    #[error("JSON debe tener \"title\", \"session\" o \"week_plan\"")]
    MissingTitle,

    #[error("JSON debe tener \"exercises\" (array)")]
    MissingExercises,

    #[error("Ejercicio {index}: falta \"name\" o \"exercise\"")]
    ExerciseMissingName { index: usize },

    #[error("Ejercicio {index} ({name}): faltan \"sets\" o \"reps\"")]
    ExerciseMissingSetsReps { index: usize, name: String },

    #[error("No se pudo detectar el título del entrenamiento")]
    NoSessionTitle,

    #[error("No se encontraron ejercicios en el texto")]
    NoExercisesInText,
}

/// A validated import: either one workout or a whole weekly plan.
#[derive(Debug, Clone)]
pub enum Imported {
    Workout(Workout),
    Plan(WeeklyPlan),
}

/// Import pasted text, auto-detecting the format unless one is forced.
pub fn import(text: &str, format: Option<ImportFormat>) -> Result<Imported, ImportError> {
    import_at(text, format, Local::now().date_naive())
}

/// Import with an explicit processing date (plan ids, synthesized dates).
pub fn import_at(
    text: &str,
    format: Option<ImportFormat>,
    today: NaiveDate,
) -> Result<Imported, ImportError> {
    let format = format.unwrap_or_else(|| detect_format(text));

    match format {
        ImportFormat::WeeklyPlan => {
            let plan = parse_weekly_plan_at(text, today);
            if plan.days.is_empty() {
                return Err(ImportError::NoDaysInPlan);
            }
            info!(days = plan.days.len(), id = %plan.id, "weekly plan imported");
            Ok(Imported::Plan(plan))
        }
        ImportFormat::Json => import_json(text, today),
        ImportFormat::SingleDay => {
            let workout = parse_workout_text_at(text, today);
            if workout.session.is_empty() {
                return Err(ImportError::NoSessionTitle);
            }
            if workout.exercises.is_empty() {
                return Err(ImportError::NoExercisesInText);
            }
            info!(session = %workout.session, exercises = workout.exercises.len(), "workout imported");
            Ok(Imported::Workout(workout))
        }
    }
}

/// JSON path: either a `week_plan` document or a single-day object.
fn import_json(text: &str, today: NaiveDate) -> Result<Imported, ImportError> {
    let value: Value =
        serde_json::from_str(text.trim()).map_err(|e| ImportError::InvalidJson(e.to_string()))?;

    if let Some(week_plan) = value.get("week_plan") {
        return convert_week_plan(week_plan, today).map(Imported::Plan);
    }

    convert_single_day(&value).map(Imported::Workout)
}

/// Validate and convert a single-day JSON object. Structural checks only:
/// required keys present, exercises is an array, each exercise has a name
/// and sets/reps.
fn convert_single_day(value: &Value) -> Result<Workout, ImportError> {
    let session = str_field(value, &["title", "session"]).ok_or(ImportError::MissingTitle)?;

    let exercises = value
        .get("exercises")
        .and_then(Value::as_array)
        .ok_or(ImportError::MissingExercises)?;

    let mut converted = Vec::with_capacity(exercises.len());
    for (idx, ex) in exercises.iter().enumerate() {
        let name = str_field(ex, &["name", "exercise"])
            .ok_or(ImportError::ExerciseMissingName { index: idx + 1 })?;

        let sets = u32_field(ex, "sets");
        let reps = u32_field(ex, "reps");
        if sets.unwrap_or(0) == 0 || reps.unwrap_or(0) == 0 {
            return Err(ImportError::ExerciseMissingSetsReps {
                index: idx + 1,
                name,
            });
        }

        let mut exercise = Exercise::new(idx as u32 + 1, name);
        exercise.sets = sets.unwrap_or(0);
        exercise.reps = reps.unwrap_or(0);
        exercise.load = str_field(ex, &["load"]).or_else(|| {
            ex.get("weight_kg")
                .and_then(json_number_string)
                .map(|w| format!("{} kg", w))
        });
        exercise.rir = str_field(ex, &["RIR", "rir"]);
        exercise.tempo = str_field(ex, &["tempo"]);
        exercise.rest_seconds = str_field(ex, &["rest_seconds"]);
        exercise.increment = str_field(ex, &["increment"]);
        exercise.notes = str_field(ex, &["notes"]);
        converted.push(exercise);
    }

    Ok(Workout {
        session,
        date: str_field(value, &["date"]),
        warm_up: convert_warmup(value.get("warm_up").or_else(|| value.get("warmup"))),
        exercises: converted,
        duration_minutes: u32_field(value, "duration_minutes").or_else(|| u32_field(value, "duration_min")),
    })
}

/// Convert a `{week_plan: {day_1: {...}, ...}}` document, synthesizing
/// dates from today forward and cycling day colors.
fn convert_week_plan(week_plan: &Value, today: NaiveDate) -> Result<WeeklyPlan, ImportError> {
    let days_map = week_plan
        .as_object()
        .ok_or_else(|| ImportError::InvalidJson("week_plan debe ser un objeto".to_string()))?;

    let mut day_keys: Vec<&String> = days_map.keys().collect();
    day_keys.sort();

    let mut days = Vec::with_capacity(day_keys.len());
    for (idx, key) in day_keys.iter().enumerate() {
        let day_data = &days_map[key.as_str()];
        let date = today + Duration::days(idx as i64);
        let emoji = CYCLE_EMOJIS[idx % CYCLE_EMOJIS.len()];

        let exercises: Vec<Exercise> = day_data
            .get("exercises")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .enumerate()
                    .map(|(ex_idx, ex)| {
                        let mut exercise = Exercise::new(
                            ex_idx as u32 + 1,
                            str_field(ex, &["exercise", "name"]).unwrap_or_default(),
                        );
                        exercise.sets = u32_field(ex, "sets").unwrap_or(0);
                        exercise.reps = u32_field(ex, "reps").unwrap_or(0);
                        exercise.load = ex
                            .get("weight_kg")
                            .and_then(json_number_string)
                            .map(|w| format!("{} kg", w))
                            .or(Some("0 kg".to_string()));
                        exercise.rir = str_field(ex, &["rir", "RIR"]);
                        exercise
                    })
                    .collect()
            })
            .unwrap_or_default();

        days.push(PlanDay {
            id: (idx + 1).to_string(),
            date: format!("{}-{}-{}", date.format("%-d"), date.format("%-m"), date.format("%Y")),
            day_name: spanish_weekday(date).to_string(),
            emoji: emoji.to_string(),
            color: crate::models::DayColor::from_emoji(emoji),
            title: str_field(day_data, &["name", "title"])
                .unwrap_or_else(|| format!("Día {}", idx + 1)),
            warm_up: convert_warmup(day_data.get("warmup").or_else(|| day_data.get("warm_up"))),
            exercises,
            duration_minutes: u32_field(day_data, "duration_min")
                .or_else(|| u32_field(day_data, "duration_minutes")),
        });
    }

    if days.is_empty() {
        return Err(ImportError::NoDaysInPlan);
    }

    Ok(WeeklyPlan {
        id: plan_id(today),
        week_range: "Plan Semanal".to_string(),
        description: String::new(),
        rules: String::new(),
        days,
    })
}

fn convert_warmup(value: Option<&Value>) -> Option<WarmUp> {
    let value = value?;
    let exercise = str_field(value, &["exercise"])?;
    Some(WarmUp {
        exercise,
        duration_minutes: u32_field(value, "duration_min")
            .or_else(|| u32_field(value, "duration_minutes")),
    })
}

/// First present-and-non-empty string field among `keys`.
fn str_field(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = value.get(key).and_then(Value::as_str) {
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }
    None
}

/// Integer field tolerant of JSON numbers and numeric strings.
fn u32_field(value: &Value, key: &str) -> Option<u32> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Render a JSON number (or numeric string) the way it was written.
fn json_number_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        // A Monday.
        NaiveDate::from_ymd_opt(2026, 1, 19).unwrap()
    }

    #[test]
    fn test_import_single_day_text() {
        let text = "LUNES 12-1 — PIERNA\n1️⃣ Sentadilla\n4 × 10 @ 60 kg";
        let Imported::Workout(w) = import_at(text, None, today()).unwrap() else {
            panic!("expected workout");
        };
        assert_eq!(w.session, "PIERNA");
        assert_eq!(w.exercises.len(), 1);
    }

    #[test]
    fn test_import_text_without_exercises_fails() {
        let err = import_at("Solo un título", None, today()).unwrap_err();
        assert!(matches!(err, ImportError::NoExercisesInText));
    }

    #[test]
    fn test_import_weekly_text() {
        let text = "🟢 LUNES 19-1 — PIERNA\n1️⃣ Sentadilla\n4 × 10\n🔵 MARTES 20-1 — UPPER\n1️⃣ Press\n4 × 8";
        let Imported::Plan(plan) = import_at(text, None, today()).unwrap() else {
            panic!("expected plan");
        };
        assert_eq!(plan.days.len(), 2);
    }

    #[test]
    fn test_import_weekly_without_days_fails() {
        let text = "📅 SEMANA GYM · 1–7\nsin días";
        let err = import_at(text, None, today()).unwrap_err();
        assert!(matches!(err, ImportError::NoDaysInPlan));
    }

    #[test]
    fn test_forced_format_overrides_detection() {
        // Valid JSON forced down the single-day text path.
        let err = import_at("{}", Some(ImportFormat::SingleDay), today()).unwrap_err();
        assert!(matches!(err, ImportError::NoExercisesInText));
    }

    #[test]
    fn test_u32_field_rejects_out_of_range() {
        let value: Value = serde_json::json!({
            "sets": 4_294_967_300u64,
            "reps": "8",
            "rest": 90
        });
        // Numbers past u32 are dropped, not wrapped.
        assert_eq!(u32_field(&value, "sets"), None);
        assert_eq!(u32_field(&value, "reps"), Some(8));
        assert_eq!(u32_field(&value, "rest"), Some(90));
    }

    #[test]
    fn test_import_json_single_day() {
        let json = r#"{
            "title": "Día A - Push",
            "exercises": [
                {"id": "1", "name": "Press Banca", "sets": 4, "reps": 8, "load": "60 kg"}
            ]
        }"#;
        let Imported::Workout(w) = import_at(json, None, today()).unwrap() else {
            panic!("expected workout");
        };
        assert_eq!(w.session, "Día A - Push");
        assert_eq!(w.exercises[0].load.as_deref(), Some("60 kg"));
    }

    #[test]
    fn test_import_json_legacy_field_names() {
        let json = r#"{
            "session": "UPPER",
            "exercises": [
                {"exercise": "Remo", "sets": "3", "reps": "8", "weight_kg": 42.5}
            ]
        }"#;
        let Imported::Workout(w) = import_at(json, None, today()).unwrap() else {
            panic!("expected workout");
        };
        assert_eq!(w.exercises[0].name, "Remo");
        assert_eq!(w.exercises[0].sets, 3);
        assert_eq!(w.exercises[0].load.as_deref(), Some("42.5 kg"));
    }

    #[test]
    fn test_import_json_missing_title() {
        let err = import_at(r#"{"exercises": []}"#, None, today()).unwrap_err();
        assert!(matches!(err, ImportError::MissingTitle));
    }

    #[test]
    fn test_import_json_missing_exercises() {
        let err = import_at(r#"{"title": "A"}"#, None, today()).unwrap_err();
        assert!(matches!(err, ImportError::MissingExercises));
    }

    #[test]
    fn test_import_json_exercise_without_name() {
        let json = r#"{"title": "A", "exercises": [{"sets": 3, "reps": 8}]}"#;
        let err = import_at(json, None, today()).unwrap_err();
        assert!(matches!(err, ImportError::ExerciseMissingName { index: 1 }));
    }

    #[test]
    fn test_import_json_exercise_without_sets() {
        let json = r#"{"title": "A", "exercises": [{"name": "Remo", "reps": 8}]}"#;
        let err = import_at(json, None, today()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::ExerciseMissingSetsReps { index: 1, .. }
        ));
    }

    #[test]
    fn test_import_json_week_plan() {
        let json = r#"{
            "week_plan": {
                "day_1": {
                    "name": "Pierna",
                    "duration_min": 60,
                    "warmup": {"exercise": "Bici", "duration_min": 10},
                    "exercises": [
                        {"exercise": "Sentadilla", "sets": 4, "reps": 10, "weight_kg": 60}
                    ]
                },
                "day_2": {
                    "name": "Upper",
                    "exercises": [
                        {"exercise": "Press", "sets": 4, "reps": 8}
                    ]
                }
            }
        }"#;
        let Imported::Plan(plan) = import_at(json, None, today()).unwrap() else {
            panic!("expected plan");
        };

        assert_eq!(plan.id, "week-2026-01-19");
        assert_eq!(plan.days.len(), 2);

        let first = &plan.days[0];
        assert_eq!(first.title, "Pierna");
        assert_eq!(first.day_name, "LUNES");
        assert_eq!(first.date, "19-1-2026");
        assert_eq!(first.emoji, "🟢");
        assert_eq!(first.duration_minutes, Some(60));
        assert_eq!(first.warm_up.as_ref().unwrap().exercise, "Bici");
        assert_eq!(first.exercises[0].load.as_deref(), Some("60 kg"));

        let second = &plan.days[1];
        assert_eq!(second.day_name, "MARTES");
        assert_eq!(second.emoji, "🔵");
        // Missing weight falls back to the zero-load placeholder.
        assert_eq!(second.exercises[0].load.as_deref(), Some("0 kg"));
    }

    #[test]
    fn test_import_json_empty_week_plan() {
        let err = import_at(r#"{"week_plan": {}}"#, None, today()).unwrap_err();
        assert!(matches!(err, ImportError::NoDaysInPlan));
    }
}
