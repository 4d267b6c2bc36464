//! Single-day workout text parser.
//!
//! Converts one day's worth of free text into a `Workout`. The input is
//! processed line by line through an explicit classifier + state machine:
//! a line either manipulates the workout shell (title, warm-up, duration),
//! opens a new exercise, or feeds the exercise currently being accumulated.
//!
//! The parser is best-effort by contract: it never fails, and lines it
//! cannot place are absorbed into notes or dropped. Validation (empty
//! title, no exercises) is the importer's job.

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

use crate::models::{Exercise, WarmUp, Workout};
use crate::parser::dates::extract_day_month;

/// Compiled line grammars. Built once per parse call.
struct Grammar {
    day_prefix: Regex,
    warmup_line: Regex,
    duration: Regex,
    keycap_header: Regex,
    bullet_header: Regex,
    sets_reps: Regex,
    increment: Regex,
    tempo: Regex,
    rir: Regex,
    rest: Regex,
}

impl Grammar {
    fn new() -> Self {
        Self {
            day_prefix: Regex::new(
                r"(?i)^(LUNES|MARTES|MIÉRCOLES|MIERCOLES|JUEVES|VIERNES|SÁBADO|SABADO|DOMINGO)\s+\d{1,2}[-/.]\d{1,2}\s*[-—–]\s*",
            )
            .unwrap(),
            warmup_line: Regex::new(r"(.+?)\s*→\s*(\d+)\s*min").unwrap(),
            duration: Regex::new(r"(\d+)[-–]?(\d+)?\s*min").unwrap(),
            keycap_header: Regex::new(r"^[0-9]\u{FE0F}\u{20E3}\s+(.+)").unwrap(),
            bullet_header: Regex::new(r"^[🦵🔹🔸🔶🔷🔺🔻]\s+(.+)").unwrap(),
            sets_reps: Regex::new(r"^(\d+)\s*[×x]\s*(\d+)(?:\s+[^@]*)?(?:\s*@\s*(.+))?").unwrap(),
            increment: Regex::new(r"Incremento:\s*(.+)").unwrap(),
            tempo: Regex::new(r"Tempo\s+(.+)").unwrap(),
            rir: Regex::new(r"RIR\s+(.+)").unwrap(),
            rest: Regex::new(r"Descanso\s+(.+)").unwrap(),
        }
    }
}

/// What a line means while an exercise is open.
enum Detail {
    SetsReps {
        sets: u32,
        reps: u32,
        load: Option<String>,
    },
    Increment(Option<String>),
    Tempo(Option<String>),
    Rir(Option<String>),
    Rest(Option<String>),
    FreeText,
}

/// Parser state: either between exercises or accumulating one.
enum State {
    Idle,
    InExercise { exercise: Exercise, notes: Vec<String> },
}

impl State {
    /// Move a finished exercise into the result list, joining its notes.
    fn flush_into(&mut self, workout: &mut Workout) {
        if let State::InExercise { mut exercise, notes } = std::mem::replace(self, State::Idle) {
            if !notes.is_empty() {
                exercise.notes = Some(notes.join("\n"));
            }
            workout.exercises.push(exercise);
        }
    }
}

/// Parse a single day's workout text, stamping extracted dates with the
/// current year.
pub fn parse_workout_text(text: &str) -> Workout {
    parse_workout_text_at(text, Local::now().date_naive())
}

/// Parse with an explicit processing date (the year used to complete
/// `D-M` title tokens).
pub fn parse_workout_text_at(text: &str, today: NaiveDate) -> Workout {
    let grammar = Grammar::new();
    let lines: Vec<&str> = text.split('\n').filter(|l| !l.is_empty()).collect();

    let mut workout = Workout::empty();
    let mut state = State::Idle;
    let mut order: u32 = 0;

    let mut i = 0;
    while i < lines.len() {
        let index = i;
        let line = lines[i].trim();
        i += 1;

        if line.is_empty() {
            continue;
        }

        // First line is the title, whatever it contains.
        if index == 0 {
            parse_title_line(&grammar, line, today, &mut workout);
            continue;
        }

        // Warm-up marker consumes the following line as the descriptor.
        if line.contains('🔥') || line.to_lowercase().contains("calentamiento") {
            if let Some(next) = lines.get(i).map(|l| l.trim()) {
                if let Some(caps) = grammar.warmup_line.captures(next) {
                    workout.warm_up = Some(WarmUp {
                        exercise: caps[1].trim().to_string(),
                        duration_minutes: caps[2].parse().ok(),
                    });
                    i += 1;
                }
            }
            continue;
        }

        // Total duration; ranges report their upper bound.
        if line.contains('⏱') || line.to_lowercase().contains("duración total") {
            if let Some(caps) = grammar.duration.captures(line) {
                let minutes = caps
                    .get(2)
                    .or_else(|| caps.get(1))
                    .and_then(|m| m.as_str().parse().ok());
                workout.duration_minutes = minutes;
            }
            continue;
        }

        // Exercise headers: keycap digit, bullet glyph, or ➤ sub-exercise.
        if let Some(name) = match_exercise_header(&grammar, line) {
            state.flush_into(&mut workout);
            order += 1;
            state = State::InExercise {
                exercise: Exercise::new(order, name),
                notes: Vec::new(),
            };
            continue;
        }

        // Everything else only matters while an exercise is open.
        if let State::InExercise {
            ref mut exercise,
            ref mut notes,
        } = state
        {
            match classify_detail(&grammar, line) {
                Detail::SetsReps { sets, reps, load } => {
                    exercise.sets = sets;
                    exercise.reps = reps;
                    if load.is_some() {
                        exercise.load = load;
                    }
                }
                Detail::Increment(v) => {
                    if v.is_some() {
                        exercise.increment = v;
                    }
                }
                Detail::Tempo(v) => {
                    if v.is_some() {
                        exercise.tempo = v;
                    }
                }
                Detail::Rir(v) => {
                    if v.is_some() {
                        exercise.rir = v;
                    }
                }
                Detail::Rest(v) => {
                    if v.is_some() {
                        exercise.rest_seconds = v;
                    }
                }
                Detail::FreeText => {
                    if line.starts_with('•') || line.starts_with('-') {
                        notes.push(line.to_string());
                    } else if !starts_with_marker(line) {
                        notes.push(line.to_string());
                    }
                }
            }
        }
    }

    state.flush_into(&mut workout);

    // Drop exercises without real content, then renumber contiguously.
    workout.exercises.retain(Exercise::is_retained);
    for (idx, ex) in workout.exercises.iter_mut().enumerate() {
        ex.renumber(idx as u32 + 1);
    }

    workout
}

/// Title line: take the whole line as the session name, and when it carries
/// a `D-M` token, extract a `DD-MM-YYYY` date and strip the leading weekday
/// prefix from the name.
fn parse_title_line(grammar: &Grammar, line: &str, today: NaiveDate, workout: &mut Workout) {
    workout.session = line.to_string();

    if let Some((day, month)) = extract_day_month(line) {
        workout.date = Some(format!("{:02}-{:02}-{}", day, month, today.year()));
        workout.session = grammar.day_prefix.replace(line, "").trim().to_string();
    }
}

fn match_exercise_header(grammar: &Grammar, line: &str) -> Option<String> {
    if let Some(caps) = grammar.keycap_header.captures(line) {
        return Some(caps[1].trim().to_string());
    }
    if let Some(caps) = grammar.bullet_header.captures(line) {
        return Some(caps[1].trim().to_string());
    }
    if let Some(rest) = line.strip_prefix('➤') {
        return Some(rest.trim().to_string());
    }
    None
}

/// Classify a line feeding an open exercise. Labelled attribute lines are
/// consumed even when the value capture fails, mirroring the tolerant
/// source grammar.
fn classify_detail(grammar: &Grammar, line: &str) -> Detail {
    if let Some(caps) = grammar.sets_reps.captures(line) {
        let sets = caps[1].parse().unwrap_or(0);
        let reps = caps[2].parse().unwrap_or(0);
        let load = caps.get(3).map(|m| m.as_str().trim().to_string());
        return Detail::SetsReps { sets, reps, load };
    }
    if line.contains("Incremento:") {
        return Detail::Increment(capture_value(&grammar.increment, line));
    }
    if line.contains("Tempo") {
        return Detail::Tempo(capture_value(&grammar.tempo, line));
    }
    if line.contains("RIR") {
        return Detail::Rir(capture_value(&grammar.rir, line));
    }
    if line.contains("Descanso") {
        return Detail::Rest(capture_value(&grammar.rest, line));
    }
    Detail::FreeText
}

fn capture_value(re: &Regex, line: &str) -> Option<String> {
    re.captures(line).map(|caps| caps[1].trim().to_string())
}

/// Whether a line starts with a glyph that marks section headers rather
/// than descriptive text (digits, keycap components, 🔥, ⏱).
fn starts_with_marker(line: &str) -> bool {
    match line.chars().next() {
        Some(c) => {
            c.is_ascii_digit() || matches!(c, '\u{FE0F}' | '\u{20E3}' | '🔥' | '⏱')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()
    }

    #[test]
    fn test_title_with_date_and_weekday_prefix() {
        let w = parse_workout_text_at("LUNES 12-1 — PIERNA + CORE", today());
        assert_eq!(w.session, "PIERNA + CORE");
        assert_eq!(w.date.as_deref(), Some("12-01-2026"));
    }

    #[test]
    fn test_title_uses_current_year() {
        let w = parse_workout_text("LUNES 12-1 — PIERNA");
        let year = Local::now().year();
        assert_eq!(w.date, Some(format!("12-01-{}", year)));
    }

    #[test]
    fn test_title_without_date_kept_verbatim() {
        let w = parse_workout_text_at("Día A - Push", today());
        assert_eq!(w.session, "Día A - Push");
        assert_eq!(w.date, None);
    }

    #[test]
    fn test_basic_exercise_with_load() {
        let text = "LUNES 12-1 — PIERNA + CORE\n1️⃣ Sentadilla\n4 × 10 @ 60 kg";
        let w = parse_workout_text_at(text, today());

        assert_eq!(w.session, "PIERNA + CORE");
        assert_eq!(w.date.as_deref(), Some("12-01-2026"));
        assert_eq!(w.exercises.len(), 1);

        let ex = &w.exercises[0];
        assert_eq!(ex.name, "Sentadilla");
        assert_eq!(ex.sets, 4);
        assert_eq!(ex.reps, 10);
        assert_eq!(ex.load.as_deref(), Some("60 kg"));
        assert_eq!(ex.order, 1);
        assert_eq!(ex.id, "1");
    }

    #[test]
    fn test_sets_reps_without_load() {
        let text = "Título\n1️⃣ Remo\n3 × 8";
        let w = parse_workout_text_at(text, today());
        assert_eq!(w.exercises[0].sets, 3);
        assert_eq!(w.exercises[0].reps, 8);
        assert_eq!(w.exercises[0].load, None);

        let json = serde_json::to_string(&w.exercises[0]).unwrap();
        assert!(!json.contains("load"));
    }

    #[test]
    fn test_sets_reps_with_interleaved_text() {
        let text = "Título\n1️⃣ Cuádriceps unilateral\n4 × 10 por pierna @ 9.5 kg";
        let w = parse_workout_text_at(text, today());
        assert_eq!(w.exercises[0].sets, 4);
        assert_eq!(w.exercises[0].reps, 10);
        assert_eq!(w.exercises[0].load.as_deref(), Some("9.5 kg"));
    }

    #[test]
    fn test_lowercase_x_separator() {
        let text = "Título\n1️⃣ Press\n5 x 5 @ 80 kg";
        let w = parse_workout_text_at(text, today());
        assert_eq!(w.exercises[0].sets, 5);
        assert_eq!(w.exercises[0].reps, 5);
    }

    #[test]
    fn test_warmup_block() {
        let text = "Título\n🔥 Calentamiento\n🚴 Bici → 10 min\n1️⃣ Prensa\n4 × 10";
        let w = parse_workout_text_at(text, today());

        let warm_up = w.warm_up.expect("warm-up parsed");
        assert_eq!(warm_up.exercise, "🚴 Bici");
        assert_eq!(warm_up.duration_minutes, Some(10));
        assert_eq!(w.exercises.len(), 1);
    }

    #[test]
    fn test_warmup_keyword_without_glyph() {
        let text = "Título\nCalentamiento\nCinta → 5 min";
        let w = parse_workout_text_at(text, today());
        assert_eq!(w.warm_up.unwrap().exercise, "Cinta");
    }

    #[test]
    fn test_warmup_marker_without_descriptor_line() {
        let text = "Título\n🔥 Calentamiento";
        let w = parse_workout_text_at(text, today());
        assert_eq!(w.warm_up, None);
    }

    #[test]
    fn test_duration_single_value() {
        let text = "Título\n⏱️ Duración total 60 min";
        let w = parse_workout_text_at(text, today());
        assert_eq!(w.duration_minutes, Some(60));
    }

    #[test]
    fn test_duration_range_takes_upper_bound() {
        let text = "Título\n⏱️ 90–120 min";
        let w = parse_workout_text_at(text, today());
        assert_eq!(w.duration_minutes, Some(120));
    }

    #[test]
    fn test_attribute_lines() {
        let text = "Título\n1️⃣ Prensa Matrix\n4 × 10 @ 10 kg\nIncremento: ninguno\nTempo 2↑ · 0 · 4↓\nRIR 2–3\nDescanso 90–120 s";
        let w = parse_workout_text_at(text, today());

        let ex = &w.exercises[0];
        assert_eq!(ex.increment.as_deref(), Some("ninguno"));
        assert_eq!(ex.tempo.as_deref(), Some("2↑ · 0 · 4↓"));
        assert_eq!(ex.rir.as_deref(), Some("2–3"));
        assert_eq!(ex.rest_seconds.as_deref(), Some("90–120 s"));
    }

    #[test]
    fn test_bullet_glyph_headers() {
        let text = "Título\n🔹 Curl femoral\n3 × 12\n🦵 Gemelo de pie\n4 × 15";
        let w = parse_workout_text_at(text, today());
        assert_eq!(w.exercises.len(), 2);
        assert_eq!(w.exercises[0].name, "Curl femoral");
        assert_eq!(w.exercises[1].name, "Gemelo de pie");
    }

    #[test]
    fn test_sub_exercise_arrow() {
        let text = "Título\n1️⃣ Core\n3 × 10\n➤ Pallof press\n3 × 12";
        let w = parse_workout_text_at(text, today());
        assert_eq!(w.exercises.len(), 2);
        assert_eq!(w.exercises[1].name, "Pallof press");
        assert_eq!(w.exercises[1].order, 2);
    }

    #[test]
    fn test_notes_accumulate_and_join() {
        let text = "Título\n1️⃣ Sentadilla\n4 × 10\n• Mantener espalda neutra\nBajar controlado";
        let w = parse_workout_text_at(text, today());
        assert_eq!(
            w.exercises[0].notes.as_deref(),
            Some("• Mantener espalda neutra\nBajar controlado")
        );
    }

    #[test]
    fn test_empty_exercise_dropped_and_renumbered() {
        // "Movilidad" never gets sets/reps or notes, so it vanishes and the
        // following exercise takes its place in the numbering.
        let text = "Título\n1️⃣ Movilidad\n2️⃣ Sentadilla\n4 × 10\n3️⃣ Prensa\n3 × 12";
        let w = parse_workout_text_at(text, today());

        assert_eq!(w.exercises.len(), 2);
        assert_eq!(w.exercises[0].name, "Sentadilla");
        assert_eq!(w.exercises[0].id, "1");
        assert_eq!(w.exercises[0].order, 1);
        assert_eq!(w.exercises[1].name, "Prensa");
        assert_eq!(w.exercises[1].id, "2");
        assert_eq!(w.exercises[1].order, 2);
    }

    #[test]
    fn test_exercise_kept_on_notes_alone() {
        let text = "Título\n1️⃣ Core\n• 3 rondas de plancha";
        let w = parse_workout_text_at(text, today());
        assert_eq!(w.exercises.len(), 1);
        assert_eq!(w.exercises[0].sets, 0);
    }

    #[test]
    fn test_detail_lines_before_any_exercise_ignored() {
        let text = "Título\n4 × 10 @ 60 kg\nRIR 2";
        let w = parse_workout_text_at(text, today());
        assert!(w.exercises.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let w = parse_workout_text_at("", today());
        assert_eq!(w.session, "");
        assert!(w.exercises.is_empty());
    }
}
