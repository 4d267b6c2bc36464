//! Weekly-plan segmenter.
//!
//! Splits a multi-day plan text into day segments and delegates each
//! segment to the single-day parser. Day headers are authoritative for
//! title, weekday name, date, and color; the single-day parser only
//! contributes warm-up, exercises, and duration for each segment.

use chrono::{Local, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::models::{DayColor, PlanDay, WeeklyPlan};
use crate::parser::dates::{plan_id, zero_pad_day_month};
use crate::parser::workout::parse_workout_text_at;

/// Metadata captured from a day-header line.
struct DayMeta {
    emoji: String,
    day_name: String,
    date_str: String,
    title: String,
}

/// Parse a weekly plan, stamping the plan id with the current date.
pub fn parse_weekly_plan(text: &str) -> WeeklyPlan {
    parse_weekly_plan_at(text, Local::now().date_naive())
}

/// Parse with an explicit processing date (used for the plan id and for
/// completing day dates inside segments).
pub fn parse_weekly_plan_at(text: &str, today: NaiveDate) -> WeeklyPlan {
    let day_header = Regex::new(
        r"^(🟢|🔵|🟠|🔴|🟣)\s+([A-ZÁÉÍÓÚÑa-záéíóúñ]+)\s+(\d{1,2}[-/.]\d{1,2})\s*[—–-]\s*(.+)",
    )
    .unwrap();
    let week_header = Regex::new(r"(?i)📅\s*SEMANA\s+GYM\s*[·•]\s*(.+)").unwrap();
    let week_prefix = Regex::new(r"(?i)SEMANA\s*GYM\s*[·•]?").unwrap();

    let mut plan = WeeklyPlan {
        id: plan_id(today),
        week_range: String::new(),
        description: String::new(),
        rules: String::new(),
        days: Vec::new(),
    };

    let mut current_meta: Option<DayMeta> = None;
    let mut current_lines: Vec<String> = Vec::new();
    let mut collecting_description = false;
    let mut collecting_rules = false;
    let mut description_lines: Vec<String> = Vec::new();
    let mut rules_lines: Vec<String> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();

        // Week-range header (📅 SEMANA GYM · 20–26 ENERO 2026)
        if trimmed.contains("📅") && lower.contains("semana") {
            plan.week_range = match week_header.captures(trimmed) {
                Some(caps) => caps[1].trim().to_string(),
                None => {
                    let stripped = trimmed.replace("📅", "");
                    week_prefix.replace(&stripped, "").trim().to_string()
                }
            };
            debug!(week_range = %plan.week_range, "found week range header");
            continue;
        }

        // Day header (🟢 MARTES 20-1 — PIERNA + CORE)
        if let Some(caps) = day_header.captures(trimmed) {
            flush_day(&mut current_meta, &mut current_lines, &mut plan, today);

            current_meta = Some(DayMeta {
                emoji: caps[1].to_string(),
                day_name: caps[2].to_uppercase(),
                date_str: caps[3].to_string(),
                title: caps[4].trim().to_string(),
            });
            current_lines = vec![trimmed.to_string()];
            collecting_description = false;
            collecting_rules = false;
            continue;
        }

        // Description section (🧠 POR QUÉ ...)
        if trimmed.contains("🧠") || lower.contains("por qué") {
            flush_day(&mut current_meta, &mut current_lines, &mut plan, today);
            collecting_description = true;
            collecting_rules = false;
            continue;
        }

        // Rules section (📌 REGLA ...)
        if trimmed.contains("📌") || lower.contains("regla") {
            flush_day(&mut current_meta, &mut current_lines, &mut plan, today);
            collecting_description = false;
            collecting_rules = true;
            continue;
        }

        if collecting_description && !trimmed.is_empty() && !collecting_rules {
            description_lines.push(trimmed.to_string());
            continue;
        }

        if collecting_rules && !trimmed.is_empty() {
            rules_lines.push(trimmed.to_string());
            continue;
        }

        // Inside a day: keep the raw line for the single-day parser.
        if current_meta.is_some() {
            current_lines.push(line.to_string());
        }
    }

    flush_day(&mut current_meta, &mut current_lines, &mut plan, today);

    plan.description = description_lines.join("\n").trim().to_string();
    plan.rules = rules_lines.join("\n").trim().to_string();

    debug!(days = plan.days.len(), "weekly plan parsed");
    plan
}

/// Close the currently-open day, if any, and push its parsed form.
fn flush_day(
    meta: &mut Option<DayMeta>,
    lines: &mut Vec<String>,
    plan: &mut WeeklyPlan,
    today: NaiveDate,
) {
    let Some(meta) = meta.take() else {
        lines.clear();
        return;
    };
    if lines.is_empty() {
        return;
    }

    let text = std::mem::take(lines).join("\n");
    let workout = parse_workout_text_at(&text, today);

    let title = if meta.title.is_empty() {
        workout.session
    } else {
        meta.title
    };

    plan.days.push(PlanDay {
        id: format!("day-{}", meta.date_str.replace(['/', '.'], "-")),
        date: zero_pad_day_month(&meta.date_str),
        day_name: meta.day_name,
        color: DayColor::from_emoji(&meta.emoji),
        emoji: meta.emoji,
        title,
        warm_up: workout.warm_up,
        exercises: workout.exercises,
        duration_minutes: workout.duration_minutes,
    });
}
