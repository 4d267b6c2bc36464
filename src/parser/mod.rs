//! Plan-text parsing.
//!
//! Three cooperating pieces, all pure functions over in-memory strings:
//! - format detection (`detect_format`, `is_json`, `is_weekly_plan`)
//! - the single-day parser (`workout`)
//! - the weekly-plan segmenter (`weekly`)
//!
//! Shared date heuristics live in `dates`.

pub mod dates;
pub mod weekly;
pub mod workout;

pub use weekly::{parse_weekly_plan, parse_weekly_plan_at};
pub use workout::{parse_workout_text, parse_workout_text_at};

use crate::models::DAY_EMOJIS;

/// Input format classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    WeeklyPlan,
    SingleDay,
}

/// True iff the trimmed input parses as any valid JSON value.
/// Pure syntax check; `{"a":1}`, `[1,2]`, `"x"` and `5` all qualify.
pub fn is_json(input: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(input.trim()).is_ok()
}

/// Heuristic weekly-plan check: a week header (📅 together with "semana")
/// or at least two day-color markers anywhere in the raw text.
pub fn is_weekly_plan(input: &str) -> bool {
    let has_week_header = input.contains("📅") && input.to_lowercase().contains("semana");
    let marker_count: usize = DAY_EMOJIS
        .iter()
        .map(|emoji| input.matches(emoji).count())
        .sum();
    has_week_header || marker_count >= 2
}

/// Classify input, testing JSON, weekly plan, then single day in that
/// priority order.
pub fn detect_format(input: &str) -> ImportFormat {
    if is_json(input) {
        ImportFormat::Json
    } else if is_weekly_plan(input) {
        ImportFormat::WeeklyPlan
    } else {
        ImportFormat::SingleDay
    }
}
