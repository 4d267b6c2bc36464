//! Weekly plan model.

use serde::{Deserialize, Serialize};

use super::{Exercise, WarmUp};

/// The five recognized day-color marker glyphs.
pub const DAY_EMOJIS: [&str; 5] = ["🟢", "🔵", "🟠", "🔴", "🟣"];

/// Color tag derived from a day's marker glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayColor {
    Green,
    Blue,
    Orange,
    Red,
    Purple,
}

impl DayColor {
    /// Map a marker glyph to its color tag. Unknown glyphs fall back to
    /// green, matching the original day-color table.
    pub fn from_emoji(emoji: &str) -> Self {
        match emoji {
            "🔵" => Self::Blue,
            "🟠" => Self::Orange,
            "🔴" => Self::Red,
            "🟣" => Self::Purple,
            _ => Self::Green,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Purple => "purple",
        }
    }
}

/// One day inside a weekly plan.
///
/// Carries the same workout fields as a standalone `Workout` plus the
/// header metadata the segmenter extracted. Title, day name, and date are
/// authoritative from the day-header line, never from exercise text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDay {
    /// Derived from the raw date token, e.g. "day-20-1"
    pub id: String,

    /// Zero-padded `DD-MM`
    pub date: String,

    /// Uppercase Spanish weekday name from the header
    #[serde(rename = "dayName")]
    pub day_name: String,

    /// The day's marker glyph
    pub emoji: String,

    /// Color tag derived from the glyph
    pub color: DayColor,

    /// Session title from the header
    pub title: String,

    #[serde(default)]
    pub warm_up: Option<WarmUp>,

    #[serde(default)]
    pub exercises: Vec<Exercise>,

    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

/// A parsed weekly plan.
///
/// `days` preserves the order headers appeared in the text; chronological
/// ordering is a view concern (see `calculate`). The id is synthesized from
/// the processing date, so two plans parsed the same day share it — the
/// store assigns its own document id on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    /// "week-YYYY-MM-DD" of the processing date. Serialized as `planId`
    /// so it never collides with the store's document id when a stored
    /// plan is flattened into its envelope.
    #[serde(rename = "planId", default)]
    pub id: String,

    /// Week-range label from the 📅 header ("20–26 ENERO 2026")
    #[serde(rename = "weekRange", default)]
    pub week_range: String,

    /// Newline-joined 🧠 section
    #[serde(default)]
    pub description: String,

    /// Newline-joined 📌 section
    #[serde(default)]
    pub rules: String,

    /// Days in textual order
    #[serde(default)]
    pub days: Vec<PlanDay>,
}
