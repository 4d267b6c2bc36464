//! Single-workout model.

use serde::{Deserialize, Serialize};

use super::digest_id;

/// A warm-up block preceding the main exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmUp {
    /// Free-text warm-up descriptor (may include glyphs, e.g. "🚴 Bici")
    pub exercise: String,

    /// Duration in minutes, if stated
    pub duration_minutes: Option<u32>,
}

/// One exercise within a workout.
///
/// Optional attribute fields are omitted from serialized output when empty,
/// matching the import format the app's views expect. `exercise` is accepted
/// as an input alias for `name` to keep older exports loadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// 1-based sequence position, as a string (legacy document format)
    pub id: String,

    /// Sequence number matching `id`
    pub order: u32,

    /// Exercise name
    #[serde(alias = "exercise")]
    pub name: String,

    /// Number of sets
    pub sets: u32,

    /// Reps per set
    pub reps: u32,

    /// Load descriptor ("60 kg", "goma roja", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<String>,

    /// Tempo prescription ("2↑ · 0 · 4↓")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<String>,

    /// Reps in reserve ("2–3")
    #[serde(rename = "RIR", default, skip_serializing_if = "Option::is_none")]
    pub rir: Option<String>,

    /// Rest prescription ("90–120 s")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<String>,

    /// Load progression note ("Incremento: ninguno")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increment: Option<String>,

    /// Newline-joined free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Exercise {
    /// Create a bare exercise at a sequence position.
    pub fn new(order: u32, name: String) -> Self {
        Self {
            id: order.to_string(),
            order,
            name,
            sets: 0,
            reps: 0,
            load: None,
            tempo: None,
            rir: None,
            rest_seconds: None,
            increment: None,
            notes: None,
        }
    }

    /// Whether this exercise carries enough content to keep.
    /// Retained iff (sets > 0 AND reps > 0) OR it has notes.
    pub fn is_retained(&self) -> bool {
        (self.sets > 0 && self.reps > 0) || self.notes.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// Re-assign the sequence position after filtering.
    pub fn renumber(&mut self, order: u32) {
        self.order = order;
        self.id = order.to_string();
    }
}

/// A single day's workout.
///
/// `date`, when present, is stored exactly as the parser produced it
/// (zero-padded `DD-MM-YYYY` or whatever the source document carried);
/// calendar interpretation happens in `parser::dates` at comparison sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    /// Session title ("PIERNA + CORE"); `title` accepted on input
    #[serde(alias = "title")]
    pub session: String,

    /// Free-form date token, as entered
    #[serde(default)]
    pub date: Option<String>,

    /// Warm-up block, if the text had one
    #[serde(default)]
    pub warm_up: Option<WarmUp>,

    /// Ordered exercises (never null; may be empty before validation)
    #[serde(default)]
    pub exercises: Vec<Exercise>,

    /// Total duration in minutes
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

impl Workout {
    /// An empty workout shell, as the parser starts from.
    pub fn empty() -> Self {
        Self {
            session: String::new(),
            date: None,
            warm_up: None,
            exercises: Vec::new(),
            duration_minutes: None,
        }
    }

    /// Content fingerprint over title, date, and exercise lines.
    /// Two imports of the same plan text share a digest.
    pub fn content_digest(&self) -> String {
        let exercise_lines: Vec<String> = self
            .exercises
            .iter()
            .map(|e| {
                format!(
                    "{}:{}x{}:{}",
                    e.name,
                    e.sets,
                    e.reps,
                    e.load.as_deref().unwrap_or("")
                )
            })
            .collect();
        let joined = exercise_lines.join(";");
        digest_id(&[&self.session, self.date.as_deref().unwrap_or(""), &joined])
    }
}
