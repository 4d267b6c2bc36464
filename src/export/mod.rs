//! Pushing workouts to external training platforms.

pub mod intervals;

pub use intervals::IntervalsClient;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::Workout;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export target is not configured (missing athlete id or API key)")]
    MissingCredentials,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Anything a workout can be pushed to. `today` anchors workouts whose
/// stored date cannot be resolved.
#[async_trait]
pub trait ExportTarget {
    async fn push_workout(&self, workout: &Workout, today: NaiveDate) -> Result<(), ExportError>;
}
