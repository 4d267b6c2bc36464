//! Intervals.icu client.
//!
//! Uploads a workout as a WeightTraining calendar event via the bulk
//! events endpoint, with the session rendered as a plain-text exercise
//! list in the event description.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use super::{ExportError, ExportTarget};
use crate::config::IntervalsConfig;
use crate::models::Workout;
use crate::parser::dates::parse_flexible;

/// Estimated training load, keyed off the session name. Leg and upper
/// sessions carry flat values; anything else is prorated at 40 per hour.
fn training_load(session: &str, minutes: u32) -> u32 {
    let upper = session.to_uppercase();
    if upper.contains("PIERNA") {
        50
    } else if upper.contains("UPPER") {
        35
    } else {
        (minutes as f64 / 60.0 * 40.0).round() as u32
    }
}

/// Calendar event as the bulk endpoint expects it.
#[derive(Debug, Serialize)]
pub struct IntervalsEvent {
    pub category: &'static str,
    #[serde(rename = "type")]
    pub event_type: &'static str,
    pub start_date_local: String,
    pub moving_time: u32,
    pub icu_training_load: u32,
    pub name: String,
    pub description: String,
}

pub struct IntervalsClient {
    client: Client,
    base_url: String,
    athlete_id: String,
    api_key: String,
}

impl IntervalsClient {
    pub fn new(config: &IntervalsConfig) -> Result<Self, ExportError> {
        let (Some(athlete_id), Some(api_key)) = (&config.athlete_id, &config.api_key) else {
            return Err(ExportError::MissingCredentials);
        };
        Ok(Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            athlete_id: athlete_id.clone(),
            api_key: api_key.clone(),
        })
    }

    /// Render the exercise list as the event description.
    /// One line per exercise, notes indented beneath.
    pub fn workout_description(workout: &Workout) -> String {
        let mut lines = Vec::new();
        for exercise in &workout.exercises {
            let mut line = format!("- {} {}x{}", exercise.name, exercise.sets, exercise.reps);
            if let Some(rir) = &exercise.rir {
                line.push_str(&format!(" RIR {}", rir));
            }
            if let Some(load) = &exercise.load {
                line.push_str(&format!(" {}", load));
            }
            lines.push(line);
            if let Some(notes) = &exercise.notes {
                lines.push(format!("  Notes: {}", notes));
            }
        }
        lines.join("\n")
    }

    /// Build the event for a workout without sending it (dry runs).
    pub fn build_event(workout: &Workout, today: NaiveDate) -> IntervalsEvent {
        let date = workout
            .date
            .as_deref()
            .and_then(parse_flexible)
            .unwrap_or(today);
        let minutes = workout.duration_minutes.unwrap_or(60);
        let load = training_load(&workout.session, minutes);

        IntervalsEvent {
            category: "WORKOUT",
            event_type: "WeightTraining",
            start_date_local: format!("{}T00:00:00", date.format("%Y-%m-%d")),
            moving_time: minutes * 60,
            icu_training_load: load,
            name: workout.session.clone(),
            description: Self::workout_description(workout),
        }
    }
}

#[async_trait]
impl ExportTarget for IntervalsClient {
    async fn push_workout(&self, workout: &Workout, today: NaiveDate) -> Result<(), ExportError> {
        let event = Self::build_event(workout, today);
        let url = format!(
            "{}/api/v1/athlete/{}/events/bulk?upsert=true",
            self.base_url, self.athlete_id
        );
        debug!(url = %url, name = %event.name, "uploading workout event");

        let response = self
            .client
            .post(&url)
            .basic_auth("API_KEY", Some(&self.api_key))
            .json(&[&event])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::Api {
                status: status.as_u16(),
                body,
            });
        }

        info!(name = %event.name, date = %event.start_date_local, "workout uploaded");
        Ok(())
    }
}
