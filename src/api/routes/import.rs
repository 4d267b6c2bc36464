use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::importer::{import, Imported};
use crate::models::{WeeklyPlan, Workout};
use crate::parser::ImportFormat;

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub text: String,
    /// Force a format instead of auto-detecting: "json", "weekly", "single".
    pub format: Option<String>,
    /// Parse and validate without storing.
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportResponse {
    Workout {
        id: Option<String>,
        duplicate: bool,
        workout: Workout,
    },
    Plan {
        id: Option<String>,
        plan: WeeklyPlan,
    },
}

fn parse_format(s: &str) -> Result<ImportFormat, ApiError> {
    match s {
        "json" => Ok(ImportFormat::Json),
        "weekly" => Ok(ImportFormat::WeeklyPlan),
        "single" => Ok(ImportFormat::SingleDay),
        other => Err(ApiError::BadRequest(format!(
            "unknown format '{}', expected json, weekly or single",
            other
        ))),
    }
}

/// Import pasted text. A stored workout or plan becomes the active one;
/// a dry run parses and validates without touching disk.
pub async fn import_document(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    let format = request.format.as_deref().map(parse_format).transpose()?;
    let imported = import(&request.text, format)?;

    let response = match imported {
        Imported::Workout(workout) => {
            let workouts = state.storage.workouts();
            let digest = workout.content_digest();
            let duplicate = workouts
                .get_all()?
                .iter()
                .any(|stored| stored.item.content_digest() == digest);

            let id = if request.dry_run {
                None
            } else {
                let stored = workouts.insert(workout.clone())?;
                let active = state.storage.active();
                let mut pointer = active.load()?;
                pointer.workout_id = Some(stored.id.clone());
                active.save(&pointer)?;
                info!(id = %stored.id, duplicate, "workout stored and activated");
                Some(stored.id)
            };

            ImportResponse::Workout {
                id,
                duplicate,
                workout,
            }
        }
        Imported::Plan(plan) => {
            let id = if request.dry_run {
                None
            } else {
                let stored = state.storage.plans().insert(plan.clone())?;
                let active = state.storage.active();
                let mut pointer = active.load()?;
                pointer.plan_id = Some(stored.id.clone());
                active.save(&pointer)?;
                info!(id = %stored.id, days = plan.days.len(), "plan stored and activated");
                Some(stored.id)
            };

            ImportResponse::Plan { id, plan }
        }
    };

    Ok(Json(response))
}
