use axum::extract::State;
use axum::Json;
use chrono::Local;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{week_groups, weekly_streak, WeekGroup};

#[derive(Debug, Serialize)]
pub struct WeeksResponse {
    pub weeks: Vec<WeekGroup>,
}

pub async fn list_weeks(
    State(state): State<AppState>,
) -> Result<Json<WeeksResponse>, ApiError> {
    let workouts = state.storage.workouts().get_all()?;
    Ok(Json(WeeksResponse {
        weeks: week_groups(workouts),
    }))
}

#[derive(Debug, Serialize)]
pub struct StreakResponse {
    pub weeks: u32,
}

pub async fn get_streak(
    State(state): State<AppState>,
) -> Result<Json<StreakResponse>, ApiError> {
    let workouts = state.storage.workouts().get_all()?;
    Ok(Json(StreakResponse {
        weeks: weekly_streak(&workouts, Local::now().date_naive()),
    }))
}
