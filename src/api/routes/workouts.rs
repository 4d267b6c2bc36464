use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::calculate::sort_recent_first;
use crate::models::Workout;
use crate::storage::Stored;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutListResponse {
    pub workouts: Vec<Stored<Workout>>,
    pub pagination: PaginationMeta,
}

pub async fn list_workouts(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<WorkoutListResponse>, ApiError> {
    let mut workouts = state.storage.workouts().get_all()?;
    sort_recent_first(&mut workouts);

    let pagination = Pagination::new(params.page, params.page_size);
    let meta = PaginationMeta::new(&pagination, workouts.len() as u32);

    Ok(Json(WorkoutListResponse {
        workouts: pagination.slice(workouts),
        pagination: meta,
    }))
}

pub async fn get_workout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<Workout>>, ApiError> {
    state
        .storage
        .workouts()
        .get(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("workout {}", id)))
}

pub async fn update_workout(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(workout): Json<Workout>,
) -> Result<Json<Stored<Workout>>, ApiError> {
    let workouts = state.storage.workouts();
    if !workouts.update(&id, workout)? {
        return Err(ApiError::NotFound(format!("workout {}", id)));
    }
    workouts
        .get(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::Internal(format!("workout {} vanished after update", id)))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: String,
}

pub async fn delete_workout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let workouts = state.storage.workouts();
    if !workouts.delete(&id)? {
        return Err(ApiError::NotFound(format!("workout {}", id)));
    }
    // Heal the pointer in case the deleted workout was active.
    state
        .storage
        .active()
        .load_healed(&workouts, &state.storage.plans())?;
    Ok(Json(DeleteResponse { deleted: id }))
}

#[derive(Debug, Serialize)]
pub struct ActiveWorkoutResponse {
    pub workout: Option<Stored<Workout>>,
}

pub async fn get_active_workout(
    State(state): State<AppState>,
) -> Result<Json<ActiveWorkoutResponse>, ApiError> {
    let workouts = state.storage.workouts();
    let pointer = state
        .storage
        .active()
        .load_healed(&workouts, &state.storage.plans())?;

    let workout = match pointer.workout_id {
        Some(id) => workouts.get(&id)?,
        None => None,
    };
    Ok(Json(ActiveWorkoutResponse { workout }))
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    /// Document id to activate; null clears the pointer.
    pub id: Option<String>,
}

pub async fn set_active_workout(
    State(state): State<AppState>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<ActiveWorkoutResponse>, ApiError> {
    let workouts = state.storage.workouts();
    let workout = match &request.id {
        Some(id) => Some(
            workouts
                .get(id)?
                .ok_or_else(|| ApiError::NotFound(format!("workout {}", id)))?,
        ),
        None => None,
    };

    let active = state.storage.active();
    let mut pointer = active.load()?;
    pointer.workout_id = request.id;
    active.save(&pointer)?;

    Ok(Json(ActiveWorkoutResponse { workout }))
}
