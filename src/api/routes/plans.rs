use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::routes::workouts::{DeleteResponse, ListParams, SetActiveRequest};
use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::models::WeeklyPlan;
use crate::storage::Stored;

#[derive(Debug, Serialize)]
pub struct PlanListResponse {
    pub plans: Vec<Stored<WeeklyPlan>>,
    pub pagination: PaginationMeta,
}

pub async fn list_plans(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PlanListResponse>, ApiError> {
    let mut plans = state.storage.plans().get_all()?;
    // Most recently stored first.
    plans.sort_by_key(|p| std::cmp::Reverse(p.stored_at));

    let pagination = Pagination::new(params.page, params.page_size);
    let meta = PaginationMeta::new(&pagination, plans.len() as u32);

    Ok(Json(PlanListResponse {
        plans: pagination.slice(plans),
        pagination: meta,
    }))
}

pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<WeeklyPlan>>, ApiError> {
    state
        .storage
        .plans()
        .get(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("plan {}", id)))
}

/// Most recently stored plan, the one weekly views open with.
pub async fn latest_plan(
    State(state): State<AppState>,
) -> Result<Json<Stored<WeeklyPlan>>, ApiError> {
    state
        .storage
        .plans()
        .get_all()?
        .into_iter()
        .max_by_key(|p| p.stored_at)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no plans stored".to_string()))
}

pub async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(plan): Json<WeeklyPlan>,
) -> Result<Json<Stored<WeeklyPlan>>, ApiError> {
    let plans = state.storage.plans();
    if !plans.update(&id, plan)? {
        return Err(ApiError::NotFound(format!("plan {}", id)));
    }
    plans
        .get(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::Internal(format!("plan {} vanished after update", id)))
}

pub async fn delete_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let plans = state.storage.plans();
    if !plans.delete(&id)? {
        return Err(ApiError::NotFound(format!("plan {}", id)));
    }
    state
        .storage
        .active()
        .load_healed(&state.storage.workouts(), &plans)?;
    Ok(Json(DeleteResponse { deleted: id }))
}

#[derive(Debug, Serialize)]
pub struct ActivePlanResponse {
    pub plan: Option<Stored<WeeklyPlan>>,
}

pub async fn get_active_plan(
    State(state): State<AppState>,
) -> Result<Json<ActivePlanResponse>, ApiError> {
    let plans = state.storage.plans();
    let pointer = state
        .storage
        .active()
        .load_healed(&state.storage.workouts(), &plans)?;

    let plan = match pointer.plan_id {
        Some(id) => plans.get(&id)?,
        None => None,
    };
    Ok(Json(ActivePlanResponse { plan }))
}

pub async fn set_active_plan(
    State(state): State<AppState>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<ActivePlanResponse>, ApiError> {
    let plans = state.storage.plans();
    let plan = match &request.id {
        Some(id) => Some(
            plans
                .get(id)?
                .ok_or_else(|| ApiError::NotFound(format!("plan {}", id)))?,
        ),
        None => None,
    };

    let active = state.storage.active();
    let mut pointer = active.load()?;
    pointer.plan_id = request.id;
    active.save(&pointer)?;

    Ok(Json(ActivePlanResponse { plan }))
}
