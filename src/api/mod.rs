//! REST API endpoints.
//!
//! Axum-based HTTP API over the local collections: importing plan text,
//! browsing workouts and weekly plans, the active pointer, and history
//! views.

pub mod routes;
pub mod state;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::importer::ImportError;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(e: ImportError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Pagination parameters.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(50).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> usize {
        // page and page_size come straight from the query string; widen
        // before multiplying so a huge page number cannot overflow.
        let offset = u64::from(self.page - 1) * u64::from(self.page_size);
        usize::try_from(offset).unwrap_or(usize::MAX)
    }

    /// Apply to an already-sorted list.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.page_size as usize)
            .collect()
    }
}

/// Pagination metadata in responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u32) -> Self {
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages: total_items.div_ceil(pagination.page_size),
        }
    }
}

/// Assemble the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/import", post(routes::import::import_document))
        .route("/api/workouts", get(routes::workouts::list_workouts))
        .route(
            "/api/workouts/:id",
            get(routes::workouts::get_workout)
                .put(routes::workouts::update_workout)
                .delete(routes::workouts::delete_workout),
        )
        .route("/api/plans", get(routes::plans::list_plans))
        .route("/api/plans/latest", get(routes::plans::latest_plan))
        .route(
            "/api/plans/:id",
            get(routes::plans::get_plan)
                .put(routes::plans::update_plan)
                .delete(routes::plans::delete_plan),
        )
        .route(
            "/api/active/workout",
            get(routes::workouts::get_active_workout).put(routes::workouts::set_active_workout),
        )
        .route(
            "/api/active/plan",
            get(routes::plans::get_active_plan).put(routes::plans::set_active_plan),
        )
        .route("/api/history/weeks", get(routes::history::list_weeks))
        .route("/api/history/streak", get(routes::history::get_streak))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
