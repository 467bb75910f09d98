//! Liveness probe. Public; reports whether the assignment store is reachable.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: Health,
    pub database: Health,
    /// Client-safe reason when the database check fails
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and database reachable", body = HealthReport),
        (status = 503, description = "Database unreachable", body = HealthReport)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    match state.assignments.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthReport {
                status: Health::Healthy,
                database: Health::Healthy,
                detail: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthReport {
                    status: Health::Unhealthy,
                    database: Health::Unhealthy,
                    detail: Some(e.user_message()),
                }),
            )
        }
    }
}
