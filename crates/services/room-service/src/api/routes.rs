//! Route configuration.

use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::{health_routes, room_management_routes};
use crate::api::middleware::auth_middleware;
use crate::api::openapi::ApiDoc;
use crate::api::state::AppState;
use crate::config::parse_origin;

/// Create the main router with all routes.
pub fn create_router(state: AppState, cors_origin: Option<&str>) -> Router {
    Router::new()
        // Health check (no auth)
        .nest("/health", health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Room management (auth required)
        .merge(room_management_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        )))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Unset or `*` allows any origin. An origin that does not parse allows none.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match origin.map(parse_origin) {
        None | Some(Ok(None)) => layer.allow_origin(Any),
        Some(Ok(Some(origin))) => layer.allow_origin(origin),
        Some(Err(e)) => {
            tracing::error!(error = %e, "Refusing cross-origin requests");
            layer
        }
    }
}
