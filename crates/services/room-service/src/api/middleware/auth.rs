//! Authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use common::AppError;
use domain::BEARER_TOKEN_PREFIX;

use crate::api::state::AppState;

/// Bearer-token authentication middleware.
///
/// Verifies the token and injects the caller's [`Session`](crate::service::Session)
/// into the request extensions. Role checks happen in the service against stored data.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)?;

    let session = state.sessions.verify(token)?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
