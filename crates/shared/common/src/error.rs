//! HTTP-facing error type for the room service and the wire shape of its error bodies.
//!
//! The board decodes the same `ErrorResponse` to classify rejections, so the codes here
//! are part of the protocol.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{DomainError, MSG_ROOM_FULL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CODE_UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const CODE_FORBIDDEN: &str = "FORBIDDEN";
pub const CODE_NOT_FOUND: &str = "NOT_FOUND";
/// Sent with 400 when the target room cannot admit the occupant.
pub const CODE_CAPACITY_EXCEEDED: &str = "CAPACITY_EXCEEDED";
pub const CODE_VALIDATION: &str = "VALIDATION_ERROR";
pub const CODE_INTERNAL: &str = "INTERNAL_ERROR";

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing, malformed or expired bearer token
    #[error("Authentication required")]
    Unauthorized,

    /// Caller is authenticated but may not manage assignments
    #[error("Access denied")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{}", MSG_ROOM_FULL)]
    CapacityExceeded,

    #[error("{0}")]
    Validation(String),

    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "jwt")]
    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Internal server error")]
    Internal(String),
}

/// `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound(entity.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// HTTP status and machine-readable code.
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, CODE_UNAUTHORIZED),
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => (StatusCode::UNAUTHORIZED, CODE_UNAUTHORIZED),
            AppError::Forbidden => (StatusCode::FORBIDDEN, CODE_FORBIDDEN),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, CODE_NOT_FOUND),
            AppError::CapacityExceeded => (StatusCode::BAD_REQUEST, CODE_CAPACITY_EXCEEDED),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, CODE_VALIDATION),
            #[cfg(feature = "database")]
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, CODE_INTERNAL),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, CODE_INTERNAL),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.classify().0
    }

    pub fn code(&self) -> &'static str {
        self.classify().1
    }

    /// Message safe to show a client. Server-side causes are logged here and replaced.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!(error = ?e, "Database error");
                "A database error occurred".to_string()
            }
            #[cfg(feature = "jwt")]
            AppError::Jwt(e) => {
                tracing::debug!(error = ?e, "Token rejected");
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn to_response_body(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_response_body())).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound(entity) => AppError::NotFound(entity),
            DomainError::CapacityExceeded => AppError::CapacityExceeded,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("Room").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::CapacityExceeded.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::validation("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_capacity_and_validation_share_status_but_not_code() {
        let full = AppError::from(DomainError::CapacityExceeded);
        let invalid = AppError::validation("Invalid room ID");
        assert_eq!(full.status(), invalid.status());
        assert_eq!(full.code(), CODE_CAPACITY_EXCEEDED);
        assert_eq!(invalid.code(), CODE_VALIDATION);
        assert_eq!(full.user_message(), MSG_ROOM_FULL);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let body = AppError::internal("connection string leaked").to_response_body();
        assert_eq!(body.error.code, CODE_INTERNAL);
        assert_eq!(body.error.message, "An internal error occurred");
    }

    #[test]
    fn test_not_found_names_entity() {
        assert_eq!(AppError::not_found("Room").user_message(), "Room not found");
    }
}
