//! Persistence gateway: the board's view of the authoritative assignment endpoint.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use domain::{AssignedOccupant, Board, Container, MSG_ASSIGNMENT_FAILED};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Remote failures, classified by status class and error code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Access denied")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    CapacityExceeded(String),

    #[error("{0}")]
    Validation(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl GatewayError {
    /// Text for the operator notice.
    ///
    /// Client-class rejections carry the server's reason; everything else gets the
    /// generic failure text.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::NotFound(msg)
            | GatewayError::CapacityExceeded(msg)
            | GatewayError::Validation(msg) => msg.clone(),
            GatewayError::Unauthenticated | GatewayError::Forbidden => self.to_string(),
            GatewayError::Server { .. } | GatewayError::Transport(_) => {
                MSG_ASSIGNMENT_FAILED.to_string()
            }
        }
    }
}

/// Gateway trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AssignmentGateway: Send + Sync {
    /// Fetch rooms with occupants plus the unassigned pool
    async fn fetch_board(&self) -> Result<Board, GatewayError>;

    /// Persist one assignment (`Container::Unassigned` clears the room)
    async fn assign(
        &self,
        occupant_id: Uuid,
        target: Container,
    ) -> Result<AssignedOccupant, GatewayError>;
}
