//! Application state for dependency injection.

use std::sync::Arc;

use crate::service::{AssignmentService, SessionVerifier};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub assignments: Arc<dyn AssignmentService>,
    pub sessions: Arc<dyn SessionVerifier>,
}

impl AppState {
    pub fn new(
        assignments: Arc<dyn AssignmentService>,
        sessions: Arc<dyn SessionVerifier>,
    ) -> Self {
        Self {
            assignments,
            sessions,
        }
    }
}
