//! Service layer.

mod assignment_service;
mod session;

pub use assignment_service::{AssignmentManager, AssignmentService, Operator};
pub use session::{Claims, JwtVerifier, Session, SessionVerifier};
