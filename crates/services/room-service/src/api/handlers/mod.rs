//! HTTP handlers.

pub mod assignment_handler;
pub mod health_handler;

pub use assignment_handler::room_management_routes;
pub use health_handler::health_routes;
