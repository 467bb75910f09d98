//! Pieces shared by the room service and the board: the HTTP error type with its wire
//! body, and environment-driven configuration structs.

pub mod config;
pub mod error;

pub use config::*;
pub use error::{
    AppError, AppResult, ErrorBody, ErrorResponse, CODE_CAPACITY_EXCEEDED, CODE_VALIDATION,
};
