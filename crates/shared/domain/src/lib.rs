//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Types here are shared by the room service and the assignment board.

pub mod capacity;
pub mod constants;
pub mod container;
pub mod error;
pub mod occupant;
pub mod room;

pub use capacity::{admits, FillLevel, Occupancy};
pub use constants::*;
pub use container::Container;
pub use error::{DomainError, DomainResult};
pub use occupant::{AssignedOccupant, Occupant, Role};
pub use room::{Board, Room, RoomWithOccupants};
