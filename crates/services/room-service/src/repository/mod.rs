//! Repository layer for data access.

pub mod entities;
mod occupancy_repository;

pub use occupancy_repository::{OccupancyRepository, OccupancyStore};

#[cfg(any(test, feature = "test-utils"))]
pub use occupancy_repository::MockOccupancyRepository;
