//! SeaORM entities.

pub mod room;
pub mod user;
