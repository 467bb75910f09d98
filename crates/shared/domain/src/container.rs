//! Containers: the places an occupant can reside.

use std::str::FromStr;

use uuid::Uuid;

use crate::constants::UNASSIGNED_CONTAINER_ID;
use crate::error::DomainError;

/// A specific room or the unassigned pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Unassigned,
    Room(Uuid),
}

impl Container {
    /// Room reference as persisted (`None` for the unassigned pool).
    pub fn room_id(&self) -> Option<Uuid> {
        match self {
            Container::Unassigned => None,
            Container::Room(id) => Some(*id),
        }
    }
}

impl From<Option<Uuid>> for Container {
    fn from(room_id: Option<Uuid>) -> Self {
        room_id.map_or(Container::Unassigned, Container::Room)
    }
}

impl FromStr for Container {
    type Err = DomainError;

    /// Parses drop-target identifiers: `"unassigned"` or a room UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == UNASSIGNED_CONTAINER_ID {
            return Ok(Container::Unassigned);
        }
        Uuid::parse_str(s)
            .map(Container::Room)
            .map_err(|_| DomainError::validation(format!("Invalid container '{}'", s)))
    }
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Container::Unassigned => f.write_str(UNASSIGNED_CONTAINER_ID),
            Container::Room(id) => write!(f, "{}", id),
        }
    }
}
