//! Room entity and the board returned to assignment clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capacity::Occupancy;
use crate::constants::MIN_ROOM_CAPACITY;
use crate::error::{DomainError, DomainResult};
use crate::occupant::Occupant;

/// Room domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Room {
    /// Unique room identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional image reference
    pub image_url: Option<String>,
    /// Maximum number of occupants (at least 1)
    pub capacity: u32,
    /// Whether the room is active
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Reject capacities below the minimum.
    pub fn validate_capacity(capacity: u32) -> DomainResult<u32> {
        if capacity < MIN_ROOM_CAPACITY {
            return Err(DomainError::validation(format!(
                "Capacity must be at least {}",
                MIN_ROOM_CAPACITY
            )));
        }
        Ok(capacity)
    }
}

/// A room together with its current occupants, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RoomWithOccupants {
    #[serde(flatten)]
    pub room: Room,
    pub occupants: Vec<Occupant>,
}

impl RoomWithOccupants {
    pub fn occupancy(&self) -> Occupancy {
        Occupancy::new(self.room.capacity, self.occupants.len())
    }

    pub fn contains(&self, occupant_id: Uuid) -> bool {
        self.occupants.iter().any(|o| o.id == occupant_id)
    }
}

/// Everything the assignment board needs for its initial render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Board {
    /// Rooms ordered by name, occupants ordered by creation time
    pub rooms: Vec<RoomWithOccupants>,
    /// Occupants without a room, ordered by creation time
    pub unassigned: Vec<Occupant>,
}
