//! Occupant entity: a user as seen by the room-assignment view.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ROLE_ADMIN, ROLE_CLIENT, ROLE_WORKER};
use crate::error::DomainError;

/// Closed set of user roles.
///
/// Parsing is strict: unknown values are rejected rather than mapped to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Worker,
    Client,
}

impl Role {
    /// Operators (admins and workers) may manage room assignments.
    pub fn is_operator(&self) -> bool {
        matches!(self, Role::Admin | Role::Worker)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Worker => ROLE_WORKER,
            Role::Client => ROLE_CLIENT,
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_WORKER => Ok(Role::Worker),
            ROLE_CLIENT => Ok(Role::Client),
            other => Err(DomainError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Occupant as rendered on the assignment board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Occupant {
    /// Unique user identifier
    pub id: Uuid,
    /// Display name
    pub name: Option<String>,
    /// Email address
    pub email: String,
    /// User role
    pub role: Role,
    /// Avatar reference
    pub avatar_url: Option<String>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Occupant {
    /// Name if present, email otherwise.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }

    /// Case-insensitive substring match on name or email.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let in_name = self
            .name
            .as_ref()
            .is_some_and(|name| name.to_lowercase().contains(needle));
        in_name || self.email.to_lowercase().contains(needle)
    }
}

/// Occupant with its committed room assignment (authoritative endpoint response).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssignedOccupant {
    #[serde(flatten)]
    pub occupant: Occupant,
    /// Room the occupant now belongs to (null = unassigned)
    pub room_id: Option<Uuid>,
    /// Name of that room, for display
    pub room_name: Option<String>,
}
