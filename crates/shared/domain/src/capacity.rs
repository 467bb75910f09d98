//! Capacity policy shared by the board and the authoritative endpoint.
//!
//! A room admits one more occupant when its count, excluding the occupant being moved if
//! that occupant is already a member, is strictly below its capacity.

use serde::{Deserialize, Serialize};

use crate::constants::NEARLY_FULL_PERCENT;
use crate::error::{DomainError, DomainResult};

/// Admission rule over raw numbers.
pub fn admits(occupants: usize, capacity: u32, already_member: bool) -> bool {
    let others = if already_member {
        occupants.saturating_sub(1)
    } else {
        occupants
    };
    (others as u64) < u64::from(capacity)
}

/// Current occupant count of a room against its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    pub capacity: u32,
    pub occupants: usize,
}

/// Badge level for a room's occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillLevel {
    Open,
    NearlyFull,
    Full,
}

impl Occupancy {
    pub fn new(capacity: u32, occupants: usize) -> Self {
        Self {
            capacity,
            occupants,
        }
    }

    /// See [`admits`].
    pub fn admits(&self, already_member: bool) -> bool {
        admits(self.occupants, self.capacity, already_member)
    }

    /// Same decision as [`Occupancy::admits`], as a domain result.
    pub fn check_admission(&self, already_member: bool) -> DomainResult<()> {
        if self.admits(already_member) {
            Ok(())
        } else {
            Err(DomainError::CapacityExceeded)
        }
    }

    pub fn is_full(&self) -> bool {
        self.occupants as u64 >= u64::from(self.capacity)
    }

    pub fn fill_level(&self) -> FillLevel {
        if self.is_full() {
            return FillLevel::Full;
        }
        let capacity = u64::from(self.capacity.max(1));
        if (self.occupants as u64) * 100 >= capacity * NEARLY_FULL_PERCENT {
            FillLevel::NearlyFull
        } else {
            FillLevel::Open
        }
    }
}

impl std::fmt::Display for Occupancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.occupants, self.capacity)
    }
}
