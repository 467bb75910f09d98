//! Read-only filtered projections of the assignment store.

use std::str::FromStr;

use uuid::Uuid;

use domain::{DomainError, FillLevel, Occupancy, Occupant, Role, Room};

use crate::store::AssignmentStore;

/// Role filter: everyone or one exact role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl RoleFilter {
    fn admits(&self, occupant: &Occupant) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(role) => occupant.role == *role,
        }
    }
}

impl FromStr for RoleFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(RoleFilter::All);
        }
        s.parse().map(RoleFilter::Only)
    }
}

/// Room fullness filter, judged on full membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Fullness {
    #[default]
    All,
    /// `count < capacity`
    Available,
    /// `count >= capacity`
    Full,
}

impl Fullness {
    fn admits(&self, occupancy: &Occupancy) -> bool {
        match self {
            Fullness::All => true,
            Fullness::Available => !occupancy.is_full(),
            Fullness::Full => occupancy.is_full(),
        }
    }
}

impl FromStr for Fullness {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Fullness::All),
            "available" => Ok(Fullness::Available),
            "full" => Ok(Fullness::Full),
            other => Err(DomainError::validation(format!(
                "Unknown room filter '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Case-insensitive substring on name or email
    pub query: String,
    pub role: RoleFilter,
    pub fullness: Fullness,
}

impl Filter {
    fn matches(&self, needle: &str, occupant: &Occupant) -> bool {
        occupant.matches_lowercase(needle) && self.role.admits(occupant)
    }
}

/// A room as displayed: its real occupancy plus the occupants that pass the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomView<'a> {
    pub room: &'a Room,
    pub occupancy: Occupancy,
    pub fill_level: FillLevel,
    pub occupants: Vec<&'a Occupant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView<'a> {
    pub rooms: Vec<RoomView<'a>>,
    pub unassigned: Vec<&'a Occupant>,
    /// A fullness filter is active and no room passed it
    pub no_rooms_match: bool,
}

/// Project the store through a filter. Never mutates the store.
pub fn project<'a>(store: &'a AssignmentStore, filter: &Filter) -> BoardView<'a> {
    let needle = filter.query.trim().to_lowercase();

    let rooms: Vec<RoomView<'a>> = store
        .rooms()
        .iter()
        .filter(|r| filter.fullness.admits(&r.occupancy()))
        .map(|r| {
            let occupancy = r.occupancy();
            RoomView {
                room: &r.room,
                occupancy,
                fill_level: occupancy.fill_level(),
                occupants: r
                    .occupants
                    .iter()
                    .filter(|o| filter.matches(&needle, o))
                    .collect(),
            }
        })
        .collect();

    let unassigned = store
        .unassigned()
        .iter()
        .filter(|o| filter.matches(&needle, o))
        .collect();

    let no_rooms_match = filter.fullness != Fullness::All && rooms.is_empty();

    BoardView {
        rooms,
        unassigned,
        no_rooms_match,
    }
}

/// One entry of the room picker for a single occupant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOption<'a> {
    pub room: &'a Room,
    pub occupancy: Occupancy,
    pub is_current: bool,
    /// Full rooms are offered only to their own members
    pub selectable: bool,
}

/// Room picker entries for `occupant_id`, in store order.
pub fn room_options(store: &AssignmentStore, occupant_id: Uuid) -> Vec<RoomOption<'_>> {
    store
        .rooms()
        .iter()
        .map(|r| {
            let occupancy = r.occupancy();
            let is_current = r.contains(occupant_id);
            RoomOption {
                room: &r.room,
                occupancy,
                is_current,
                selectable: is_current || !occupancy.is_full(),
            }
        })
        .collect()
}
