//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Elevated operator: full administration rights
pub const ROLE_ADMIN: &str = "ADMIN";

/// Operator: manages rooms and assignments
pub const ROLE_WORKER: &str = "WORKER";

/// End client: browses and purchases products in its assigned room
pub const ROLE_CLIENT: &str = "CLIENT";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_WORKER, ROLE_CLIENT];

// =============================================================================
// Rooms
// =============================================================================

/// Smallest capacity a room may be configured with
pub const MIN_ROOM_CAPACITY: u32 = 1;

/// Wire identifier of the unassigned pool
pub const UNASSIGNED_CONTAINER_ID: &str = "unassigned";

/// Occupancy percentage at which a room is reported as nearly full
pub const NEARLY_FULL_PERCENT: u64 = 80;

// =============================================================================
// Messages
// =============================================================================

/// Shown when a room cannot take one more occupant
pub const MSG_ROOM_FULL: &str = "Room is at full capacity";

/// Shown after an occupant was placed in a room
pub const MSG_ASSIGNED_TO_ROOM: &str = "User assigned to room successfully";

/// Shown after an occupant was returned to the unassigned pool
pub const MSG_MOVED_TO_UNASSIGNED: &str = "User moved to unassigned successfully";

/// Generic failure text for assignment updates
pub const MSG_ASSIGNMENT_FAILED: &str = "Failed to update room assignment";

// =============================================================================
// Authentication
// =============================================================================

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";
