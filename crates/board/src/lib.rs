//! Assignment Board Library
//!
//! Client side of room assignment: an in-memory store of rooms and occupants,
//! filtered views over it, and a controller that applies moves optimistically and
//! reconciles them with the room service.

pub mod clients;
pub mod config;
pub mod controller;
pub mod gateway;
pub mod notify;
pub mod store;
pub mod view;

pub use controller::{AbortReason, DragController, MoveOutcome, SharedStore};
pub use gateway::{AssignmentGateway, GatewayError};
pub use notify::{Notice, NoticeKind, Notifier, TracingNotifier};
pub use store::{AssignmentStore, MoveRecord, Snapshot, StoreError};
pub use view::{project, room_options, BoardView, Filter, Fullness, RoleFilter, RoomOption};
