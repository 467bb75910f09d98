//! Clients for remote services.

mod room_client;

pub use room_client::RoomClient;
