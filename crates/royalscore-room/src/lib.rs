//! Room lifecycle for Royal Score.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns the
//! game state exclusively; commands arrive over a channel, so actions
//! against one room are serialized while unrelated rooms proceed fully
//! in parallel.
//!
//! # Key types
//!
//! - [`Room`] — the pure game state machine (no I/O)
//! - [`RoomActor`](actor) / [`RoomHandle`] — one task per room, commands
//!   over mpsc
//! - [`Registry`] — room-code allocation, room and player indexes
//! - [`GameConfig`] — rounds, batch size, deck settings
//! - [`RoomError`] — the room-layer error taxonomy

mod actor;
mod config;
mod error;
mod registry;
mod room;

pub use actor::{LeaveOutcome, PlayerSender, RoomHandle, RoomInfo, spawn_room};
pub use config::GameConfig;
pub use error::RoomError;
pub use registry::Registry;
pub use room::{Player, Room, RoomPhase};
