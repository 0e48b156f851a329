//! Wire protocol for Royal Score.
//!
//! This crate defines everything that travels between the browser client
//! and the game server:
//!
//! - **Identity** ([`PlayerId`], [`RoomId`]) — who is acting and where.
//! - **Cards** ([`Card`], [`Rank`], [`Suit`]) — the card vocabulary shared
//!   with the deck service and the client renderer.
//! - **Messages** ([`ClientAction`], [`ServerEvent`]) — inbound actions and
//!   outbound events.
//! - **Snapshots** ([`RoomSnapshot`], [`PlayerSnapshot`]) — the sanitized
//!   room projection broadcast after every state change.
//! - **Codec** ([`Codec`], [`JsonCodec`]) — byte-level encoding.
//!
//! The protocol layer knows nothing about rooms or connections; it only
//! knows how messages look on the wire. JSON field names are camelCase and
//! enums are internally tagged with `"type"`, matching what the browser
//! client parses.

mod cards;
mod codec;
mod error;
mod types;

pub use cards::{Card, Rank, Suit};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientAction, PlayerId, PlayerSnapshot, RoomId, RoomSnapshot, ServerEvent,
};
