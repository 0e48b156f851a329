//! Identity types, inbound actions, outbound events, and room snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Card, Rank};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Assigned per connection by the gateway when the socket is accepted,
/// and used as the player's identity for the lifetime of that connection.
/// `#[serde(transparent)]` makes it serialize as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A room code: six characters over `A-Z0-9`, shared out of band between
/// players ("join my room, code is 7KQ2MX").
///
/// Serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// One player as seen by everyone in the room.
///
/// Carries a card *count* only — card contents are private to the owning
/// connection and never appear in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    pub ready: bool,
    pub card_count: usize,
}

/// The broadcast-safe projection of a room, sent to every member after
/// each state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub players: Vec<PlayerSnapshot>,
    pub current_turn: usize,
    pub current_player: Option<PlayerId>,
    pub game_started: bool,
    pub game_over: bool,
    pub remaining_cards: u32,
    pub current_round: u32,
    pub max_rounds: u32,
}

// ---------------------------------------------------------------------------
// ClientAction — inbound
// ---------------------------------------------------------------------------

/// Actions a connection may send.
///
/// Internally tagged: `{ "type": "createRoom", "playerName": "...", ... }`.
/// The tag values are the event names the original client emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientAction {
    /// Create a room and join it as the first player.
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        player_name: String,
        max_players: usize,
    },

    /// Join an existing room by code.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: RoomId,
        player_name: String,
    },

    /// Flag the sender as ready; the game starts once everyone is.
    PlayerReady,

    /// Draw a batch of cards (turn-bound).
    DrawCards,

    /// Score the held hand (turn-bound). The client declares the card it
    /// believes is highest; the server recomputes and validates rather
    /// than trusting it.
    #[serde(rename_all = "camelCase")]
    ScoreCards { highest_card: Rank },

    /// Discard the held hand for zero points (turn-bound).
    SkipHand,

    /// Leave the current room.
    LeaveRoom,

    /// Operational read-only query: live room count and connected-client
    /// count.
    Status,
}

// ---------------------------------------------------------------------------
// ServerEvent — outbound
// ---------------------------------------------------------------------------

/// Events the server emits to connections.
///
/// Most are broadcast to a whole room; `cardsDrawn` goes only to the
/// drawing connection, and `roomCreated`/`roomJoined`/`status`/`error`
/// go only to the acting connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_id: RoomId,
        player_id: PlayerId,
    },

    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_id: RoomId,
        player_id: PlayerId,
    },

    #[serde(rename_all = "camelCase")]
    PlayerJoined { player_name: String },

    #[serde(rename_all = "camelCase")]
    PlayerLeft { player_id: PlayerId },

    /// Full snapshot after any state change.
    RoomUpdate { state: RoomSnapshot },

    /// The ready transition completed and a deck was shuffled.
    GameStarted { state: RoomSnapshot },

    /// Private delivery of drawn card contents to the drawer.
    CardsDrawn { cards: Vec<Card> },

    /// A turn ended by scoring or skipping.
    #[serde(rename_all = "camelCase")]
    TurnComplete {
        player_id: PlayerId,
        points: u32,
        card: Option<Rank>,
        skipped: bool,
    },

    /// The game ended; `winner` is absent when the room emptied out.
    #[serde(rename_all = "camelCase")]
    GameOver {
        winner: Option<PlayerSnapshot>,
        final_scores: Vec<PlayerSnapshot>,
    },

    /// Answer to a `status` query. `players` counts connected sockets,
    /// in a room or not.
    Status { rooms: usize, players: usize },

    /// A rejected action; the room state is unchanged.
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================
