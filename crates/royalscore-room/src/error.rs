//! Error types for the room layer.

use royalscore_deck::DeckError;
use royalscore_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
///
/// All of these are recoverable: the acting connection gets an error
/// event and the room state is never mutated by a failed validation.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room code does not refer to a live room.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room has no free player slots.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The player is already in this room.
    #[error("player {0} already in room {1}")]
    DuplicatePlayer(PlayerId, RoomId),

    /// The player is already in some room (one room at a time).
    #[error("player {0} is already in a room")]
    AlreadyInRoom(PlayerId),

    /// The player is not in any room.
    #[error("player {0} is not in any room")]
    NotInRoom(PlayerId),

    /// A turn-bound action from a player who isn't the current one.
    #[error("not your turn")]
    NotYourTurn,

    /// Score or skip without holding cards (draw first).
    #[error("no cards to play — draw first")]
    NoCardsHeld,

    /// The action requires an active game.
    #[error("game is not active")]
    GameNotActive,

    /// A lobby-only action arrived after the game began.
    #[error("game already started")]
    AlreadyStarted,

    /// The external deck service failed or timed out. Retryable; the
    /// room is left in its prior state.
    #[error("deck provider unavailable: {0}")]
    DeckProvider(#[from] DeckError),

    /// The room's command channel is closed or full.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
