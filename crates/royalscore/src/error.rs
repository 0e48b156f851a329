//! Unified error type for the gateway.

use royalscore_deck::DeckError;
use royalscore_protocol::ProtocolError;
use royalscore_room::RoomError;

/// Top-level error wrapping the layer-specific errors.
///
/// The `#[from]` attributes generate the `From` impls, so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Encode or decode failed at the protocol boundary.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-layer error surfaced past the per-action handling.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The deck provider could not be constructed or reached.
    #[error(transparent)]
    Deck(#[from] DeckError),

    /// The WebSocket handshake or framing failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Socket-level I/O failed (bind, accept).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
