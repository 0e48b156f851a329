//! # Royal Score server
//!
//! A WebSocket gateway for the Royal Score card game: players create
//! rooms, share the six-character code, ready up, and take turns drawing
//! and scoring hands until the rounds or the deck run out.
//!
//! The layers underneath:
//!
//! - [`royalscore_protocol`] — wire types and the JSON codec
//! - [`royalscore_deck`] — the deck provider boundary ([`LocalDeck`],
//!   [`HttpDeck`])
//! - [`royalscore_room`] — room state machines, one actor task per room
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use royalscore::{LocalDeck, ServerBuilder};
//!
//! # async fn run() -> Result<(), royalscore::GatewayError> {
//! let server = ServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(LocalDeck::new())
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::GatewayError;
pub use server::{Server, ServerBuilder};

pub use royalscore_deck::{DeckProvider, HttpDeck, LocalDeck};
pub use royalscore_protocol::{ClientAction, ServerEvent};
pub use royalscore_room::GameConfig;
