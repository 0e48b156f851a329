//! The deck provider boundary.
//!
//! Rooms never shuffle or deal cards themselves — they ask a
//! [`DeckProvider`], which is an external collaborator exactly like an
//! auth provider would be: the game depends on its contract ("shuffle N
//! decks, draw K cards, report the remainder"), not its implementation.
//!
//! Two implementations ship here:
//!
//! - [`LocalDeck`] — in-process shuffled decks; used in tests and
//!   standalone deployments with no external dependency.
//! - [`HttpDeck`] — a client for a deck-of-cards REST service, with a
//!   bounded request timeout (behind the `http` feature, on by default).

mod error;
#[cfg(feature = "http")]
mod http;
mod local;
mod provider;

pub use error::DeckError;
#[cfg(feature = "http")]
pub use http::HttpDeck;
pub use local::LocalDeck;
pub use provider::{DeckHandle, DeckProvider, Drawn, ShuffledDeck};
