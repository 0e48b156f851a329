//! The [`DeckProvider`] trait and its data types.

use std::fmt;
use std::future::Future;

use royalscore_protocol::Card;

use crate::DeckError;

/// Opaque reference to a shuffled deck held by a provider.
///
/// For [`HttpDeck`](crate::HttpDeck) this is the service's deck id; for
/// [`LocalDeck`](crate::LocalDeck) it's a random key into the in-process
/// table. Rooms store it and hand it back on every draw.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeckHandle(String);

impl DeckHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeckHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deck-{}", self.0)
    }
}

/// Result of shuffling a fresh deck.
#[derive(Debug, Clone)]
pub struct ShuffledDeck {
    pub handle: DeckHandle,
    /// Cards available to draw, as reported by the provider.
    pub remaining: u32,
}

/// Result of a draw: the cards dealt and the provider's reported remainder.
///
/// The remainder is authoritative — rooms adopt it rather than doing their
/// own subtraction, so a provider that deals short (end of deck) stays
/// consistent.
#[derive(Debug, Clone)]
pub struct Drawn {
    pub cards: Vec<Card>,
    pub remaining: u32,
}

/// An external service that supplies shuffled decks and card draws.
///
/// Both operations are async and latency-bearing; callers bound them with
/// a timeout. A failed call must leave the provider-side deck unchanged
/// or the error marked unrecoverable — providers must not half-deal.
///
/// The methods return `impl Future + Send` rather than plain `async fn`
/// so callers can await them inside spawned tasks; implementations still
/// write ordinary `async fn`.
pub trait DeckProvider: Send + Sync + 'static {
    /// Shuffles `deck_count` standard 52-card decks together and returns
    /// a handle to the combined pile.
    fn shuffle(
        &self,
        deck_count: u32,
    ) -> impl Future<Output = Result<ShuffledDeck, DeckError>> + Send;

    /// Draws up to `count` cards from the deck behind `handle`.
    fn draw(
        &self,
        handle: &DeckHandle,
        count: u32,
    ) -> impl Future<Output = Result<Drawn, DeckError>> + Send;
}
