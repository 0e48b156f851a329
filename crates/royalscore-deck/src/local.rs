//! In-process deck provider.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use royalscore_protocol::{Card, Rank, Suit};
use tokio::sync::Mutex;

use crate::{DeckError, DeckHandle, DeckProvider, Drawn, ShuffledDeck};

/// A [`DeckProvider`] that shuffles and deals entirely in memory.
///
/// Decks are keyed by a random hex handle, so one provider instance can
/// serve any number of rooms concurrently. This is the default provider
/// for tests and standalone servers.
#[derive(Default)]
pub struct LocalDeck {
    decks: Mutex<HashMap<String, Vec<Card>>>,
}

impl LocalDeck {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeckProvider for LocalDeck {
    async fn shuffle(&self, deck_count: u32) -> Result<ShuffledDeck, DeckError> {
        let mut cards = Vec::with_capacity(52 * deck_count as usize);
        for _ in 0..deck_count {
            for suit in Suit::ALL {
                for value in Rank::ALL {
                    cards.push(Card::new(value, suit));
                }
            }
        }
        cards.shuffle(&mut rand::rng());

        let id = generate_handle();
        let remaining = cards.len() as u32;
        self.decks.lock().await.insert(id.clone(), cards);

        tracing::debug!(deck = %id, remaining, "shuffled local deck");
        Ok(ShuffledDeck {
            handle: DeckHandle::new(id),
            remaining,
        })
    }

    async fn draw(&self, handle: &DeckHandle, count: u32) -> Result<Drawn, DeckError> {
        let mut decks = self.decks.lock().await;
        let deck = decks
            .get_mut(handle.as_str())
            .ok_or_else(|| DeckError::UnknownDeck(handle.as_str().to_string()))?;

        let take = (count as usize).min(deck.len());
        let cards: Vec<Card> = deck.drain(deck.len() - take..).collect();
        let remaining = deck.len() as u32;

        Ok(Drawn { cards, remaining })
    }
}

/// Generates a random 16-character hex handle.
fn generate_handle() -> String {
    let bytes: [u8; 8] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// =========================================================================
// Tests
// =========================================================================
