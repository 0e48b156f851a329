//! HTTP deck provider: a client for deck-of-cards REST services.
//!
//! Endpoint shapes follow the service the original game used:
//!
//! ```text
//! GET {base}/new/shuffle/?deck_count=N   → { deck_id, remaining, success }
//! GET {base}/deck/{id}/draw/?count=K     → { cards, remaining, success }
//! ```

use std::time::Duration;

use royalscore_protocol::{Rank, Suit};
use serde::Deserialize;

use crate::{DeckError, DeckHandle, DeckProvider, Drawn, ShuffledDeck};

/// Default per-request time budget.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A [`DeckProvider`] backed by a remote deck service.
pub struct HttpDeck {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDeck {
    /// Creates a client for the service at `base_url` (no trailing slash)
    /// with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, DeckError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DeckError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeckError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, DeckError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        if !response.status().is_success() {
            return Err(DeckError::Unavailable(format!(
                "deck service answered {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DeckError::Malformed(e.to_string()))
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> DeckError {
    if e.is_timeout() {
        DeckError::Timeout
    } else {
        DeckError::Unavailable(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Wire shapes of the deck service
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ShuffleResponse {
    success: bool,
    deck_id: String,
    remaining: u32,
}

#[derive(Deserialize)]
struct DrawResponse {
    success: bool,
    cards: Vec<ApiCard>,
    remaining: u32,
}

#[derive(Deserialize)]
struct ApiCard {
    value: Rank,
    suit: Suit,
}

impl DeckProvider for HttpDeck {
    async fn shuffle(&self, deck_count: u32) -> Result<ShuffledDeck, DeckError> {
        let url = format!("{}/new/shuffle/?deck_count={deck_count}", self.base_url);
        let resp: ShuffleResponse = self.get_json(&url).await?;

        if !resp.success {
            return Err(DeckError::Unavailable("shuffle rejected".into()));
        }

        tracing::debug!(deck = %resp.deck_id, remaining = resp.remaining, "shuffled remote deck");
        Ok(ShuffledDeck {
            handle: DeckHandle::new(resp.deck_id),
            remaining: resp.remaining,
        })
    }

    async fn draw(&self, handle: &DeckHandle, count: u32) -> Result<Drawn, DeckError> {
        let url = format!(
            "{}/deck/{}/draw/?count={count}",
            self.base_url,
            handle.as_str()
        );
        let resp: DrawResponse = self.get_json(&url).await?;

        if !resp.success {
            return Err(DeckError::UnknownDeck(handle.as_str().to_string()));
        }

        Ok(Drawn {
            cards: resp
                .cards
                .into_iter()
                .map(|c| royalscore_protocol::Card::new(c.value, c.suit))
                .collect(),
            remaining: resp.remaining,
        })
    }
}
