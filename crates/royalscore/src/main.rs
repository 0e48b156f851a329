//! Standalone Royal Score server.
//!
//! Configuration comes from the environment:
//!
//! - `ROYALSCORE_ADDR` — listen address, default `127.0.0.1:8080`
//! - `ROYALSCORE_DECK_URL` — base URL of a deck-of-cards REST service;
//!   when unset, decks are shuffled in-process
//! - `RUST_LOG` — log filter, default `info`

use royalscore::{GatewayError, HttpDeck, LocalDeck, ServerBuilder};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), GatewayError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr =
        std::env::var("ROYALSCORE_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    match std::env::var("ROYALSCORE_DECK_URL") {
        Ok(url) => {
            tracing::info!(%url, "using remote deck service");
            let provider = HttpDeck::new(url)?;
            ServerBuilder::new().bind(&addr).build(provider).await?.run().await
        }
        Err(_) => {
            tracing::info!("using in-process decks");
            ServerBuilder::new()
                .bind(&addr)
                .build(LocalDeck::new())
                .await?
                .run()
                .await
        }
    }
}
