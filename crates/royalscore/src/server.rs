//! Server builder and accept loop.
//!
//! Ties the layers together: WebSocket transport → protocol → registry →
//! room actors. Each accepted socket becomes a player identity and gets
//! its own handler task.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::net::TcpListener;

use royalscore_deck::DeckProvider;
use royalscore_protocol::PlayerId;
use royalscore_room::{GameConfig, Registry};

use crate::GatewayError;
use crate::handler::handle_connection;

/// Counter behind per-connection player ids.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Shared server state, one per process. The registry locks internally
/// and only around its map operations, so handler tasks never contend
/// on it while a room is busy.
pub(crate) struct ServerState<D> {
    pub(crate) registry: Registry<D>,
    /// Sockets currently connected, in a room or not. Backs the
    /// `status` player count.
    pub(crate) connections: AtomicUsize,
}

/// Builder for configuring and starting a server.
///
/// # Example
///
/// ```rust,no_run
/// use royalscore::{LocalDeck, ServerBuilder};
///
/// # async fn run() -> Result<(), royalscore::GatewayError> {
/// let server = ServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build(LocalDeck::new())
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ServerBuilder {
    bind_addr: String,
    config: GameConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            config: GameConfig::default(),
        }
    }

    /// Sets the address to bind to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Overrides the game configuration for all rooms.
    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the listener and assembles the server around the given deck
    /// provider.
    pub async fn build<D: DeckProvider>(self, provider: D) -> Result<Server<D>, GatewayError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "listening");

        let state = Arc::new(ServerState {
            registry: Registry::new(Arc::new(provider), self.config),
            connections: AtomicUsize::new(0),
        });
        Ok(Server { listener, state })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Royal Score server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct Server<D> {
    listener: TcpListener,
    state: Arc<ServerState<D>>,
}

impl<D: DeckProvider> Server<D> {
    /// The address the listener actually bound to (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), GatewayError> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let player_id =
                        PlayerId(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
                    tracing::debug!(%player_id, %addr, "accepted connection");

                    let state = Arc::clone(&self.state);
                    state.connections.fetch_add(1, Ordering::Relaxed);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, player_id, &state).await {
                            tracing::debug!(
                                %player_id,
                                error = %e,
                                "connection ended with error"
                            );
                        }
                        state.connections.fetch_sub(1, Ordering::Relaxed);
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
