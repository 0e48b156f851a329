//! One task per room.
//!
//! A [`RoomActor`] exclusively owns its [`Room`] and processes commands
//! one at a time from an mpsc channel. Deck calls are awaited inside the
//! loop, so any actions arriving while a shuffle or draw is in flight
//! simply queue behind it — per-room serialization with no locks, while
//! other rooms run in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use royalscore_deck::DeckProvider;
use royalscore_protocol::{PlayerId, Rank, RoomId, ServerEvent};

use crate::{GameConfig, Room, RoomError, RoomPhase};

/// Per-connection outbound channel; the gateway's writer task drains it.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands a room actor accepts.
///
/// Fire-and-forget actions (ready, draw, score, skip) report failures to
/// the acting connection as an `error` event rather than a reply.
enum RoomCommand {
    Join {
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<LeaveOutcome>,
    },
    Ready {
        player_id: PlayerId,
    },
    Draw {
        player_id: PlayerId,
    },
    Score {
        player_id: PlayerId,
        claimed: Option<Rank>,
    },
    Skip {
        player_id: PlayerId,
    },
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },
}

/// What a leave did, so the registry can drop empty rooms.
#[derive(Debug, Clone, Copy)]
pub struct LeaveOutcome {
    pub removed: bool,
    pub empty: bool,
}

/// Point-in-time room facts for the registry and status queries.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub phase: RoomPhase,
    pub player_count: usize,
    pub max_players: usize,
}

/// Cloneable handle to a running room actor.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    tx: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.room_id.clone())
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.tx.send(cmd).await.map_err(|_| self.unavailable())
    }

    /// Seats a player and registers their outbound channel.
    pub async fn join(
        &self,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Join {
            player_id,
            name,
            sender,
            reply,
        })
        .await?;
        rx.await.map_err(|_| self.unavailable())?
    }

    /// Removes a player; the actor stops itself when the room empties.
    pub async fn leave(&self, player_id: PlayerId) -> Result<LeaveOutcome, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Leave { player_id, reply }).await?;
        rx.await.map_err(|_| self.unavailable())
    }

    pub async fn ready(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.send(RoomCommand::Ready { player_id }).await
    }

    pub async fn draw(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.send(RoomCommand::Draw { player_id }).await
    }

    pub async fn score(
        &self,
        player_id: PlayerId,
        claimed: Option<Rank>,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Score { player_id, claimed }).await
    }

    pub async fn skip(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.send(RoomCommand::Skip { player_id }).await
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Info { reply }).await?;
        rx.await.map_err(|_| self.unavailable())
    }
}

/// Commands queued per room before senders see backpressure.
const COMMAND_BUFFER: usize = 64;

/// Spawns a room's actor task and returns the handle to drive it.
pub fn spawn_room<D: DeckProvider>(
    room_id: RoomId,
    max_players: usize,
    config: GameConfig,
    provider: Arc<D>,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let handle = RoomHandle {
        room_id: room_id.clone(),
        tx,
    };
    let actor = RoomActor {
        room: Room::new(room_id, max_players, config.max_rounds),
        config,
        provider,
        senders: HashMap::new(),
    };
    tokio::spawn(actor.run(rx));
    handle
}

struct RoomActor<D> {
    room: Room,
    config: GameConfig,
    provider: Arc<D>,
    senders: HashMap<PlayerId, PlayerSender>,
}

impl<D: DeckProvider> RoomActor<D> {
    async fn run(mut self, mut rx: mpsc::Receiver<RoomCommand>) {
        info!(room_id = %self.room.room_id(), "room actor started");
        while let Some(cmd) = rx.recv().await {
            if self.handle(cmd).await {
                break;
            }
        }
        info!(room_id = %self.room.room_id(), "room actor stopped");
    }

    /// Processes one command; `true` means the actor should stop.
    async fn handle(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Join {
                player_id,
                name,
                sender,
                reply,
            } => {
                let result = self.join(player_id, name, sender);
                let _ = reply.send(result);
                false
            }
            RoomCommand::Leave { player_id, reply } => {
                let outcome = self.leave(player_id);
                let _ = reply.send(outcome);
                outcome.empty
            }
            RoomCommand::Ready { player_id } => {
                self.ready(player_id).await;
                false
            }
            RoomCommand::Draw { player_id } => {
                self.draw(player_id).await;
                false
            }
            RoomCommand::Score { player_id, claimed } => {
                self.score(player_id, claimed);
                false
            }
            RoomCommand::Skip { player_id } => {
                self.skip(player_id);
                false
            }
            RoomCommand::Info { reply } => {
                let _ = reply.send(RoomInfo {
                    room_id: self.room.room_id().clone(),
                    phase: self.room.phase(),
                    player_count: self.room.player_count(),
                    max_players: self.room.max_players(),
                });
                false
            }
        }
    }

    // -- Delivery ----------------------------------------------------------

    fn broadcast(&self, event: ServerEvent) {
        for sender in self.senders.values() {
            let _ = sender.send(event.clone());
        }
    }

    fn send_to(&self, player_id: PlayerId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(event);
        }
    }

    fn reject(&self, player_id: PlayerId, err: &RoomError) {
        debug!(
            room_id = %self.room.room_id(),
            player_id = %player_id,
            error = %err,
            "action rejected"
        );
        self.send_to(
            player_id,
            ServerEvent::Error {
                message: err.to_string(),
            },
        );
    }

    // -- Commands ----------------------------------------------------------

    fn join(
        &mut self,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        self.room.add_player(player_id, name.clone())?;
        self.senders.insert(player_id, sender);
        info!(
            room_id = %self.room.room_id(),
            player_id = %player_id,
            name = %name,
            players = self.room.player_count(),
            "player joined"
        );
        self.broadcast(ServerEvent::PlayerJoined { player_name: name });
        self.broadcast(ServerEvent::RoomUpdate {
            state: self.room.snapshot(),
        });
        Ok(())
    }

    fn leave(&mut self, player_id: PlayerId) -> LeaveOutcome {
        self.senders.remove(&player_id);
        let removed = self.room.remove_player(player_id);
        if !removed {
            return LeaveOutcome {
                removed: false,
                empty: self.room.player_count() == 0,
            };
        }
        info!(
            room_id = %self.room.room_id(),
            player_id = %player_id,
            players = self.room.player_count(),
            "player left"
        );
        self.broadcast(ServerEvent::PlayerLeft { player_id });

        if self.room.player_count() == 0 {
            return LeaveOutcome {
                removed: true,
                empty: true,
            };
        }

        // A live game with one survivor cannot continue; they win by default.
        if self.room.phase() == RoomPhase::Active && self.room.player_count() == 1 {
            self.finish_game();
        } else {
            self.broadcast(ServerEvent::RoomUpdate {
                state: self.room.snapshot(),
            });
        }
        LeaveOutcome {
            removed: true,
            empty: false,
        }
    }

    async fn ready(&mut self, player_id: PlayerId) {
        if self.room.phase() != RoomPhase::Lobby {
            self.reject(player_id, &RoomError::AlreadyStarted);
            return;
        }
        if !self.room.set_ready(player_id) {
            self.reject(player_id, &RoomError::NotInRoom(player_id));
            return;
        }
        self.broadcast(ServerEvent::RoomUpdate {
            state: self.room.snapshot(),
        });

        if self.room.all_ready() {
            self.start_game(player_id).await;
        }
    }

    /// Shuffles a deck and flips the room to active. On provider failure
    /// the ready flags stay set, so any player readying again retries.
    async fn start_game(&mut self, initiator: PlayerId) {
        let shuffle = self.provider.shuffle(self.config.deck_count);
        let shuffled = match timeout(self.config.deck_timeout, shuffle).await {
            Ok(Ok(deck)) => deck,
            Ok(Err(err)) => {
                warn!(
                    room_id = %self.room.room_id(),
                    error = %err,
                    "deck shuffle failed, room stays in lobby"
                );
                self.reject(initiator, &RoomError::DeckProvider(err));
                return;
            }
            Err(_) => {
                warn!(
                    room_id = %self.room.room_id(),
                    "deck shuffle timed out, room stays in lobby"
                );
                self.reject(
                    initiator,
                    &RoomError::DeckProvider(royalscore_deck::DeckError::Timeout),
                );
                return;
            }
        };

        info!(
            room_id = %self.room.room_id(),
            deck = %shuffled.handle,
            remaining = shuffled.remaining,
            players = self.room.player_count(),
            "game started"
        );
        self.room.start(shuffled.handle, shuffled.remaining);
        self.broadcast(ServerEvent::GameStarted {
            state: self.room.snapshot(),
        });
    }

    async fn draw(&mut self, player_id: PlayerId) {
        if let Err(err) = self.check_turn(player_id) {
            self.reject(player_id, &err);
            return;
        }

        // Not enough cards for a full batch: the deck is spent and the
        // game ends instead of dealing short.
        if self.room.remaining_cards() < self.config.draw_count {
            info!(
                room_id = %self.room.room_id(),
                remaining = self.room.remaining_cards(),
                "deck exhausted, ending game"
            );
            self.finish_game();
            return;
        }

        let Some(handle) = self.room.deck().cloned() else {
            self.reject(player_id, &RoomError::GameNotActive);
            return;
        };
        let draw = self.provider.draw(&handle, self.config.draw_count);
        let drawn = match timeout(self.config.deck_timeout, draw).await {
            Ok(Ok(drawn)) => drawn,
            Ok(Err(err)) => {
                warn!(
                    room_id = %self.room.room_id(),
                    player_id = %player_id,
                    error = %err,
                    "draw failed, turn unchanged"
                );
                self.reject(player_id, &RoomError::DeckProvider(err));
                return;
            }
            Err(_) => {
                warn!(
                    room_id = %self.room.room_id(),
                    player_id = %player_id,
                    "draw timed out, turn unchanged"
                );
                self.reject(
                    player_id,
                    &RoomError::DeckProvider(royalscore_deck::DeckError::Timeout),
                );
                return;
            }
        };

        self.room.set_remaining(drawn.remaining);
        if !self.room.update_cards(player_id, drawn.cards.clone()) {
            warn!(
                room_id = %self.room.room_id(),
                player_id = %player_id,
                "drawer vanished before cards landed"
            );
            return;
        }
        debug!(
            room_id = %self.room.room_id(),
            player_id = %player_id,
            count = drawn.cards.len(),
            remaining = drawn.remaining,
            "cards drawn"
        );
        // Card contents go to the drawer only; everyone else sees counts.
        self.send_to(player_id, ServerEvent::CardsDrawn { cards: drawn.cards });
        self.broadcast(ServerEvent::RoomUpdate {
            state: self.room.snapshot(),
        });
    }

    fn score(&mut self, player_id: PlayerId, claimed: Option<Rank>) {
        if let Err(err) = self.check_turn(player_id) {
            self.reject(player_id, &err);
            return;
        }
        let Some(highest) = self.room.highest_card(player_id) else {
            self.reject(player_id, &RoomError::NoCardsHeld);
            return;
        };
        // The client's declared card is advisory; the server's recompute
        // from the actual hand is what scores.
        if let Some(claim) = claimed.filter(|c| *c != highest) {
            warn!(
                room_id = %self.room.room_id(),
                player_id = %player_id,
                claimed = %claim,
                actual = %highest,
                "client card claim mismatch, using server value"
            );
        }

        let points = highest.points();
        self.room.add_score(player_id, points);
        self.room.clear_cards(player_id);
        info!(
            room_id = %self.room.room_id(),
            player_id = %player_id,
            card = %highest,
            points,
            "hand scored"
        );
        self.broadcast(ServerEvent::TurnComplete {
            player_id,
            points,
            card: Some(highest),
            skipped: false,
        });
        self.advance_turn();
    }

    fn skip(&mut self, player_id: PlayerId) {
        if let Err(err) = self.check_turn(player_id) {
            self.reject(player_id, &err);
            return;
        }
        if self.room.highest_card(player_id).is_none() {
            self.reject(player_id, &RoomError::NoCardsHeld);
            return;
        }
        self.room.clear_cards(player_id);
        info!(
            room_id = %self.room.room_id(),
            player_id = %player_id,
            "hand skipped"
        );
        self.broadcast(ServerEvent::TurnComplete {
            player_id,
            points: 0,
            card: None,
            skipped: true,
        });
        self.advance_turn();
    }

    // -- Shared pieces -----------------------------------------------------

    fn check_turn(&self, player_id: PlayerId) -> Result<(), RoomError> {
        if self.room.phase() != RoomPhase::Active {
            return Err(RoomError::GameNotActive);
        }
        match self.room.current_player() {
            Some(p) if p.id == player_id => Ok(()),
            _ => Err(RoomError::NotYourTurn),
        }
    }

    /// Moves the turn pointer and ends the game when the round limit or
    /// the deck runs out; otherwise broadcasts the new state.
    fn advance_turn(&mut self) {
        self.room.next_turn();
        if self.room.game_over() || self.room.remaining_cards() < self.config.draw_count {
            self.finish_game();
        } else {
            self.broadcast(ServerEvent::RoomUpdate {
                state: self.room.snapshot(),
            });
        }
    }

    fn finish_game(&mut self) {
        self.room.finish();
        let winner = self.room.winner().map(|p| p.snapshot());
        info!(
            room_id = %self.room.room_id(),
            winner = winner.as_ref().map(|w| w.name.as_str()).unwrap_or("-"),
            "game over"
        );
        self.broadcast(ServerEvent::GameOver {
            winner,
            final_scores: self.room.final_scores(),
        });
    }
}
