//! Per-connection handler: one task reading actions, one task writing
//! events.
//!
//! The socket is split so room broadcasts never block on the read side.
//! Every event a room wants this player to see lands in an unbounded
//! channel; the writer task drains it and puts frames on the wire. When
//! the read loop ends for any reason the player is removed from their
//! room, so a dropped socket behaves exactly like an explicit leave.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use royalscore_deck::DeckProvider;
use royalscore_protocol::{ClientAction, Codec, JsonCodec, PlayerId, ServerEvent};
use royalscore_room::RoomError;

use crate::GatewayError;
use crate::server::ServerState;

pub(crate) async fn handle_connection<D: DeckProvider>(
    stream: TcpStream,
    player_id: PlayerId,
    state: &Arc<ServerState<D>>,
) -> Result<(), GatewayError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut sink, mut source) = ws.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let bytes = match JsonCodec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Binary(bytes.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(msg) = source.next().await {
        let data = match msg {
            Ok(Message::Binary(data)) => data.to_vec(),
            Ok(Message::Text(text)) => text.as_bytes().to_vec(),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // ping/pong/frame
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let action: ClientAction = match JsonCodec.decode(&data) {
            Ok(action) => action,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "undecodable action");
                send(
                    &tx,
                    ServerEvent::Error {
                        message: format!("invalid message: {e}"),
                    },
                );
                continue;
            }
        };

        dispatch(state, player_id, &tx, action).await;
    }

    // Socket gone: the player leaves whatever room they were in. Dropping
    // our tx afterwards lets the writer drain and stop.
    let _ = state.registry.leave(player_id).await;
    drop(tx);
    let _ = writer.await;

    tracing::debug!(%player_id, "connection closed");
    Ok(())
}

/// Routes one decoded action. Failures become `error` events for this
/// connection; room state is untouched by a rejected action.
async fn dispatch<D: DeckProvider>(
    state: &Arc<ServerState<D>>,
    player_id: PlayerId,
    tx: &mpsc::UnboundedSender<ServerEvent>,
    action: ClientAction,
) {
    match action {
        ClientAction::CreateRoom {
            player_name,
            max_players,
        } => {
            let result = state
                .registry
                .create_room(player_id, player_name, max_players, tx.clone())
                .await;
            match result {
                Ok(room_id) => send(tx, ServerEvent::RoomCreated { room_id, player_id }),
                Err(e) => send_error(tx, &e),
            }
        }

        ClientAction::JoinRoom {
            room_id,
            player_name,
        } => {
            let result = state
                .registry
                .join_room(&room_id, player_id, player_name, tx.clone())
                .await;
            match result {
                Ok(()) => send(tx, ServerEvent::RoomJoined { room_id, player_id }),
                Err(e) => send_error(tx, &e),
            }
        }

        ClientAction::PlayerReady => {
            room_action(state, player_id, tx, |h| async move { h.ready(player_id).await }).await;
        }

        ClientAction::DrawCards => {
            room_action(state, player_id, tx, |h| async move { h.draw(player_id).await }).await;
        }

        ClientAction::ScoreCards { highest_card } => {
            room_action(state, player_id, tx, |h| async move {
                h.score(player_id, Some(highest_card)).await
            })
            .await;
        }

        ClientAction::SkipHand => {
            room_action(state, player_id, tx, |h| async move { h.skip(player_id).await }).await;
        }

        ClientAction::LeaveRoom => {
            let _ = state.registry.leave(player_id).await;
        }

        ClientAction::Status => {
            send(
                tx,
                ServerEvent::Status {
                    rooms: state.registry.room_count(),
                    players: state.connections.load(Ordering::Relaxed),
                },
            );
        }
    }
}

/// Resolves the player's room handle and runs the action against it.
async fn room_action<D, F, Fut>(
    state: &Arc<ServerState<D>>,
    player_id: PlayerId,
    tx: &mpsc::UnboundedSender<ServerEvent>,
    f: F,
) where
    D: DeckProvider,
    F: FnOnce(royalscore_room::RoomHandle) -> Fut,
    Fut: Future<Output = Result<(), RoomError>>,
{
    let handle = match state.registry.handle_for(player_id) {
        Ok(handle) => handle,
        Err(e) => {
            send_error(tx, &e);
            return;
        }
    };
    if let Err(e) = f(handle).await {
        send_error(tx, &e);
    }
}

fn send(tx: &mpsc::UnboundedSender<ServerEvent>, event: ServerEvent) {
    let _ = tx.send(event);
}

fn send_error(tx: &mpsc::UnboundedSender<ServerEvent>, err: &RoomError) {
    send(
        tx,
        ServerEvent::Error {
            message: err.to_string(),
        },
    );
}
