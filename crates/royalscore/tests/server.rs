//! Full-stack tests: real server, real WebSocket clients, in-process
//! decks.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use royalscore::{ClientAction, LocalDeck, ServerBuilder, ServerEvent};
use royalscore_protocol::Rank;

// -------------------------------------------------------------------------
// Harness
// -------------------------------------------------------------------------

async fn start_server() -> std::net::SocketAddr {
    let server = ServerBuilder::new()
        .bind("127.0.0.1:0")
        .build(LocalDeck::new())
        .await
        .expect("bind failed");
    let addr = server.local_addr().expect("no local addr");
    tokio::spawn(server.run());
    addr
}

struct Client {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Client {
    async fn connect(addr: std::net::SocketAddr) -> Self {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("connect failed");
        Self { ws }
    }

    async fn send(&mut self, action: &ClientAction) {
        let bytes = serde_json::to_vec(action).unwrap();
        self.ws
            .send(Message::Binary(bytes.into()))
            .await
            .expect("send failed");
    }

    async fn send_raw(&mut self, data: &[u8]) {
        self.ws
            .send(Message::Binary(data.to_vec().into()))
            .await
            .expect("send failed");
    }

    /// Next decoded event, skipping control frames.
    async fn next_event(&mut self) -> ServerEvent {
        timeout(Duration::from_secs(2), async {
            loop {
                let msg = self
                    .ws
                    .next()
                    .await
                    .expect("socket closed")
                    .expect("socket error");
                match msg {
                    Message::Binary(data) => {
                        return serde_json::from_slice(&data).expect("bad event json");
                    }
                    Message::Text(text) => {
                        return serde_json::from_str(text.as_str()).expect("bad event json");
                    }
                    _ => continue,
                }
            }
        })
        .await
        .expect("timed out waiting for event")
    }

    async fn wait_for(&mut self, what: &str, pred: impl Fn(&ServerEvent) -> bool) -> ServerEvent {
        timeout(Duration::from_secs(2), async {
            loop {
                let event = self.next_event().await;
                if pred(&event) {
                    return event;
                }
            }
        })
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {what}"))
    }

    async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}

/// Creates a room via `creator` and seats `joiner` in it; returns the code.
async fn create_and_join(creator: &mut Client, joiner: &mut Client) -> String {
    creator
        .send(&ClientAction::CreateRoom {
            player_name: "alice".into(),
            max_players: 4,
        })
        .await;
    let event = creator
        .wait_for("roomCreated", |e| {
            matches!(e, ServerEvent::RoomCreated { .. })
        })
        .await;
    let ServerEvent::RoomCreated { room_id, .. } = event else {
        unreachable!()
    };

    joiner
        .send(&ClientAction::JoinRoom {
            room_id: room_id.clone(),
            player_name: "bob".into(),
        })
        .await;
    joiner
        .wait_for("roomJoined", |e| matches!(e, ServerEvent::RoomJoined { .. }))
        .await;

    room_id.as_str().to_string()
}

// -------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------

#[tokio::test]
async fn test_create_room_returns_shareable_code() {
    let addr = start_server().await;
    let mut alice = Client::connect(addr).await;

    alice
        .send(&ClientAction::CreateRoom {
            player_name: "alice".into(),
            max_players: 4,
        })
        .await;

    let event = alice
        .wait_for("roomCreated", |e| {
            matches!(e, ServerEvent::RoomCreated { .. })
        })
        .await;
    let ServerEvent::RoomCreated { room_id, .. } = event else {
        unreachable!()
    };
    assert_eq!(room_id.as_str().len(), 6);
    assert!(
        room_id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    );
}

#[tokio::test]
async fn test_join_unknown_room_reports_error() {
    let addr = start_server().await;
    let mut bob = Client::connect(addr).await;

    bob.send(&ClientAction::JoinRoom {
        room_id: royalscore_protocol::RoomId("ZZZZZZ".into()),
        player_name: "bob".into(),
    })
    .await;

    let event = bob
        .wait_for("error", |e| matches!(e, ServerEvent::Error { .. }))
        .await;
    let ServerEvent::Error { message } = event else {
        unreachable!()
    };
    assert!(message.contains("ZZZZZZ"), "got: {message}");
}

#[tokio::test]
async fn test_undecodable_message_reports_error_and_keeps_socket() {
    let addr = start_server().await;
    let mut alice = Client::connect(addr).await;

    alice.send_raw(b"not json at all").await;
    alice
        .wait_for("error", |e| matches!(e, ServerEvent::Error { .. }))
        .await;

    // The connection survives bad input.
    alice
        .send(&ClientAction::CreateRoom {
            player_name: "alice".into(),
            max_players: 4,
        })
        .await;
    alice
        .wait_for("roomCreated", |e| {
            matches!(e, ServerEvent::RoomCreated { .. })
        })
        .await;
}

#[tokio::test]
async fn test_status_counts_rooms_and_connections() {
    let addr = start_server().await;
    let mut alice = Client::connect(addr).await;
    let mut bob = Client::connect(addr).await;
    create_and_join(&mut alice, &mut bob).await;

    // The observer is connected but in no room; it still counts.
    let mut observer = Client::connect(addr).await;
    observer.send(&ClientAction::Status).await;

    let event = observer
        .wait_for("status", |e| matches!(e, ServerEvent::Status { .. }))
        .await;
    assert_eq!(
        event,
        ServerEvent::Status {
            rooms: 1,
            players: 3
        }
    );
}

#[tokio::test]
async fn test_full_game_turn_over_websockets() {
    let addr = start_server().await;
    let mut alice = Client::connect(addr).await;
    let mut bob = Client::connect(addr).await;
    create_and_join(&mut alice, &mut bob).await;

    alice.send(&ClientAction::PlayerReady).await;
    bob.send(&ClientAction::PlayerReady).await;
    for client in [&mut alice, &mut bob] {
        let event = client
            .wait_for("gameStarted", |e| {
                matches!(e, ServerEvent::GameStarted { .. })
            })
            .await;
        let ServerEvent::GameStarted { state } = event else {
            unreachable!()
        };
        assert_eq!(state.remaining_cards, 104, "two shuffled decks");
        assert_eq!(state.current_round, 1);
    }

    // Creator goes first and privately receives the hand.
    alice.send(&ClientAction::DrawCards).await;
    let event = alice
        .wait_for("cardsDrawn", |e| matches!(e, ServerEvent::CardsDrawn { .. }))
        .await;
    let ServerEvent::CardsDrawn { cards } = event else {
        unreachable!()
    };
    assert_eq!(cards.len(), 5);
    let expected_points = cards.iter().map(|c| c.value).max().unwrap().points();

    // Bob sees only the count move.
    let update = bob
        .wait_for("roomUpdate with cards", |e| {
            matches!(e, ServerEvent::RoomUpdate { state } if state.players[0].card_count == 5)
        })
        .await;
    let ServerEvent::RoomUpdate { state } = update else {
        unreachable!()
    };
    assert_eq!(state.remaining_cards, 99);

    // The client's claim is ignored in favor of the server's own count.
    alice
        .send(&ClientAction::ScoreCards {
            highest_card: Rank::Two,
        })
        .await;
    let event = bob
        .wait_for("turnComplete", |e| {
            matches!(e, ServerEvent::TurnComplete { .. })
        })
        .await;
    let ServerEvent::TurnComplete {
        points, skipped, ..
    } = event
    else {
        unreachable!()
    };
    assert_eq!(points, expected_points);
    assert!(!skipped);

    // Turn passes to bob.
    let update = bob
        .wait_for("post-score roomUpdate", |e| {
            matches!(e, ServerEvent::RoomUpdate { state } if state.current_turn == 1)
        })
        .await;
    let ServerEvent::RoomUpdate { state } = update else {
        unreachable!()
    };
    assert_eq!(state.players[0].score, expected_points);
    assert_eq!(state.players[0].card_count, 0);
}

#[tokio::test]
async fn test_dropped_socket_behaves_like_leaving() {
    let addr = start_server().await;
    let mut alice = Client::connect(addr).await;
    let mut bob = Client::connect(addr).await;
    create_and_join(&mut alice, &mut bob).await;

    bob.close().await;

    alice
        .wait_for("playerLeft", |e| matches!(e, ServerEvent::PlayerLeft { .. }))
        .await;
    let update = alice
        .wait_for("roomUpdate after departure", |e| {
            matches!(e, ServerEvent::RoomUpdate { state } if state.players.len() == 1)
        })
        .await;
    let ServerEvent::RoomUpdate { state } = update else {
        unreachable!()
    };
    assert_eq!(state.players[0].name, "alice");
}

#[tokio::test]
async fn test_acting_without_a_room_reports_error() {
    let addr = start_server().await;
    let mut alice = Client::connect(addr).await;

    alice.send(&ClientAction::DrawCards).await;

    let event = alice
        .wait_for("error", |e| matches!(e, ServerEvent::Error { .. }))
        .await;
    let ServerEvent::Error { message } = event else {
        unreachable!()
    };
    assert!(message.contains("not in any room"), "got: {message}");
}
