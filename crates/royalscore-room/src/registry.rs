//! Room-code allocation and the room/player indexes.
//!
//! The registry is the single source of truth for which rooms exist and
//! which room each player is in. Its maps sit behind a plain mutex that
//! is held only for the map operations themselves — every await on a
//! room actor happens with the lock released, so a room parked inside a
//! slow deck call cannot stall creates, joins, or leaves against other
//! rooms.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use rand::Rng;
use tracing::info;

use royalscore_deck::DeckProvider;
use royalscore_protocol::{PlayerId, RoomId};

use crate::actor::{LeaveOutcome, PlayerSender, RoomHandle, spawn_room};
use crate::{GameConfig, RoomError};

/// Alphabet for room codes. No lowercase and no punctuation, so codes
/// survive being read out loud or typed from a phone.
const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 6;

#[derive(Default)]
struct Maps {
    rooms: HashMap<RoomId, RoomHandle>,
    player_rooms: HashMap<PlayerId, RoomId>,
}

pub struct Registry<D> {
    maps: Mutex<Maps>,
    provider: Arc<D>,
    config: GameConfig,
}

impl<D: DeckProvider> Registry<D> {
    pub fn new(provider: Arc<D>, config: GameConfig) -> Self {
        Self {
            maps: Mutex::new(Maps::default()),
            provider,
            config,
        }
    }

    fn maps(&self) -> MutexGuard<'_, Maps> {
        self.maps.lock().expect("registry lock poisoned")
    }

    pub fn room_count(&self) -> usize {
        self.maps().rooms.len()
    }

    /// Players currently seated in a room (not total connections).
    pub fn player_count(&self) -> usize {
        self.maps().player_rooms.len()
    }

    /// The handle for the room a player is in.
    pub fn handle_for(&self, player_id: PlayerId) -> Result<RoomHandle, RoomError> {
        let maps = self.maps();
        let room_id = maps
            .player_rooms
            .get(&player_id)
            .ok_or(RoomError::NotInRoom(player_id))?;
        maps.rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    /// Spawns a fresh room under a new code and seats the creator.
    pub async fn create_room(
        &self,
        player_id: PlayerId,
        name: String,
        max_players: usize,
        sender: PlayerSender,
    ) -> Result<RoomId, RoomError> {
        let (room_id, handle) = {
            let mut maps = self.maps();
            if maps.player_rooms.contains_key(&player_id) {
                return Err(RoomError::AlreadyInRoom(player_id));
            }
            let room_id = fresh_code(&maps.rooms);
            let handle = spawn_room(
                room_id.clone(),
                max_players,
                self.config.clone(),
                Arc::clone(&self.provider),
            );
            maps.rooms.insert(room_id.clone(), handle.clone());
            maps.player_rooms.insert(player_id, room_id.clone());
            (room_id, handle)
        };

        // A freshly spawned room is empty, so the creator's join can only
        // fail if the actor itself died; roll the maps back if it did.
        if let Err(e) = handle.join(player_id, name, sender).await {
            let mut maps = self.maps();
            maps.rooms.remove(&room_id);
            maps.player_rooms.remove(&player_id);
            return Err(e);
        }

        info!(
            room_id = %room_id,
            player_id = %player_id,
            rooms = self.room_count(),
            "room created"
        );
        Ok(room_id)
    }

    /// Seats a player in an existing room by code.
    pub async fn join_room(
        &self,
        room_id: &RoomId,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let handle = {
            let maps = self.maps();
            if maps.player_rooms.contains_key(&player_id) {
                return Err(RoomError::AlreadyInRoom(player_id));
            }
            maps.rooms
                .get(room_id)
                .cloned()
                .ok_or_else(|| RoomError::NotFound(room_id.clone()))?
        };
        handle.join(player_id, name, sender).await?;
        self.maps().player_rooms.insert(player_id, room_id.clone());
        Ok(())
    }

    /// Removes a player from their room, dropping the room once empty.
    ///
    /// Covers both explicit `leaveRoom` and socket disconnect; returns
    /// `None` when the player wasn't in a room.
    pub async fn leave(&self, player_id: PlayerId) -> Option<(RoomId, LeaveOutcome)> {
        let (room_id, handle) = {
            let mut maps = self.maps();
            let room_id = maps.player_rooms.remove(&player_id)?;
            let handle = maps.rooms.get(&room_id).cloned();
            (room_id, handle)
        };
        let handle = handle?;

        let outcome = match handle.leave(player_id).await {
            Ok(outcome) => outcome,
            // Actor already gone; treat as emptied.
            Err(_) => LeaveOutcome {
                removed: false,
                empty: true,
            },
        };
        if outcome.empty {
            self.maps().rooms.remove(&room_id);
            info!(
                room_id = %room_id,
                rooms = self.room_count(),
                "empty room destroyed"
            );
        }
        Some((room_id, outcome))
    }
}

/// A random 6-character code not currently in use. Collisions are
/// vanishingly rare at any realistic room count, so regenerate-and-retry
/// is enough.
fn fresh_code(rooms: &HashMap<RoomId, RoomHandle>) -> RoomId {
    let mut rng = rand::rng();
    loop {
        let code: String = (0..CODE_LEN)
            .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
            .collect();
        let candidate = RoomId(code);
        if !rooms.contains_key(&candidate) {
            return candidate;
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
