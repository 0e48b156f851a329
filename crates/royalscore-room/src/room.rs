//! The pure room state machine.
//!
//! `Room` owns one game's full state — roster, turn pointer, round
//! counter, deck supply — and exposes transition methods with explicit
//! contracts. No I/O happens here; the actor layer drives it and handles
//! deck calls and broadcasting.

use royalscore_deck::DeckHandle;
use royalscore_protocol::{Card, PlayerId, PlayerSnapshot, Rank, RoomId, RoomSnapshot};

use crate::RoomError;

/// Lifecycle phase of a room. Transitions are one-directional:
/// `Lobby → Active → Finished`, with [`Room::reset`] as the only way
/// back to `Lobby`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    Lobby,
    Active,
    Finished,
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Active => write!(f, "Active"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

/// One seated player. Owned by its room; identity is the connection id.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    pub cards: Vec<Card>,
    pub ready: bool,
}

impl Player {
    fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            score: 0,
            cards: Vec::new(),
            ready: false,
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id,
            name: self.name.clone(),
            score: self.score,
            ready: self.ready,
            card_count: self.cards.len(),
        }
    }
}

/// One game session's complete state.
///
/// Invariants upheld by the methods here:
/// - `players` holds no duplicate ids; insertion order is turn order.
/// - `current_turn` is in bounds whenever the roster is non-empty.
/// - `score` only ever increases; `game_started` and `game_over` flip
///   false→true once (until an explicit [`reset`](Self::reset)).
#[derive(Debug)]
pub struct Room {
    room_id: RoomId,
    max_players: usize,
    players: Vec<Player>,
    deck: Option<DeckHandle>,
    remaining_cards: u32,
    current_turn: usize,
    current_round: u32,
    max_rounds: u32,
    game_started: bool,
    game_over: bool,
}

impl Room {
    pub fn new(room_id: RoomId, max_players: usize, max_rounds: u32) -> Self {
        Self {
            room_id,
            max_players: max_players.max(2),
            players: Vec::new(),
            deck: None,
            remaining_cards: 0,
            current_turn: 0,
            current_round: 1,
            max_rounds,
            game_started: false,
            game_over: false,
        }
    }

    // -- Accessors ---------------------------------------------------------

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn deck(&self) -> Option<&DeckHandle> {
        self.deck.as_ref()
    }

    pub fn remaining_cards(&self) -> u32 {
        self.remaining_cards
    }

    pub fn game_started(&self) -> bool {
        self.game_started
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn phase(&self) -> RoomPhase {
        if self.game_over {
            RoomPhase::Finished
        } else if self.game_started {
            RoomPhase::Active
        } else {
            RoomPhase::Lobby
        }
    }

    /// The player whose turn it is, or `None` on an empty roster.
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_turn)
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    // -- Roster ------------------------------------------------------------

    /// Seats a new player at the end of the turn order.
    ///
    /// The state machine accepts joins in any phase; a mid-game entrant
    /// simply enters the rotation with no cards and scores nothing until
    /// their first turn comes around.
    pub fn add_player(&mut self, id: PlayerId, name: String) -> Result<(), RoomError> {
        if self.players.len() >= self.max_players {
            return Err(RoomError::RoomFull(self.room_id.clone()));
        }
        if self.players.iter().any(|p| p.id == id) {
            return Err(RoomError::DuplicatePlayer(id, self.room_id.clone()));
        }
        self.players.push(Player::new(id, name));
        Ok(())
    }

    /// Removes a player by identity; returns whether removal occurred.
    ///
    /// The turn pointer is repaired so the turn passes to the next
    /// surviving player: removing someone earlier in the order shifts
    /// the pointer down, and removing the current player leaves the
    /// pointer on whoever was next (wrapping to the top of the roster).
    pub fn remove_player(&mut self, id: PlayerId) -> bool {
        let Some(idx) = self.players.iter().position(|p| p.id == id) else {
            return false;
        };
        self.players.remove(idx);

        if self.players.is_empty() {
            self.current_turn = 0;
        } else if idx < self.current_turn {
            self.current_turn -= 1;
        } else if self.current_turn >= self.players.len() {
            self.current_turn = 0;
        }
        true
    }

    // -- Lobby -------------------------------------------------------------

    /// Marks a player ready. No-op (`false`) if the player is absent.
    pub fn set_ready(&mut self, id: PlayerId) -> bool {
        match self.player_mut(id) {
            Some(p) => {
                p.ready = true;
                true
            }
            None => false,
        }
    }

    /// True iff at least two players are seated and every one is ready.
    pub fn all_ready(&self) -> bool {
        self.players.len() >= 2 && self.players.iter().all(|p| p.ready)
    }

    /// Transitions `Lobby → Active` with a freshly shuffled deck.
    pub fn start(&mut self, deck: DeckHandle, remaining: u32) {
        self.deck = Some(deck);
        self.remaining_cards = remaining;
        self.current_turn = 0;
        self.current_round = 1;
        self.game_started = true;
    }

    // -- Turn flow ---------------------------------------------------------

    /// Advances the turn pointer; a wrap back to the first player ends
    /// the round, and passing `max_rounds` ends the game.
    ///
    /// Callers must guard against an empty roster; on one this is a no-op.
    pub fn next_turn(&mut self) {
        if self.players.is_empty() {
            return;
        }
        self.current_turn = (self.current_turn + 1) % self.players.len();
        if self.current_turn == 0 {
            self.current_round += 1;
            if self.current_round > self.max_rounds {
                self.game_over = true;
            }
        }
    }

    /// Replaces a player's held cards. No-op (`false`) if absent.
    pub fn update_cards(&mut self, id: PlayerId, cards: Vec<Card>) -> bool {
        match self.player_mut(id) {
            Some(p) => {
                p.cards = cards;
                true
            }
            None => false,
        }
    }

    /// Empties a player's hand. No-op (`false`) if absent.
    pub fn clear_cards(&mut self, id: PlayerId) -> bool {
        self.update_cards(id, Vec::new())
    }

    /// Adds points to a player's score. Scoring only adds, so there is
    /// no negative-delta path. No-op (`false`) if absent.
    pub fn add_score(&mut self, id: PlayerId, points: u32) -> bool {
        match self.player_mut(id) {
            Some(p) => {
                p.score += points;
                true
            }
            None => false,
        }
    }

    /// The highest-ranked card a player holds, or `None` for an empty
    /// hand or absent player. This is the server's authoritative answer;
    /// client claims are validated against it, never trusted.
    pub fn highest_card(&self, id: PlayerId) -> Option<Rank> {
        self.player(id)?.cards.iter().map(|c| c.value).max()
    }

    /// Adopts the deck provider's reported remainder.
    pub fn set_remaining(&mut self, remaining: u32) {
        self.remaining_cards = remaining;
    }

    /// Transitions to `Finished`.
    pub fn finish(&mut self) {
        self.game_over = true;
    }

    /// The player with the strictly maximum score; ties go to whoever
    /// joined first (stable, deterministic — not a shared win).
    pub fn winner(&self) -> Option<&Player> {
        let mut best: Option<&Player> = None;
        for p in &self.players {
            if best.is_none_or(|b| p.score > b.score) {
                best = Some(p);
            }
        }
        best
    }

    /// Back to `Lobby` keeping the roster: scores, hands, ready flags,
    /// deck, and counters all clear.
    pub fn reset(&mut self) {
        for p in &mut self.players {
            p.score = 0;
            p.cards.clear();
            p.ready = false;
        }
        self.deck = None;
        self.remaining_cards = 0;
        self.current_turn = 0;
        self.current_round = 1;
        self.game_started = false;
        self.game_over = false;
    }

    // -- Projection --------------------------------------------------------

    /// The broadcast-safe projection: card counts only, no contents, no
    /// references into the room.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.room_id.clone(),
            players: self.players.iter().map(Player::snapshot).collect(),
            current_turn: self.current_turn,
            current_player: self.current_player().map(|p| p.id),
            game_started: self.game_started,
            game_over: self.game_over,
            remaining_cards: self.remaining_cards,
            current_round: self.current_round,
            max_rounds: self.max_rounds,
        }
    }

    /// Final standings in roster order, for `gameOver` payloads.
    pub fn final_scores(&self) -> Vec<PlayerSnapshot> {
        self.players.iter().map(Player::snapshot).collect()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use royalscore_protocol::{Card, Suit};

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    fn room_with(n: u64) -> Room {
        let mut room = Room::new(RoomId("TEST01".into()), 8, 10);
        for i in 1..=n {
            room.add_player(pid(i), format!("player-{i}")).unwrap();
        }
        room
    }

    fn card(rank: Rank) -> Card {
        Card::new(rank, Suit::Spades)
    }

    // -- add_player / remove_player ---------------------------------------

    #[test]
    fn test_add_player_appends_in_join_order() {
        let room = room_with(3);
        let ids: Vec<u64> = room.players().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_add_player_full_room_rejected() {
        let mut room = Room::new(RoomId("TEST01".into()), 2, 10);
        room.add_player(pid(1), "a".into()).unwrap();
        room.add_player(pid(2), "b".into()).unwrap();

        let result = room.add_player(pid(3), "c".into());
        assert!(matches!(result, Err(RoomError::RoomFull(_))));
        assert_eq!(room.player_count(), 2);
    }

    #[test]
    fn test_add_player_duplicate_rejected() {
        let mut room = room_with(2);
        let result = room.add_player(pid(1), "again".into());
        assert!(matches!(result, Err(RoomError::DuplicatePlayer(p, _)) if p == pid(1)));
    }

    #[test]
    fn test_new_player_starts_clean() {
        let room = room_with(1);
        let p = &room.players()[0];
        assert_eq!(p.score, 0);
        assert!(!p.ready);
        assert!(p.cards.is_empty());
    }

    #[test]
    fn test_remove_player_absent_returns_false() {
        let mut room = room_with(2);
        assert!(!room.remove_player(pid(99)));
        assert_eq!(room.player_count(), 2);
    }

    #[test]
    fn test_remove_before_current_shifts_pointer_down() {
        let mut room = room_with(3);
        room.next_turn(); // turn on player 2 (index 1)
        assert_eq!(room.current_player().unwrap().id, pid(2));

        assert!(room.remove_player(pid(1)));
        // Pointer still refers to player 2.
        assert_eq!(room.current_player().unwrap().id, pid(2));
    }

    #[test]
    fn test_remove_current_passes_turn_to_next_survivor() {
        let mut room = room_with(3);
        room.next_turn(); // player 2's turn
        assert!(room.remove_player(pid(2)));
        assert_eq!(room.current_player().unwrap().id, pid(3));
    }

    #[test]
    fn test_remove_current_at_end_wraps_to_first() {
        let mut room = room_with(3);
        room.next_turn();
        room.next_turn(); // player 3's turn (last index)
        assert!(room.remove_player(pid(3)));
        assert_eq!(room.current_player().unwrap().id, pid(1));
    }

    #[test]
    fn test_turn_pointer_always_in_bounds_after_removals() {
        let mut room = room_with(4);
        room.next_turn();
        room.next_turn();
        room.next_turn(); // last index
        for i in [4, 2, 1, 3] {
            room.remove_player(pid(i));
            if room.player_count() > 0 {
                assert!(room.current_player().is_some());
            }
        }
        assert!(room.current_player().is_none());
    }

    // -- ready / start -----------------------------------------------------

    #[test]
    fn test_all_ready_false_below_two_players() {
        let mut room = room_with(1);
        room.set_ready(pid(1));
        assert!(!room.all_ready(), "a lone ready player cannot start");
    }

    #[test]
    fn test_all_ready_requires_everyone() {
        let mut room = room_with(2);
        room.set_ready(pid(1));
        assert!(!room.all_ready());
        room.set_ready(pid(2));
        assert!(room.all_ready());
    }

    #[test]
    fn test_set_ready_absent_player_is_noop() {
        let mut room = room_with(2);
        assert!(!room.set_ready(pid(99)));
    }

    #[test]
    fn test_start_enters_active_phase() {
        let mut room = room_with(2);
        assert_eq!(room.phase(), RoomPhase::Lobby);

        room.start(DeckHandle::new("d1"), 104);

        assert_eq!(room.phase(), RoomPhase::Active);
        assert!(room.game_started());
        assert_eq!(room.remaining_cards(), 104);
        assert_eq!(room.current_player().unwrap().id, pid(1));
    }

    // -- next_turn ---------------------------------------------------------

    #[test]
    fn test_next_turn_full_cycle_returns_and_bumps_round() {
        let mut room = room_with(3);
        room.start(DeckHandle::new("d1"), 104);
        let before = room.snapshot();

        for _ in 0..3 {
            room.next_turn();
        }

        let after = room.snapshot();
        assert_eq!(after.current_turn, before.current_turn);
        assert_eq!(after.current_round, before.current_round + 1);
    }

    #[test]
    fn test_next_turn_past_max_rounds_ends_game() {
        let mut room = Room::new(RoomId("TEST01".into()), 8, 10);
        room.add_player(pid(1), "a".into()).unwrap();
        room.add_player(pid(2), "b".into()).unwrap();
        room.start(DeckHandle::new("d1"), 104);

        // 10 rounds of 2 turns each.
        for _ in 0..20 {
            assert!(!room.game_over());
            room.next_turn();
        }
        assert!(room.game_over());
        assert_eq!(room.phase(), RoomPhase::Finished);
    }

    #[test]
    fn test_next_turn_empty_roster_is_noop() {
        let mut room = room_with(0);
        room.next_turn();
        assert!(room.current_player().is_none());
    }

    // -- scoring -----------------------------------------------------------

    #[test]
    fn test_highest_card_picks_rank_maximum() {
        let mut room = room_with(2);
        room.update_cards(
            pid(1),
            vec![card(Rank::Seven), card(Rank::King), card(Rank::Three)],
        );
        assert_eq!(room.highest_card(pid(1)), Some(Rank::King));
    }

    #[test]
    fn test_highest_card_empty_hand_is_none() {
        let room = room_with(2);
        assert_eq!(room.highest_card(pid(1)), None);
        assert_eq!(room.highest_card(pid(99)), None);
    }

    #[test]
    fn test_score_accumulates_point_values() {
        let mut room = room_with(2);
        room.add_score(pid(1), Rank::Ace.points());
        room.add_score(pid(1), Rank::Two.points());
        assert_eq!(room.player(pid(1)).unwrap().score, 410);
    }

    #[test]
    fn test_add_score_absent_player_is_noop() {
        let mut room = room_with(1);
        assert!(!room.add_score(pid(99), 100));
    }

    #[test]
    fn test_winner_ace_beats_two() {
        let mut room = room_with(2);
        room.add_score(pid(1), Rank::Ace.points()); // 400
        room.add_score(pid(2), Rank::Two.points()); // 10
        assert_eq!(room.winner().unwrap().id, pid(1));
    }

    #[test]
    fn test_winner_tie_goes_to_earlier_seat() {
        let mut room = room_with(3);
        room.add_score(pid(2), 100);
        room.add_score(pid(3), 100);
        assert_eq!(room.winner().unwrap().id, pid(2));
    }

    #[test]
    fn test_winner_empty_roster_is_none() {
        let room = room_with(0);
        assert!(room.winner().is_none());
    }

    // -- cards -------------------------------------------------------------

    #[test]
    fn test_clear_cards_empties_hand() {
        let mut room = room_with(2);
        room.update_cards(pid(1), vec![card(Rank::Ace)]);
        assert!(room.clear_cards(pid(1)));
        assert!(room.player(pid(1)).unwrap().cards.is_empty());
    }

    // -- snapshot ----------------------------------------------------------

    #[test]
    fn test_snapshot_reports_card_counts_not_contents() {
        let mut room = room_with(2);
        room.update_cards(pid(1), vec![card(Rank::Ace), card(Rank::King)]);

        let snap = room.snapshot();
        assert_eq!(snap.players[0].card_count, 2);
        assert_eq!(snap.players[1].card_count, 0);
    }

    #[test]
    fn test_snapshot_current_player_none_when_empty() {
        let room = room_with(0);
        assert_eq!(room.snapshot().current_player, None);
    }

    // -- reset -------------------------------------------------------------

    #[test]
    fn test_reset_returns_to_lobby_keeping_roster() {
        let mut room = room_with(2);
        room.set_ready(pid(1));
        room.set_ready(pid(2));
        room.start(DeckHandle::new("d1"), 104);
        room.update_cards(pid(1), vec![card(Rank::Ace)]);
        room.add_score(pid(1), 400);
        room.finish();

        room.reset();

        assert_eq!(room.phase(), RoomPhase::Lobby);
        assert_eq!(room.player_count(), 2);
        let p1 = room.player(pid(1)).unwrap();
        assert_eq!(p1.score, 0);
        assert!(p1.cards.is_empty());
        assert!(!p1.ready);
        assert!(room.deck().is_none());
        assert_eq!(room.remaining_cards(), 0);
    }
}
