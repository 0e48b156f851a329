//! Game configuration shared by all rooms on a server.

use std::time::Duration;

/// Tunables for a Royal Score game.
///
/// `max_players` is chosen per room at creation time; everything here is
/// server-wide.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Rounds played before the game ends (a round is one full pass of
    /// turns across the roster).
    pub max_rounds: u32,

    /// Cards dealt per draw. A deck with fewer than this left cannot
    /// serve another turn, which ends the game.
    pub draw_count: u32,

    /// Standard 52-card decks shuffled together per game.
    pub deck_count: u32,

    /// Time budget for a single deck provider call. On expiry the action
    /// fails with a reported error and the room is left unchanged.
    pub deck_timeout: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            draw_count: 5,
            deck_count: 2,
            deck_timeout: Duration::from_secs(5),
        }
    }
}
