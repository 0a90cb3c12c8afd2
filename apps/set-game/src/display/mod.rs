//! Display surface: fire-and-forget notifications out of the game core.
//!
//! The core never waits on, or reads anything back from, a sink. Calls are
//! made from player tasks, the dealer task, and from inside board position
//! locks, so implementations must be cheap and must not block.

use std::time::Duration;

use tracing::{debug, info};

use crate::domain::{CardId, PlayerId, Position};

pub trait DisplaySink: Send + Sync {
    fn on_card_placed(&self, card: CardId, position: Position);
    fn on_card_removed(&self, position: Position);
    fn on_token_placed(&self, player: PlayerId, position: Position);
    fn on_token_removed(&self, player: PlayerId, position: Position);
    fn on_score_changed(&self, player: PlayerId, score: u32);
    /// `remaining` of zero ends the freeze.
    fn on_freeze(&self, player: PlayerId, remaining: Duration);
    fn on_countdown(&self, remaining: Duration, warning: bool);
    fn on_game_over(&self, winners: &[PlayerId]);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn on_card_placed(&self, _card: CardId, _position: Position) {}
    fn on_card_removed(&self, _position: Position) {}
    fn on_token_placed(&self, _player: PlayerId, _position: Position) {}
    fn on_token_removed(&self, _player: PlayerId, _position: Position) {}
    fn on_score_changed(&self, _player: PlayerId, _score: u32) {}
    fn on_freeze(&self, _player: PlayerId, _remaining: Duration) {}
    fn on_countdown(&self, _remaining: Duration, _warning: bool) {}
    fn on_game_over(&self, _winners: &[PlayerId]) {}
}

/// Renders notifications as tracing events under the `display` target.
///
/// Board and token churn is logged at debug level; scores and the final
/// result at info. Countdown ticks are only logged when they cross a whole
/// second or enter the warning window, otherwise the warning-mode ticks would
/// flood the log.
#[derive(Debug, Default)]
pub struct LogDisplay {
    player_names: Vec<String>,
}

impl LogDisplay {
    pub fn new(player_names: Vec<String>) -> Self {
        Self { player_names }
    }

    fn name(&self, player: PlayerId) -> String {
        self.player_names
            .get(player)
            .cloned()
            .unwrap_or_else(|| format!("player-{player}"))
    }
}

impl DisplaySink for LogDisplay {
    fn on_card_placed(&self, card: CardId, position: Position) {
        debug!(target: "display", card, position, "card placed");
    }

    fn on_card_removed(&self, position: Position) {
        debug!(target: "display", position, "card removed");
    }

    fn on_token_placed(&self, player: PlayerId, position: Position) {
        debug!(target: "display", player = %self.name(player), position, "token placed");
    }

    fn on_token_removed(&self, player: PlayerId, position: Position) {
        debug!(target: "display", player = %self.name(player), position, "token removed");
    }

    fn on_score_changed(&self, player: PlayerId, score: u32) {
        info!(target: "display", player = %self.name(player), score, "score changed");
    }

    fn on_freeze(&self, player: PlayerId, remaining: Duration) {
        debug!(
            target: "display",
            player = %self.name(player),
            remaining_ms = remaining.as_millis() as u64,
            "freeze"
        );
    }

    fn on_countdown(&self, remaining: Duration, warning: bool) {
        if remaining.subsec_millis() < 10 || (warning && remaining.subsec_millis() % 100 < 10) {
            debug!(
                target: "display",
                remaining_ms = remaining.as_millis() as u64,
                warning,
                "countdown"
            );
        }
    }

    fn on_game_over(&self, winners: &[PlayerId]) {
        let names: Vec<String> = winners.iter().map(|&p| self.name(p)).collect();
        info!(target: "display", winners = ?names, "game over");
    }
}
