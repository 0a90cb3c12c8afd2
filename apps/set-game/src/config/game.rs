use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::env::{override_with, parse_flag, parse_var};
use crate::domain::seed_derivation::{derive_dealer_seed, derive_player_seed};
use crate::domain::{PlayerId, Position};
use crate::error::GameError;
use crate::players::strategy;

/// Feature values are carried as `u8`.
const MAX_FEATURE_SIZE: usize = u8::MAX as usize + 1;

/// Everything the game core reads from the outside world.
///
/// Read-only once the game starts. Loaded from a JSON file (or defaults),
/// then overridden by `SET_*` environment variables, then by CLI flags in
/// the binary, and finally checked with [`GameConfig::validate`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Players fed from console input; they get the lowest ids.
    pub human_players: usize,
    /// Players driven by an automated intent strategy.
    pub computer_players: usize,
    /// Optional display names, indexed by player id.
    pub player_names: Vec<String>,

    pub rows: usize,
    pub columns: usize,

    /// Distinct values per feature; also the number of cards in a set.
    pub feature_size: usize,
    /// Number of features encoded in a card id.
    pub feature_count: u32,
    /// Cards in play; `None` means every encodable card.
    pub deck_size: Option<usize>,

    /// Artificial latency applied to every card placement and removal.
    pub table_delay_ms: u64,
    pub turn_timeout_ms: u64,
    /// Remaining time below which the countdown is shown as a warning.
    pub turn_timeout_warning_ms: u64,
    pub point_freeze_ms: u64,
    pub penalty_freeze_ms: u64,

    /// Log every valid set on the board after each deal.
    pub hints: bool,

    /// Registered strategy name used by computer players.
    pub computer_strategy: String,
    /// Cadence of automated intents.
    pub computer_intent_interval_ms: u64,

    /// Countdown refresh period outside the warning window.
    pub countdown_tick_ms: u64,
    /// Countdown refresh period inside the warning window.
    pub warning_tick_ms: u64,

    /// Base seed for deterministic dealing and automated players.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            human_players: 0,
            computer_players: 2,
            player_names: Vec::new(),
            rows: 3,
            columns: 4,
            feature_size: 3,
            feature_count: 4,
            deck_size: None,
            table_delay_ms: 100,
            turn_timeout_ms: 60_000,
            turn_timeout_warning_ms: 5_000,
            point_freeze_ms: 1_000,
            penalty_freeze_ms: 3_000,
            hints: false,
            computer_strategy: "random".to_string(),
            computer_intent_interval_ms: 10,
            countdown_tick_ms: 1_000,
            warning_tick_ms: 10,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load from an optional JSON file, then apply environment overrides.
    ///
    /// Does not validate; callers validate after applying their own
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, GameError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, GameError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GameError::io(format!("reading {}", path.display()), e))?;
        serde_json::from_str(&raw)
            .map_err(|e| GameError::config(format!("parsing {}: {e}", path.display())))
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), GameError> {
        override_with("SET_HUMAN_PLAYERS", &mut self.human_players)?;
        override_with("SET_COMPUTER_PLAYERS", &mut self.computer_players)?;
        override_with("SET_ROWS", &mut self.rows)?;
        override_with("SET_COLUMNS", &mut self.columns)?;
        if let Some(deck_size) = parse_var::<usize>("SET_DECK_SIZE")? {
            self.deck_size = Some(deck_size);
        }
        override_with("SET_TABLE_DELAY_MS", &mut self.table_delay_ms)?;
        override_with("SET_TURN_TIMEOUT_MS", &mut self.turn_timeout_ms)?;
        override_with(
            "SET_TURN_TIMEOUT_WARNING_MS",
            &mut self.turn_timeout_warning_ms,
        )?;
        override_with("SET_POINT_FREEZE_MS", &mut self.point_freeze_ms)?;
        override_with("SET_PENALTY_FREEZE_MS", &mut self.penalty_freeze_ms)?;
        if let Some(hints) = parse_flag("SET_HINTS")? {
            self.hints = hints;
        }
        override_with("SET_COMPUTER_STRATEGY", &mut self.computer_strategy)?;
        if let Some(seed) = parse_var::<u64>("SET_SEED")? {
            self.seed = Some(seed);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.players() == 0 {
            return Err(GameError::config("at least one player is required"));
        }
        if self.rows == 0 || self.columns == 0 {
            return Err(GameError::config("rows and columns must be at least 1"));
        }
        if self.feature_size < 2 {
            return Err(GameError::config("feature_size must be at least 2"));
        }
        if self.feature_size > MAX_FEATURE_SIZE {
            return Err(GameError::config(format!(
                "feature_size must be at most {MAX_FEATURE_SIZE}"
            )));
        }
        if self.feature_count == 0 {
            return Err(GameError::config("feature_count must be at least 1"));
        }
        let Some(max_deck) = self.max_deck_size() else {
            return Err(GameError::config(format!(
                "feature_size^feature_count overflows ({}^{})",
                self.feature_size, self.feature_count
            )));
        };
        if max_deck > u32::MAX as usize {
            return Err(GameError::config("deck does not fit card identifiers"));
        }
        if let Some(deck_size) = self.deck_size {
            if deck_size > max_deck {
                return Err(GameError::config(format!(
                    "deck_size {deck_size} exceeds the {max_deck} encodable cards"
                )));
            }
        }
        if self.turn_timeout_ms == 0 {
            return Err(GameError::config("turn_timeout_ms must be positive"));
        }
        if self.turn_timeout_warning_ms >= self.turn_timeout_ms {
            return Err(GameError::config(
                "turn_timeout_warning_ms must be below turn_timeout_ms",
            ));
        }
        if self.countdown_tick_ms == 0 || self.warning_tick_ms == 0 {
            return Err(GameError::config("countdown ticks must be positive"));
        }
        if self.computer_players > 0 && strategy::by_name(&self.computer_strategy).is_none() {
            return Err(GameError::config(format!(
                "unknown computer_strategy '{}'",
                self.computer_strategy
            )));
        }
        Ok(())
    }

    pub fn players(&self) -> usize {
        self.human_players + self.computer_players
    }

    pub fn table_size(&self) -> usize {
        self.rows * self.columns
    }

    pub fn set_size(&self) -> usize {
        self.feature_size
    }

    pub fn max_deck_size(&self) -> Option<usize> {
        self.feature_size.checked_pow(self.feature_count)
    }

    pub fn deck_size(&self) -> usize {
        self.deck_size
            .or_else(|| self.max_deck_size())
            .unwrap_or_default()
    }

    pub fn is_human(&self, player: PlayerId) -> bool {
        player < self.human_players
    }

    pub fn player_name(&self, player: PlayerId) -> String {
        self.player_names
            .get(player)
            .cloned()
            .unwrap_or_else(|| format!("Player {}", player + 1))
    }

    /// Row and column of a position, row-major.
    pub fn grid_coordinates(&self, position: Position) -> (usize, usize) {
        (position / self.columns, position % self.columns)
    }

    pub fn table_delay(&self) -> Duration {
        Duration::from_millis(self.table_delay_ms)
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_ms)
    }

    pub fn turn_timeout_warning(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_warning_ms)
    }

    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_ms)
    }

    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_ms)
    }

    pub fn computer_intent_interval(&self) -> Duration {
        Duration::from_millis(self.computer_intent_interval_ms)
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }

    pub fn warning_tick(&self) -> Duration {
        Duration::from_millis(self.warning_tick_ms)
    }

    pub fn dealer_seed(&self) -> Option<u64> {
        self.seed.map(derive_dealer_seed)
    }

    pub fn player_seed(&self, player: PlayerId) -> Option<u64> {
        self.seed.map(|seed| derive_player_seed(seed, player))
    }
}
