//! Intent strategy trait definition.

use std::fmt;

use crate::domain::{CardId, Position};

/// Errors a strategy can report instead of an intent.
#[derive(Debug)]
pub enum StrategyError {
    /// Strategy encountered an internal error
    Internal(String),
    /// The board has no positions to press
    EmptyBoard,
}

impl fmt::Display for StrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyError::Internal(msg) => write!(f, "strategy internal error: {msg}"),
            StrategyError::EmptyBoard => write!(f, "board has no positions"),
        }
    }
}

impl std::error::Error for StrategyError {}

/// What an automated player can see when choosing its next press.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    /// Card per position; positions busy mid-update read as empty.
    pub cards: Vec<Option<CardId>>,
    /// Positions this player currently has markers on.
    pub claimed: Vec<Position>,
}

/// Chooses positions for a computer player.
///
/// Called from the player's intent generator at a fixed cadence while the
/// player accepts intents. `Ok(None)` means "nothing to press right now".
/// Methods take `&self`; implementations keep mutable state (RNG, plans)
/// behind a `Mutex`.
pub trait IntentStrategy: Send + Sync {
    fn next_intent(&self, view: &TableView) -> Result<Option<Position>, StrategyError>;
}
