//! Random strategy - presses any position, card or not.

use std::sync::Mutex;

use rand::prelude::*;

use super::trait_def::{IntentStrategy, StrategyError, TableView};
use crate::domain::Position;

/// Presses uniformly random positions.
///
/// The baseline opponent: it toggles markers on and off at random and
/// completes claims by accident, which is exactly the load the dealer's claim
/// queue has to cope with.
pub struct RandomIntents {
    rng: Mutex<StdRng>,
}

impl RandomIntents {
    pub const NAME: &'static str = "random";
    pub const VERSION: &'static str = "1.0.0";

    /// `Some(seed)` for reproducible presses, `None` for OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl IntentStrategy for RandomIntents {
    fn next_intent(&self, view: &TableView) -> Result<Option<Position>, StrategyError> {
        if view.cards.is_empty() {
            return Err(StrategyError::EmptyBoard);
        }

        let mut rng = self
            .rng
            .lock()
            .map_err(|e| StrategyError::Internal(format!("RNG lock poisoned: {e}")))?;

        Ok(Some(rng.random_range(0..view.cards.len())))
    }
}
