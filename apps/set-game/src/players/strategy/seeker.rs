//! Set seeker - a computer player that actually looks at the cards.

use std::sync::{Arc, Mutex};

use rand::prelude::*;

use super::trait_def::{IntentStrategy, StrategyError, TableView};
use crate::domain::{CardId, Position, SetValidator};

/// Picks a random valid set on the board and presses its positions.
///
/// Markers that are not part of the current plan (left over from a penalty
/// or an invalidated claim) are toggled off first. The plan is dropped as
/// soon as any of its cards leaves its position.
pub struct SetSeeker {
    validator: Arc<dyn SetValidator>,
    plan: Mutex<Plan>,
}

struct Plan {
    rng: StdRng,
    target: Vec<(Position, CardId)>,
}

impl SetSeeker {
    pub const NAME: &'static str = "seeker";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(validator: Arc<dyn SetValidator>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            validator,
            plan: Mutex::new(Plan {
                rng,
                target: Vec::new(),
            }),
        }
    }
}

impl IntentStrategy for SetSeeker {
    fn next_intent(&self, view: &TableView) -> Result<Option<Position>, StrategyError> {
        if view.cards.is_empty() {
            return Err(StrategyError::EmptyBoard);
        }

        let mut guard = self
            .plan
            .lock()
            .map_err(|e| StrategyError::Internal(format!("plan lock poisoned: {e}")))?;
        let plan = &mut *guard;

        let still_there = plan
            .target
            .iter()
            .all(|&(position, card)| view.cards.get(position).copied().flatten() == Some(card));
        if !still_there {
            plan.target.clear();
        }

        if plan.target.is_empty() {
            let on_board: Vec<(Position, CardId)> = view
                .cards
                .iter()
                .enumerate()
                .filter_map(|(position, card)| card.map(|card| (position, card)))
                .collect();
            let ids: Vec<CardId> = on_board.iter().map(|&(_, card)| card).collect();
            let sets = self.validator.find_sets(&ids, usize::MAX);
            if let Some(set) = sets.choose(&mut plan.rng) {
                plan.target = set
                    .iter()
                    .filter_map(|card| on_board.iter().find(|(_, c)| c == card).copied())
                    .collect();
            }
        }

        let in_plan = |position: &Position| plan.target.iter().any(|(p, _)| p == position);
        if let Some(&stray) = view.claimed.iter().find(|p| !in_plan(p)) {
            return Ok(Some(stray));
        }

        Ok(plan
            .target
            .iter()
            .map(|&(position, _)| position)
            .find(|position| !view.claimed.contains(position)))
    }
}
