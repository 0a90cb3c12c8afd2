//! How to register a strategy
//!
//! 1) Implement `IntentStrategy` for your type in its module.
//! 2) Add a `StrategyFactory` entry with a stable `name` and `version`.
//! 3) Same seed ⇒ same presses for the same views.

use std::sync::Arc;

use super::{IntentStrategy, RandomIntents, SetSeeker};
use crate::domain::SetValidator;

/// What a factory may use to build a strategy.
#[derive(Clone)]
pub struct StrategyContext {
    pub seed: Option<u64>,
    pub validator: Arc<dyn SetValidator>,
}

pub struct StrategyFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(StrategyContext) -> Box<dyn IntentStrategy>,
}

static STRATEGY_FACTORIES: &[StrategyFactory] = &[
    StrategyFactory {
        name: RandomIntents::NAME,
        version: RandomIntents::VERSION,
        make: make_random,
    },
    StrategyFactory {
        name: SetSeeker::NAME,
        version: SetSeeker::VERSION,
        make: make_seeker,
    },
];

pub fn registered_strategies() -> &'static [StrategyFactory] {
    STRATEGY_FACTORIES
}

pub fn by_name(name: &str) -> Option<&'static StrategyFactory> {
    registered_strategies()
        .iter()
        .find(|factory| factory.name.eq_ignore_ascii_case(name))
}

fn make_random(ctx: StrategyContext) -> Box<dyn IntentStrategy> {
    Box::new(RandomIntents::new(ctx.seed))
}

fn make_seeker(ctx: StrategyContext) -> Box<dyn IntentStrategy> {
    Box::new(SetSeeker::new(ctx.validator, ctx.seed))
}
