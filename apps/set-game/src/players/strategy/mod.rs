//! Automated intent strategies for computer players.
//!
//! - [`IntentStrategy`]: the trait the intent generator drives
//! - [`RandomIntents`]: presses uniformly random positions (seedable)
//! - [`SetSeeker`]: looks for a valid set on the board and presses it
//! - a static registry so configuration can name a strategy

mod random;
mod registry;
mod seeker;
mod trait_def;

pub use random::RandomIntents;
pub use registry::{by_name, registered_strategies, StrategyContext, StrategyFactory};
pub use seeker::SetSeeker;
pub use trait_def::{IntentStrategy, StrategyError, TableView};
