//! Concurrent core of a real-time "Set" card game.
//!
//! Players race to claim sets on a shared [`table::Board`]; a single
//! [`dealer::Dealer`] task validates claims, keeps the round countdown and
//! refills the board. [`game::Game`] wires everything together.

pub mod config;
pub mod dealer;
pub mod display;
pub mod domain;
pub mod error;
pub mod game;
pub mod input;
pub mod players;
pub mod table;

pub use config::GameConfig;
pub use dealer::GameOutcome;
pub use error::GameError;
pub use game::{Game, GameBuilder};

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    set_game_test_support::logging::init();
}
