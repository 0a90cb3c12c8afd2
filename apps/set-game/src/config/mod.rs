//! Process configuration: defaults, JSON file, `SET_*` environment overrides.

mod env;
mod game;

pub use game::GameConfig;
