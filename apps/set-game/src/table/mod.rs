//! The shared board: cards on positions and every player's claim markers.

mod board;

pub use board::{Board, ClaimSnapshot};
