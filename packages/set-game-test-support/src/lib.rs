//! Test support utilities for the set-game workspace.
//!
//! Shared between unit tests and integration tests. Holds nothing that
//! depends on `set-game` types so it can be used as a dev-dependency without
//! creating a second copy of the game crate.

pub mod logging;
