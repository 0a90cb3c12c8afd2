//! RNG seed derivation for deterministic games.
//!
//! One base seed fans out into independent streams for the dealer and for
//! every automated player, so a seeded game deals the same cards and the
//! random players press the same positions across runs (timing permitting).

use crate::domain::PlayerId;

/// Derive the dealer's shuffling seed.
pub fn derive_dealer_seed(game_seed: u64) -> u64 {
    game_seed.wrapping_add(2)
}

/// Derive the intent-generator seed of an automated player.
///
/// Unique per (game, player) so two bots never mirror each other.
pub fn derive_player_seed(game_seed: u64, player: PlayerId) -> u64 {
    game_seed
        .wrapping_add((player as u64).wrapping_mul(100))
        .wrapping_add(1)
}
