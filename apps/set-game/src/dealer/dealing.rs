//! Random card placement.

use rand::Rng;

use crate::domain::{CardId, Position};

/// A full deck in identifier order.
pub fn fresh_deck(size: usize) -> Vec<CardId> {
    (0..size as CardId).collect()
}

/// Pair free positions with random deck cards until either runs out.
///
/// Drawn cards leave `deck`. Both the position and the card of each pair
/// are chosen uniformly among what is left, so the deal order carries no
/// information about the deck order.
pub fn draw_pairs<R: Rng + ?Sized>(
    free: Vec<Position>,
    deck: &mut Vec<CardId>,
    rng: &mut R,
) -> Vec<(CardId, Position)> {
    let mut free = free;
    let mut pairs = Vec::with_capacity(free.len().min(deck.len()));
    while !free.is_empty() && !deck.is_empty() {
        let position = free.swap_remove(rng.random_range(0..free.len()));
        let card = deck.swap_remove(rng.random_range(0..deck.len()));
        pairs.push((card, position));
    }
    pairs
}
