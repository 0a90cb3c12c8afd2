//! Set validity over card features.

use crate::domain::{CardEncoding, CardId};

/// Judges whether cards form a set.
///
/// Pure and shared by the dealer (claim validation, end-of-game check),
/// hints, and automated strategies.
pub trait SetValidator: Send + Sync {
    /// Number of cards in a set; also the claim capacity of every player.
    fn set_size(&self) -> usize;

    /// True iff `cards` form a valid set.
    fn is_valid_set(&self, cards: &[CardId]) -> bool;

    /// Up to `limit` valid sets among `cards`, in lexicographic index order.
    fn find_sets(&self, cards: &[CardId], limit: usize) -> Vec<Vec<CardId>>;

    /// Feature values of a card, for diagnostics.
    fn features(&self, card: CardId) -> Vec<u8>;
}

/// Classic rule: in every feature the cards are all equal or all distinct.
#[derive(Debug, Clone, Copy)]
pub struct FeatureValidator {
    encoding: CardEncoding,
}

impl FeatureValidator {
    pub fn new(feature_size: usize, feature_count: u32) -> Self {
        Self {
            encoding: CardEncoding::new(feature_size, feature_count),
        }
    }

    pub fn encoding(&self) -> CardEncoding {
        self.encoding
    }

    fn feature_agrees(&self, features: &[Vec<u8>], index: usize) -> bool {
        let mut seen = vec![0usize; self.encoding.feature_size()];
        for card in features {
            seen[card[index] as usize] += 1;
        }
        let present = seen.iter().filter(|&&count| count > 0).count();
        present == 1 || present == features.len()
    }
}

impl SetValidator for FeatureValidator {
    fn set_size(&self) -> usize {
        self.encoding.feature_size()
    }

    fn is_valid_set(&self, cards: &[CardId]) -> bool {
        if cards.len() != self.set_size() {
            return false;
        }
        if !cards.iter().all(|&card| self.encoding.contains(card)) {
            return false;
        }
        for (i, card) in cards.iter().enumerate() {
            if cards[i + 1..].contains(card) {
                return false;
            }
        }

        let features: Vec<Vec<u8>> = cards.iter().map(|&c| self.encoding.features(c)).collect();
        (0..self.encoding.feature_count() as usize).all(|index| self.feature_agrees(&features, index))
    }

    fn find_sets(&self, cards: &[CardId], limit: usize) -> Vec<Vec<CardId>> {
        let k = self.set_size();
        let mut found = Vec::new();
        if limit == 0 || cards.len() < k {
            return found;
        }

        let mut indices: Vec<usize> = (0..k).collect();
        let mut candidate = Vec::with_capacity(k);
        loop {
            candidate.clear();
            candidate.extend(indices.iter().map(|&i| cards[i]));
            if self.is_valid_set(&candidate) {
                found.push(candidate.clone());
                if found.len() >= limit {
                    return found;
                }
            }

            // Advance to the next k-combination of indices.
            let n = cards.len();
            let Some(pivot) = (0..k).rev().find(|&i| indices[i] < n - k + i) else {
                return found;
            };
            indices[pivot] += 1;
            for i in pivot + 1..k {
                indices[i] = indices[i - 1] + 1;
            }
        }
    }

    fn features(&self, card: CardId) -> Vec<u8> {
        self.encoding.features(card)
    }
}
