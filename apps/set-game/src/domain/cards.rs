//! Card feature encoding.
//!
//! A card id is a number written in base `feature_size` with
//! `feature_count` digits; each digit is one feature (colour, shape, ...),
//! most significant digit first. With the classic 3 values × 4 features the
//! deck holds 81 cards.

use crate::domain::CardId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardEncoding {
    feature_size: usize,
    feature_count: u32,
}

impl CardEncoding {
    pub const fn new(feature_size: usize, feature_count: u32) -> Self {
        Self {
            feature_size,
            feature_count,
        }
    }

    pub fn feature_size(&self) -> usize {
        self.feature_size
    }

    pub fn feature_count(&self) -> u32 {
        self.feature_count
    }

    /// Number of distinct cards the encoding can express.
    pub fn max_cards(&self) -> usize {
        self.feature_size
            .checked_pow(self.feature_count)
            .unwrap_or(usize::MAX)
    }

    pub fn contains(&self, card: CardId) -> bool {
        (card as usize) < self.max_cards()
    }

    /// Feature values of `card`, most significant first.
    pub fn features(&self, card: CardId) -> Vec<u8> {
        let mut rest = card as usize;
        let mut features = vec![0u8; self.feature_count as usize];
        for slot in features.iter_mut().rev() {
            *slot = (rest % self.feature_size) as u8;
            rest /= self.feature_size;
        }
        features
    }
}
