use set_game::domain::{CardId, FeatureValidator, SetValidator};

/// Validator with a fixed answer for claims.
///
/// Always valid, never valid, or (`deck_has_sets`) never valid for claims
/// while still reporting sets in the deck so the game keeps going.
pub struct ScriptedValidator {
    inner: FeatureValidator,
    claims_valid: bool,
    deck_has_sets: bool,
}

impl ScriptedValidator {
    /// Every claim is a penalty, the game runs until cancelled.
    pub fn rejecting() -> Self {
        Self {
            inner: FeatureValidator::new(3, 4),
            claims_valid: false,
            deck_has_sets: true,
        }
    }

    /// No set exists anywhere; the game ends before the first deal.
    pub fn barren() -> Self {
        Self {
            inner: FeatureValidator::new(3, 4),
            claims_valid: false,
            deck_has_sets: false,
        }
    }
}

impl SetValidator for ScriptedValidator {
    fn set_size(&self) -> usize {
        self.inner.set_size()
    }

    fn is_valid_set(&self, cards: &[CardId]) -> bool {
        self.claims_valid && cards.len() == self.set_size()
    }

    fn find_sets(&self, cards: &[CardId], limit: usize) -> Vec<Vec<CardId>> {
        if !self.deck_has_sets || cards.len() < self.set_size() || limit == 0 {
            return Vec::new();
        }
        vec![cards[..self.set_size()].to_vec()]
    }

    fn features(&self, card: CardId) -> Vec<u8> {
        self.inner.features(card)
    }
}
