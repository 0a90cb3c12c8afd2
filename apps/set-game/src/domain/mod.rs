//! Domain layer: card identifiers, feature encoding, set validation.

pub mod cards;
pub mod seed_derivation;
pub mod validator;

pub use cards::CardEncoding;
pub use validator::{FeatureValidator, SetValidator};

/// Card identifier, `0..deck_size`.
pub type CardId = u32;

/// Board position, row-major `0..rows * columns`.
pub type Position = usize;

/// Player identifier in creation order, `0..players`.
pub type PlayerId = usize;

/// Dealer's outcome for a completed claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The claim was a valid set; its cards left the board.
    Point,
    /// The claim was not a set.
    Penalty,
    /// A claimed position was cleared before the dealer looked at it.
    ClaimInvalidated,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Point => "point",
            Verdict::Penalty => "penalty",
            Verdict::ClaimInvalidated => "claim_invalidated",
        }
    }
}
