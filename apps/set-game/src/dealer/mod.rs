//! The dealer: the single authority over the deck, the round timer and
//! claim resolution.

mod claims;
#[allow(clippy::module_inception)]
mod dealer;
pub mod dealing;
mod timer;

pub use claims::{claim_queue, ClaimQueue, ClaimSender};
pub use dealer::{winners, Dealer, DealerContext, DealerPhase, GameOutcome, Seat};
pub use timer::RoundTimer;
