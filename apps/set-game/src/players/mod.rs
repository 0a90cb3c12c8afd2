//! Player actors: intent gate, claim state machine, automated intents.

mod handle;
mod player;
pub mod strategy;

pub use handle::{PlayerHandle, PlayerPhase};
pub use player::{Automation, Player, PlayerSettings, PlayerTask};
