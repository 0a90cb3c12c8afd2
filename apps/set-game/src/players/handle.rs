use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::trace;

use crate::domain::{PlayerId, Position};

/// Where a player is in its claim cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PlayerPhase {
    /// Accepting intents, no claim waiting on the dealer.
    Idle = 0,
    /// Claim complete and queued; blocked on the verdict.
    AwaitingDealer = 1,
    /// Point or penalty cool-down; intents are dropped.
    Frozen = 2,
    /// Main loop has exited.
    Terminated = 3,
}

impl PlayerPhase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => PlayerPhase::Idle,
            1 => PlayerPhase::AwaitingDealer,
            2 => PlayerPhase::Frozen,
            _ => PlayerPhase::Terminated,
        }
    }
}

/// Cheap, cloneable front door of a player actor.
///
/// Input sources (console, automated generator, tests) submit intents here;
/// the dealer reads scores here.
#[derive(Clone)]
pub struct PlayerHandle {
    shared: Arc<Shared>,
}

struct Shared {
    id: PlayerId,
    name: String,
    human: bool,
    table_size: usize,
    intents: mpsc::Sender<Position>,
    phase: AtomicU8,
    score: AtomicU32,
    reshuffling: Arc<AtomicBool>,
}

impl PlayerHandle {
    pub(crate) fn new(
        id: PlayerId,
        name: String,
        human: bool,
        table_size: usize,
        intents: mpsc::Sender<Position>,
        reshuffling: Arc<AtomicBool>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                id,
                name,
                human,
                table_size,
                intents,
                phase: AtomicU8::new(PlayerPhase::Idle as u8),
                score: AtomicU32::new(0),
                reshuffling,
            }),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.shared.id
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn is_human(&self) -> bool {
        self.shared.human
    }

    pub fn score(&self) -> u32 {
        self.shared.score.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> PlayerPhase {
        PlayerPhase::from_u8(self.shared.phase.load(Ordering::Acquire))
    }

    /// False while frozen, terminated, or while the dealer reshuffles.
    pub fn accepts_intents(&self) -> bool {
        !self.shared.reshuffling.load(Ordering::Acquire)
            && matches!(
                self.phase(),
                PlayerPhase::Idle | PlayerPhase::AwaitingDealer
            )
    }

    /// True while intents sit in the input queue unprocessed.
    pub fn has_pending_intents(&self) -> bool {
        self.shared.intents.capacity() < self.shared.intents.max_capacity()
    }

    /// Offer a position to the player. Never blocks.
    ///
    /// Dropped without error when the gate is closed, the position is off
    /// the board, or the input queue is full. Returns whether it was queued.
    pub fn submit_intent(&self, position: Position) -> bool {
        if position >= self.shared.table_size || !self.accepts_intents() {
            trace!(player = self.id(), position, "intent dropped at the gate");
            return false;
        }
        match self.shared.intents.try_send(position) {
            Ok(()) => true,
            Err(err) => {
                trace!(player = self.id(), position, error = %err, "intent dropped");
                false
            }
        }
    }

    pub(crate) fn set_phase(&self, phase: PlayerPhase) {
        self.shared.phase.store(phase as u8, Ordering::Release);
    }

    /// Increment the score, returning the new value.
    pub(crate) fn add_point(&self) -> u32 {
        self.shared.score.fetch_add(1, Ordering::AcqRel) + 1
    }
}

impl std::fmt::Debug for PlayerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerHandle")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("human", &self.is_human())
            .field("score", &self.score())
            .field("phase", &self.phase())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(capacity: usize) -> (PlayerHandle, mpsc::Receiver<Position>, Arc<AtomicBool>) {
        let (tx, rx) = mpsc::channel(capacity);
        let reshuffling = Arc::new(AtomicBool::new(false));
        let handle = PlayerHandle::new(0, "P".into(), true, 12, tx, reshuffling.clone());
        (handle, rx, reshuffling)
    }

    #[test]
    fn accepts_while_idle_or_waiting() {
        let (handle, mut rx, _) = handle(3);
        assert!(handle.submit_intent(4));
        handle.set_phase(PlayerPhase::AwaitingDealer);
        assert!(handle.submit_intent(5));
        assert_eq!(rx.try_recv().ok(), Some(4));
        assert_eq!(rx.try_recv().ok(), Some(5));
    }

    #[test]
    fn drops_while_frozen_or_terminated() {
        let (handle, mut rx, _) = handle(3);
        handle.set_phase(PlayerPhase::Frozen);
        assert!(!handle.submit_intent(1));
        handle.set_phase(PlayerPhase::Terminated);
        assert!(!handle.submit_intent(1));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn drops_during_reshuffle() {
        let (handle, mut rx, reshuffling) = handle(3);
        reshuffling.store(true, Ordering::Release);
        assert!(!handle.accepts_intents());
        assert!(!handle.submit_intent(1));
        reshuffling.store(false, Ordering::Release);
        assert!(handle.submit_intent(1));
        assert_eq!(rx.try_recv().ok(), Some(1));
    }

    #[test]
    fn drops_when_queue_is_full_or_position_off_board() {
        let (handle, _rx, _) = handle(2);
        assert!(handle.submit_intent(0));
        assert!(handle.has_pending_intents());
        assert!(handle.submit_intent(1));
        assert!(!handle.submit_intent(2));
        assert!(!handle.submit_intent(12));
    }

    #[test]
    fn score_counts_points() {
        let (handle, _rx, _) = handle(1);
        assert_eq!(handle.score(), 0);
        assert_eq!(handle.add_point(), 1);
        assert_eq!(handle.add_point(), 2);
        assert_eq!(handle.score(), 2);
    }
}
