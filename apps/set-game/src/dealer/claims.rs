use std::sync::Arc;

use tokio::sync::{mpsc, Notify};

use crate::domain::PlayerId;

/// Create the dealer's claim queue.
///
/// Many players hold a [`ClaimSender`]; the dealer owns the single
/// [`ClaimQueue`]. Every submission also wakes the dealer.
pub fn claim_queue() -> (ClaimSender, ClaimQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    let wake = Arc::new(Notify::new());
    (
        ClaimSender {
            tx,
            wake: Arc::clone(&wake),
        },
        ClaimQueue { rx, wake },
    )
}

#[derive(Clone, Debug)]
pub struct ClaimSender {
    tx: mpsc::UnboundedSender<PlayerId>,
    wake: Arc<Notify>,
}

impl ClaimSender {
    /// Enqueue `player` and wake the dealer. False if the dealer is gone.
    pub fn submit(&self, player: PlayerId) -> bool {
        if self.tx.send(player).is_err() {
            return false;
        }
        self.wake.notify_one();
        true
    }
}

#[derive(Debug)]
pub struct ClaimQueue {
    rx: mpsc::UnboundedReceiver<PlayerId>,
    wake: Arc<Notify>,
}

impl ClaimQueue {
    /// Next player in submission order, without waiting.
    pub fn try_next(&mut self) -> Option<PlayerId> {
        self.rx.try_recv().ok()
    }

    /// Resolves on the next submission. A submission made while nobody was
    /// waiting is remembered, so a wake-up is never lost.
    pub async fn woken(&self) {
        self.wake.notified().await;
    }
}
