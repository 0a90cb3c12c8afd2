//! Player actor: one task per participant.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::handle::{PlayerHandle, PlayerPhase};
use super::strategy::{IntentStrategy, TableView};
use crate::dealer::ClaimSender;
use crate::display::DisplaySink;
use crate::domain::{PlayerId, Position, Verdict};
use crate::error::GameError;
use crate::table::Board;

/// Freeze countdown refresh period.
const FREEZE_TICK: Duration = Duration::from_secs(1);
/// Floor for the automated intent cadence; `tokio::time::interval` rejects zero.
const MIN_INTENT_INTERVAL: Duration = Duration::from_millis(1);

/// Fixed facts about a player, decided before it starts.
#[derive(Debug, Clone)]
pub struct PlayerSettings {
    pub id: PlayerId,
    pub name: String,
    pub human: bool,
    /// Claim capacity; also bounds the input queue.
    pub set_size: usize,
    pub point_freeze: Duration,
    pub penalty_freeze: Duration,
}

/// Drives a computer player.
pub struct Automation {
    pub strategy: Box<dyn IntentStrategy>,
    pub interval: Duration,
}

/// A player before it is spawned.
pub struct Player {
    settings: PlayerSettings,
    handle: PlayerHandle,
    board: Arc<Board>,
    intents: mpsc::Receiver<Position>,
    verdicts: mpsc::Receiver<Verdict>,
    claims: ClaimSender,
    display: Arc<dyn DisplaySink>,
    automation: Option<Automation>,
}

/// The main loop was cancelled mid-wait.
struct Cancelled;

impl Player {
    /// Build a player and the sending half of its verdict channel.
    pub fn new(
        settings: PlayerSettings,
        board: Arc<Board>,
        claims: ClaimSender,
        display: Arc<dyn DisplaySink>,
        reshuffling: Arc<AtomicBool>,
    ) -> (Self, mpsc::Sender<Verdict>) {
        let (intent_tx, intent_rx) = mpsc::channel(settings.set_size.max(1));
        let (verdict_tx, verdict_rx) = mpsc::channel(1);
        let handle = PlayerHandle::new(
            settings.id,
            settings.name.clone(),
            settings.human,
            board.table_size(),
            intent_tx,
            reshuffling,
        );
        let player = Self {
            settings,
            handle,
            board,
            intents: intent_rx,
            verdicts: verdict_rx,
            claims,
            display,
            automation: None,
        };
        (player, verdict_tx)
    }

    pub fn with_automation(mut self, automation: Automation) -> Self {
        self.automation = Some(automation);
        self
    }

    pub fn handle(&self) -> &PlayerHandle {
        &self.handle
    }

    /// Start the main loop (and the intent generator, if automated).
    pub fn spawn(mut self, cancel: CancellationToken) -> PlayerTask {
        let handle = self.handle.clone();
        let generator = self.automation.take().map(|automation| {
            tokio::spawn(generate_intents(
                handle.clone(),
                Arc::clone(&self.board),
                automation,
                cancel.clone(),
            ))
        });

        let loop_cancel = cancel.clone();
        let join = tokio::spawn(async move {
            let id = self.handle.id();
            self.run(loop_cancel).await;
            if let Some(generator) = generator {
                if let Err(err) = generator.await {
                    warn!(player = id, error = %err, "intent generator ended abnormally");
                }
            }
        });

        PlayerTask {
            handle,
            cancel,
            join,
        }
    }

    async fn run(mut self, cancel: CancellationToken) {
        let id = self.handle.id();
        info!(
            player = id,
            name = %self.settings.name,
            human = self.settings.human,
            "player started"
        );

        loop {
            let position = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = self.intents.recv() => match next {
                    Some(position) => position,
                    None => break,
                },
            };
            if self.on_intent(position, &cancel).await.is_err() {
                break;
            }
        }

        self.handle.set_phase(PlayerPhase::Terminated);
        info!(player = id, score = self.handle.score(), "player terminated");
    }

    async fn on_intent(
        &mut self,
        position: Position,
        cancel: &CancellationToken,
    ) -> Result<(), Cancelled> {
        let id = self.handle.id();
        debug!(player = id, position, "intent");

        if self.board.has_claim(id, position) {
            self.board.remove_claim(id, position).await;
            return Ok(());
        }
        if !self.board.place_claim(id, position).await || !self.board.claim_is_full(id) {
            return Ok(());
        }

        self.handle.set_phase(PlayerPhase::AwaitingDealer);
        if !self.claims.submit(id) {
            warn!(player = id, "dealer is gone, claim not submitted");
            self.handle.set_phase(PlayerPhase::Idle);
            return Ok(());
        }

        let verdict = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Cancelled),
            verdict = self.verdicts.recv() => verdict.ok_or(Cancelled)?,
        };
        debug!(player = id, verdict = verdict.as_str(), "verdict received");

        match verdict {
            Verdict::Point => {
                let score = self.handle.add_point();
                self.display.on_score_changed(id, score);
                info!(player = id, score, "point");
                self.freeze(self.settings.point_freeze, cancel).await?;
            }
            Verdict::Penalty => {
                self.freeze(self.settings.penalty_freeze, cancel).await?;
            }
            Verdict::ClaimInvalidated => {}
        }
        self.handle.set_phase(PlayerPhase::Idle);
        Ok(())
    }

    async fn freeze(
        &mut self,
        duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), Cancelled> {
        let id = self.handle.id();
        self.handle.set_phase(PlayerPhase::Frozen);
        // presses queued before the verdict belong to the old claim
        while self.intents.try_recv().is_ok() {}

        let mut remaining = duration;
        loop {
            self.display.on_freeze(id, remaining);
            if remaining.is_zero() {
                return Ok(());
            }
            let step = remaining.min(FREEZE_TICK);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Cancelled),
                _ = tokio::time::sleep(step) => {}
            }
            remaining -= step;
        }
    }
}

async fn generate_intents(
    handle: PlayerHandle,
    board: Arc<Board>,
    automation: Automation,
    cancel: CancellationToken,
) {
    let id = handle.id();
    let mut ticker = tokio::time::interval(automation.interval.max(MIN_INTENT_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!(player = id, "intent generator started");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if handle.phase() != PlayerPhase::Idle
            || !handle.accepts_intents()
            || handle.has_pending_intents()
        {
            continue;
        }

        let view = TableView {
            cards: board.peek_cards(),
            claimed: board.claimed_positions(id),
        };
        match automation.strategy.next_intent(&view) {
            Ok(Some(position)) => {
                handle.submit_intent(position);
            }
            Ok(None) => {}
            Err(err) => warn!(player = id, error = %err, "strategy failed to pick an intent"),
        }
    }

    debug!(player = id, "intent generator stopped");
}

/// A running player.
pub struct PlayerTask {
    handle: PlayerHandle,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl PlayerTask {
    pub fn handle(&self) -> &PlayerHandle {
        &self.handle
    }

    /// Cancel the player and wait for its loop and generator to exit.
    pub async fn terminate(self) -> Result<(), GameError> {
        self.cancel.cancel();
        self.join.await?;
        Ok(())
    }
}
