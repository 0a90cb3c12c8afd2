use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::claims::ClaimQueue;
use super::dealing::{draw_pairs, fresh_deck};
use super::timer::RoundTimer;
use crate::config::GameConfig;
use crate::display::DisplaySink;
use crate::domain::{CardId, PlayerId, Position, SetValidator, Verdict};
use crate::error::GameError;
use crate::players::{PlayerHandle, PlayerTask};
use crate::table::Board;

/// Shared collaborators the dealer works with.
pub struct DealerContext {
    pub config: GameConfig,
    pub board: Arc<Board>,
    pub validator: Arc<dyn SetValidator>,
    pub display: Arc<dyn DisplaySink>,
    /// Raised while dealing and sweeping; players drop intents meanwhile.
    pub reshuffling: Arc<AtomicBool>,
    /// Root token of the game.
    pub cancel: CancellationToken,
}

/// The dealer's end of one player.
pub struct Seat {
    pub handle: PlayerHandle,
    pub verdicts: mpsc::Sender<Verdict>,
    /// Running task, terminated when the game ends.
    pub task: Option<PlayerTask>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealerPhase {
    Dealing,
    CountingDown,
    Sweeping,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    /// Final score per player id.
    pub scores: Vec<u32>,
    pub winners: Vec<PlayerId>,
    /// Rounds dealt.
    pub rounds: u32,
}

/// A set on the board: positions, their (row, column) and card features.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Hint {
    positions: Vec<Position>,
    cells: Vec<(usize, usize)>,
    features: Vec<Vec<u8>>,
}

pub struct Dealer {
    ctx: DealerContext,
    seats: Vec<Seat>,
    claims: ClaimQueue,
    deck: Vec<CardId>,
    timer: RoundTimer,
    rng: StdRng,
    phase: DealerPhase,
    rounds: u32,
}

impl Dealer {
    pub fn new(ctx: DealerContext, seats: Vec<Seat>, claims: ClaimQueue) -> Self {
        let rng = match ctx.config.dealer_seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let timer = RoundTimer::starting_at(
            Instant::now(),
            ctx.config.turn_timeout(),
            ctx.config.turn_timeout_warning(),
        );
        Self {
            deck: fresh_deck(ctx.config.deck_size()),
            ctx,
            seats,
            claims,
            timer,
            rng,
            phase: DealerPhase::Dealing,
            rounds: 0,
        }
    }

    pub fn phase(&self) -> DealerPhase {
        self.phase
    }

    /// Cards not on the board and not yet scored.
    pub fn deck(&self) -> &[CardId] {
        &self.deck
    }

    /// Play rounds until cancelled or the deck holds no set, then end the
    /// game.
    pub async fn run(mut self) -> Result<GameOutcome, GameError> {
        info!(
            players = self.seats.len(),
            deck = self.deck.len(),
            table_size = self.ctx.board.table_size(),
            "dealer started"
        );

        while !self.should_finish() {
            self.rounds += 1;
            self.deal_round().await;
            self.count_down().await;
            self.sweep().await;
        }

        self.finish().await
    }

    fn should_finish(&self) -> bool {
        if self.ctx.cancel.is_cancelled() {
            return true;
        }
        let exhausted = self.ctx.validator.find_sets(&self.deck, 1).is_empty();
        if exhausted {
            info!(deck = self.deck.len(), "no set left in the deck");
        }
        exhausted
    }

    async fn deal_round(&mut self) {
        self.phase = DealerPhase::Dealing;
        self.ctx.reshuffling.store(true, Ordering::Release);
        self.place_cards().await;
        self.ctx.reshuffling.store(false, Ordering::Release);
        self.reset_timer();
        info!(round = self.rounds, deck = self.deck.len(), "round started");
    }

    async fn count_down(&mut self) {
        self.phase = DealerPhase::CountingDown;
        let tick = self.ctx.config.countdown_tick();
        let warning_tick = self.ctx.config.warning_tick();

        loop {
            let now = Instant::now();
            if self.timer.is_expired(now) {
                break;
            }
            let wake = self.timer.next_wake(now, tick, warning_tick);
            tokio::select! {
                biased;
                _ = self.ctx.cancel.cancelled() => break,
                _ = self.claims.woken() => {}
                _ = tokio::time::sleep_until(wake) => {}
            }

            self.publish_countdown();
            self.resolve_claims().await;
            self.place_cards().await;
        }
        debug!(round = self.rounds, "countdown over");
    }

    async fn sweep(&mut self) {
        self.phase = DealerPhase::Sweeping;
        self.ctx.reshuffling.store(true, Ordering::Release);
        for (position, _) in self.ctx.board.cards().await {
            if let Some(card) = self.ctx.board.remove_card(position).await {
                self.deck.push(card);
            }
        }
        // claims queued after the deadline lost their markers above
        self.resolve_claims().await;
        debug!(round = self.rounds, deck = self.deck.len(), "board swept");
    }

    async fn finish(mut self) -> Result<GameOutcome, GameError> {
        self.phase = DealerPhase::GameOver;

        let mut failure = None;
        for seat in self.seats.iter_mut().rev() {
            if let Some(task) = seat.task.take() {
                if let Err(err) = task.terminate().await {
                    warn!(player = seat.handle.id(), error = %err, "player did not shut down cleanly");
                    failure.get_or_insert(err);
                }
            }
        }

        let scores: Vec<u32> = self.seats.iter().map(|seat| seat.handle.score()).collect();
        let winners = winners(&scores);
        self.ctx.display.on_game_over(&winners);
        info!(?scores, ?winners, rounds = self.rounds, "game over");
        self.ctx.cancel.cancel();

        match failure {
            Some(err) => Err(err),
            None => Ok(GameOutcome {
                scores,
                winners,
                rounds: self.rounds,
            }),
        }
    }

    /// Fill free positions from the deck. Returns how many cards went down.
    async fn place_cards(&mut self) -> usize {
        if self.deck.is_empty() {
            return 0;
        }
        let free = self.ctx.board.free_positions().await;
        if free.is_empty() {
            return 0;
        }

        let mut placed = 0;
        for (card, position) in draw_pairs(free, &mut self.deck, &mut self.rng) {
            if self.ctx.board.place_card(card, position).await {
                placed += 1;
            } else {
                self.deck.push(card);
            }
        }
        if placed > 0 && self.ctx.config.hints {
            self.log_hints().await;
        }
        placed
    }

    async fn resolve_claims(&mut self) {
        while let Some(player) = self.claims.try_next() {
            let verdict = self.judge(player).await;
            self.deliver(player, verdict);
        }
    }

    async fn judge(&mut self, player: PlayerId) -> Verdict {
        let claim = self.ctx.board.export_claim(player).await;
        if !claim.is_intact() {
            debug!(player, "claim broken before it was checked");
            return Verdict::ClaimInvalidated;
        }

        let cards = claim.cards();
        if !self.ctx.validator.is_valid_set(&cards) {
            info!(player, ?cards, "invalid set");
            return Verdict::Penalty;
        }

        for position in claim.positions() {
            self.ctx.board.remove_card(position).await;
        }
        info!(player, ?cards, "set claimed");
        self.reset_timer();
        Verdict::Point
    }

    fn deliver(&self, player: PlayerId, verdict: Verdict) {
        let Some(seat) = self.seats.get(player) else {
            warn!(player, verdict = verdict.as_str(), "verdict for an unknown player");
            return;
        };
        if let Err(err) = seat.verdicts.try_send(verdict) {
            warn!(player, verdict = verdict.as_str(), error = %err, "verdict not delivered");
        }
    }

    fn reset_timer(&mut self) {
        let now = Instant::now();
        self.timer.reset(now);
        self.ctx
            .display
            .on_countdown(self.timer.remaining(now), self.timer.is_warning(now));
    }

    fn publish_countdown(&self) {
        let now = Instant::now();
        self.ctx
            .display
            .on_countdown(self.timer.remaining(now), self.timer.is_warning(now));
    }

    /// Every valid set currently on the board.
    async fn hints(&self) -> Vec<Hint> {
        let on_board = self.ctx.board.cards().await;
        let ids: Vec<CardId> = on_board.iter().map(|&(_, card)| card).collect();
        self.ctx
            .validator
            .find_sets(&ids, usize::MAX)
            .into_iter()
            .map(|set| {
                let positions: Vec<Position> = set
                    .iter()
                    .filter_map(|&card| self.ctx.board.position_of(card))
                    .collect();
                Hint {
                    cells: positions
                        .iter()
                        .map(|&position| self.ctx.config.grid_coordinates(position))
                        .collect(),
                    features: set
                        .iter()
                        .map(|&card| self.ctx.validator.features(card))
                        .collect(),
                    positions,
                }
            })
            .collect()
    }

    async fn log_hints(&self) {
        for hint in self.hints().await {
            info!(
                target: "hints",
                positions = ?hint.positions,
                cells = ?hint.cells,
                features = ?hint.features,
                "set on the board"
            );
        }
    }
}

/// Every player holding the top score.
pub fn winners(scores: &[u32]) -> Vec<PlayerId> {
    let Some(&best) = scores.iter().max() else {
        return Vec::new();
    };
    scores
        .iter()
        .enumerate()
        .filter(|&(_, &score)| score == best)
        .map(|(player, _)| player)
        .collect()
}
