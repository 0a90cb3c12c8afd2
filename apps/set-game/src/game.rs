//! Wiring: builds the board, the players and the dealer and starts them.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::GameConfig;
use crate::dealer::{claim_queue, Dealer, DealerContext, GameOutcome, Seat};
use crate::display::{DisplaySink, LogDisplay};
use crate::domain::{FeatureValidator, PlayerId, SetValidator};
use crate::error::GameError;
use crate::players::strategy::{self, StrategyContext};
use crate::players::{Automation, Player, PlayerHandle, PlayerSettings};
use crate::table::Board;

pub struct GameBuilder {
    config: GameConfig,
    display: Option<Arc<dyn DisplaySink>>,
    validator: Option<Arc<dyn SetValidator>>,
}

impl GameBuilder {
    /// Defaults to [`LogDisplay`].
    pub fn with_display(mut self, display: Arc<dyn DisplaySink>) -> Self {
        self.display = Some(display);
        self
    }

    /// Defaults to a [`FeatureValidator`] shaped by the config.
    pub fn with_validator(mut self, validator: Arc<dyn SetValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Validate the config and spawn every player task and the dealer.
    ///
    /// Must be called from within a tokio runtime. Human players take the
    /// lowest ids, computer players follow.
    pub fn start(self) -> Result<Game, GameError> {
        let config = self.config;
        config.validate()?;

        let validator: Arc<dyn SetValidator> = match self.validator {
            Some(validator) => validator,
            None => Arc::new(FeatureValidator::new(
                config.feature_size,
                config.feature_count,
            )),
        };
        if validator.set_size() != config.set_size() {
            return Err(GameError::config(format!(
                "validator checks sets of {} cards, config expects {}",
                validator.set_size(),
                config.set_size()
            )));
        }
        let display: Arc<dyn DisplaySink> = match self.display {
            Some(display) => display,
            None => {
                let names = (0..config.players()).map(|id| config.player_name(id)).collect();
                Arc::new(LogDisplay::new(names))
            }
        };

        let board = Arc::new(Board::new(
            config.table_size(),
            config.players(),
            config.set_size(),
            config.table_delay(),
            Arc::clone(&display),
        ));
        let reshuffling = Arc::new(AtomicBool::new(false));
        let cancel = CancellationToken::new();
        let (claims, queue) = claim_queue();

        let factory = match config.computer_players {
            0 => None,
            _ => Some(strategy::by_name(&config.computer_strategy).ok_or_else(|| {
                GameError::config(format!(
                    "unknown computer_strategy '{}'",
                    config.computer_strategy
                ))
            })?),
        };

        let mut seats = Vec::with_capacity(config.players());
        for id in 0..config.players() {
            let human = config.is_human(id);
            let settings = PlayerSettings {
                id,
                name: config.player_name(id),
                human,
                set_size: config.set_size(),
                point_freeze: config.point_freeze(),
                penalty_freeze: config.penalty_freeze(),
            };
            let (mut player, verdicts) = Player::new(
                settings,
                Arc::clone(&board),
                claims.clone(),
                Arc::clone(&display),
                Arc::clone(&reshuffling),
            );
            if let (false, Some(factory)) = (human, factory) {
                let strategy = (factory.make)(StrategyContext {
                    seed: config.player_seed(id),
                    validator: Arc::clone(&validator),
                });
                player = player.with_automation(Automation {
                    strategy,
                    interval: config.computer_intent_interval(),
                });
            }

            let handle = player.handle().clone();
            // not a child of `cancel`: the dealer retires players one by one
            let task = player.spawn(CancellationToken::new());
            seats.push(Seat {
                handle,
                verdicts,
                task: Some(task),
            });
        }
        let players: Vec<PlayerHandle> = seats.iter().map(|seat| seat.handle.clone()).collect();

        info!(
            humans = config.human_players,
            computers = config.computer_players,
            rows = config.rows,
            columns = config.columns,
            deck = config.deck_size(),
            "game starting"
        );
        let dealer = Dealer::new(
            DealerContext {
                config: config.clone(),
                board: Arc::clone(&board),
                validator,
                display,
                reshuffling,
                cancel: cancel.clone(),
            },
            seats,
            queue,
        );
        let dealer = tokio::spawn(dealer.run());

        Ok(Game {
            config,
            board,
            players,
            cancel,
            dealer,
        })
    }
}

/// A running game.
pub struct Game {
    config: GameConfig,
    board: Arc<Board>,
    players: Vec<PlayerHandle>,
    cancel: CancellationToken,
    dealer: JoinHandle<Result<GameOutcome, GameError>>,
}

impl Game {
    pub fn builder(config: GameConfig) -> GameBuilder {
        GameBuilder {
            config,
            display: None,
            validator: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    pub fn players(&self) -> &[PlayerHandle] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerHandle> {
        self.players.get(id)
    }

    /// Token cancelled when the game ends, for whatever reason.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Ask every task to stop; [`Game::wait`] returns once they have.
    pub fn terminate(&self) {
        info!("termination requested");
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.dealer.is_finished()
    }

    /// Wait for the dealer to end the game.
    pub async fn wait(self) -> Result<GameOutcome, GameError> {
        self.dealer.await?
    }
}
