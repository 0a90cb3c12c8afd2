//! set-game - run a game in the terminal.
//!
//! Computer players play on their own; human players press positions by
//! typing `<player> <position>` lines on stdin.

mod telemetry;

use std::path::PathBuf;

use clap::Parser;
use set_game::input::run_console_input;
use set_game::{Game, GameConfig, GameError};
use tokio::io::BufReader;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "set-game")]
#[command(about = "Real-time Set card game")]
struct Args {
    /// JSON config file; defaults apply for missing fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of console-driven players
    #[arg(long)]
    human_players: Option<usize>,

    /// Number of computer players
    #[arg(long)]
    computer_players: Option<usize>,

    /// Strategy for computer players (random, seeker)
    #[arg(long)]
    strategy: Option<String>,

    /// Seed for deterministic dealing and computer players
    #[arg(long)]
    seed: Option<u64>,

    /// Log every set on the board after each deal
    #[arg(long)]
    hints: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn apply(&self, config: &mut GameConfig) {
        if let Some(humans) = self.human_players {
            config.human_players = humans;
        }
        if let Some(computers) = self.computer_players {
            config.computer_players = computers;
        }
        if let Some(strategy) = &self.strategy {
            config.computer_strategy = strategy.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.hints {
            config.hints = true;
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    telemetry::init_tracing(args.verbose, args.json_logs);

    if let Err(err) = run(args).await {
        error!(code = err.code(), error = %err, "set-game failed");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), GameError> {
    let mut config = GameConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    let game = Game::builder(config).start()?;
    let cancel = game.cancellation();

    if game.players().iter().any(|player| player.is_human()) {
        let players = game.players().to_vec();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let stdin = BufReader::new(tokio::io::stdin());
            if let Err(err) = run_console_input(stdin, players, cancel).await {
                warn!(error = %err, "console input stopped");
            }
        });
    }

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.cancelled() => {}
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    warn!(error = %err, "cannot listen for ctrl-c");
                    return;
                }
                info!("interrupted");
                interrupt.cancel();
            }
        }
    });

    let names: Vec<String> = game.players().iter().map(|p| p.name().to_string()).collect();
    let outcome = game.wait().await?;

    for (name, score) in names.iter().zip(&outcome.scores) {
        println!("{name:<12} {score}");
    }
    let winners: Vec<&str> = outcome
        .winners
        .iter()
        .filter_map(|&id| names.get(id).map(String::as_str))
        .collect();
    println!("Winner(s): {}", winners.join(", "));
    Ok(())
}
