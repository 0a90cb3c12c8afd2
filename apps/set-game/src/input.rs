//! Console input for human players.
//!
//! One press per line: `<player> <position>`, both zero-based, e.g. `0 7`.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{PlayerId, Position};
use crate::error::GameError;
use crate::players::PlayerHandle;

/// Parse one input line into a player id and a position.
pub fn parse_intent(line: &str) -> Result<(PlayerId, Position), String> {
    let mut parts = line.split_whitespace();
    let (Some(player), Some(position), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected '<player> <position>', got '{}'", line.trim()));
    };
    let player = player
        .parse()
        .map_err(|e| format!("bad player '{player}': {e}"))?;
    let position = position
        .parse()
        .map_err(|e| format!("bad position '{position}': {e}"))?;
    Ok((player, position))
}

/// Forward lines from `reader` to the human players among `players` until
/// EOF or cancellation. Lines for computer players are ignored.
pub async fn run_console_input<R>(
    reader: R,
    players: Vec<PlayerHandle>,
    cancel: CancellationToken,
) -> Result<(), GameError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line.map_err(|e| GameError::io("reading console input", e))?,
        };
        let Some(line) = line else {
            info!("console input closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_intent(&line) {
            Ok((player, position)) => match players.get(player) {
                Some(handle) if handle.is_human() => {
                    let queued = handle.submit_intent(position);
                    debug!(player, position, queued, "console intent");
                }
                Some(_) => warn!(player, "ignoring console input for a computer player"),
                None => warn!(player, "ignoring console input for an unknown player"),
            },
            Err(err) => warn!(error = %err, "ignoring console line"),
        }
    }
    Ok(())
}
