use thiserror::Error;

/// Operational failures of the game process.
///
/// Gameplay outcomes (points, penalties, invalidated claims) are never
/// errors; they travel as [`crate::domain::Verdict`] values.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("I/O error: {detail}")]
    Io {
        detail: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl GameError {
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn io(detail: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            detail: detail.into(),
            source,
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::Config { .. } => "CONFIG_ERROR",
            GameError::Io { .. } => "IO_ERROR",
            GameError::Internal { .. } => "INTERNAL",
        }
    }
}

impl From<tokio::task::JoinError> for GameError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            GameError::internal(format!("task panicked: {err}"))
        } else {
            GameError::internal(format!("task aborted: {err}"))
        }
    }
}
