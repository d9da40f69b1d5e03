use thiserror::Error;

/// Errors produced by the watch-session engine.
///
/// Sync transport failures never cross into the playback pipeline; they
/// are logged, reported through the observer side channel, and dropped.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("player backend failure: {reason}")]
    Backend { reason: String },

    #[error("ledger rejected update with status {status}: {message}")]
    Ledger { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("corrupt state file: {0}")]
    State(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WatchError>;
