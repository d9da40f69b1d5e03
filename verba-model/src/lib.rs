//! Core data model definitions shared across Verba crates.
//!
//! Plain types only: strongly typed identifiers, the normalized playback
//! event vocabulary, identity variants, and the progress-ledger wire DTOs.
//! No I/O and no async live here.
#![allow(missing_docs)]

pub mod error;
pub mod identity;
pub mod ids;
pub mod playback;
pub mod prelude;
pub mod progress;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use identity::{AuthToken, Identity};
pub use ids::{GuestSessionId, VideoId};
pub use playback::{PlaybackEvent, INVALID_DURATION_REASON};
pub use progress::{DailyGoalSummary, ProgressUpdate, StreakSummary};
