//! Convenience re-exports for crates consuming the Verba model.

pub use crate::error::{ModelError, Result as ModelResult};
pub use crate::identity::{AuthToken, Identity};
pub use crate::ids::{GuestSessionId, VideoId};
pub use crate::playback::{PlaybackEvent, INVALID_DURATION_REASON};
pub use crate::progress::{DailyGoalSummary, ProgressUpdate, StreakSummary};
