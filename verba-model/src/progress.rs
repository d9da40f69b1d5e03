//! Wire DTOs for the progress ledger.
//!
//! The write side is the engine's only output: one update per newly
//! completed minute. The read side mirrors the server's aggregation
//! (daily goal, streaks); it is computed entirely server-side and the
//! client only deserializes it.

use chrono::{DateTime, Utc};

use crate::ids::{GuestSessionId, VideoId};

/// Progress write request.
///
/// Sent once per newly completed minute during playback. The server is
/// idempotent per `(identity, video)` for non-decreasing minute values;
/// the client guarantees it never sends a lower value than it already
/// sent for the same video in the same session.
///
/// `session_id` identifies anonymous viewers; authenticated requests omit
/// it and carry a bearer token in the Authorization header instead.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressUpdate {
    pub video_id: VideoId,
    /// Highest completed minute boundary reached, always >= 1.
    pub watched_minutes: u32,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub session_id: Option<GuestSessionId>,
    pub recorded_at: DateTime<Utc>,
}

/// Server-computed daily goal standing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailyGoalSummary {
    pub goal_minutes: u32,
    pub watched_minutes: u32,
    /// 0.0..=1.0, clamped server-side.
    pub percent: f32,
}

/// Server-computed watch streak.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreakSummary {
    pub current_days: u32,
    pub longest_days: u32,
    /// Most recently reached milestone label, if any (e.g. "7-day").
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub milestone: Option<String>,
}
