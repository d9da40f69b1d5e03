//! Normalized playback event vocabulary.
//!
//! Every player backend, whatever its native surface looks like, is
//! translated into this single event set before anything downstream
//! (accumulator, scheduler) sees it.

/// Error reason emitted when a backend reports readiness with a zero,
/// negative or non-finite duration.
pub const INVALID_DURATION_REASON: &str = "invalid-duration";

/// A single normalized playback fact.
///
/// Transient: produced by exactly one attached backend per playback
/// session and consumed in emission order. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum PlaybackEvent {
    /// The backend finished loading and knows the media duration.
    Ready { duration_secs: u32 },
    /// Playback started or resumed.
    Play,
    /// Playback paused.
    Pause,
    /// The playhead reached a (whole) second of media time.
    ///
    /// May move backward on a seek; deduplication and monotonicity are
    /// downstream concerns.
    TimeUpdate { seconds: u32 },
    /// Playback reached the end of the media.
    Ended,
    /// The backend failed; `reason` is surfaced to the UI shell.
    Error { reason: String },
}

impl PlaybackEvent {
    /// Build the normalized `Ready`/`Error` event for a reported duration.
    ///
    /// Zero-length and non-finite durations are surfaced as an error
    /// rather than silently treated as an empty video.
    pub fn from_reported_duration(duration: f64) -> Self {
        if duration.is_finite() && duration > 0.0 {
            PlaybackEvent::Ready {
                duration_secs: duration.floor() as u32,
            }
        } else {
            PlaybackEvent::Error {
                reason: INVALID_DURATION_REASON.to_string(),
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PlaybackEvent::Ended | PlaybackEvent::Error { .. })
    }
}
