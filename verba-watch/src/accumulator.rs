//! Watch-time accumulation.
//!
//! Converts the raw position stream into a defensible "minutes watched"
//! signal. Two measures are kept side by side:
//!
//! - the set of distinct whole seconds observed, a diagnostic engagement
//!   signal that is never synced;
//! - the highest second the playhead has reached, from which the credited
//!   minute is derived. The ledger credits elapsed position, not unique
//!   seconds, so seeking backward never lowers credit and seeking forward
//!   does not over-credit skipped play time.

use std::collections::HashSet;

use verba_model::VideoId;

/// Per-session watch-time state.
///
/// Owned exclusively by one playback session and dropped with it;
/// constructing one accumulator per `VideoId` is part of the public
/// contract. Reusing an accumulator across videos would leak minute
/// credit between them.
#[derive(Debug)]
pub struct WatchAccumulator {
    video_id: VideoId,
    seconds_observed: HashSet<u32>,
    highest_second: Option<u32>,
    last_synced_minute: i64,
}

impl WatchAccumulator {
    pub fn new(video_id: VideoId) -> Self {
        Self {
            video_id,
            seconds_observed: HashSet::new(),
            highest_second: None,
            last_synced_minute: -1,
        }
    }

    pub fn video_id(&self) -> VideoId {
        self.video_id
    }

    /// Record one observed playhead second.
    ///
    /// Repeated and out-of-order values are fine; `completed_minute`
    /// stays monotonic regardless.
    pub fn observe(&mut self, second: u32) {
        self.seconds_observed.insert(second);
        self.highest_second = Some(match self.highest_second {
            Some(current) => current.max(second),
            None => second,
        });
    }

    /// Highest whole minute boundary the playhead has reached.
    ///
    /// This is the only value ever handed to the sync scheduler.
    pub fn completed_minute(&self) -> u32 {
        self.highest_second.map_or(0, |s| s / 60)
    }

    /// Count of distinct seconds observed this session. Diagnostic only.
    pub fn distinct_seconds(&self) -> usize {
        self.seconds_observed.len()
    }

    pub fn last_synced_minute(&self) -> i64 {
        self.last_synced_minute
    }

    /// Record a minute as dispatched to the ledger.
    ///
    /// Non-increasing values are ignored: the client must never resend a
    /// minute, and a regression here would break the idempotence contract
    /// with the server.
    pub fn record_synced(&mut self, minute: u32) {
        if i64::from(minute) <= self.last_synced_minute {
            tracing::warn!(
                video_id = %self.video_id,
                minute,
                last_synced = self.last_synced_minute,
                "ignoring non-increasing sync record"
            );
            return;
        }
        self.last_synced_minute = i64::from(minute);
    }
}
