//! Sync scheduling.
//!
//! Decides *when* a newly completed minute is handed to the sync client,
//! decoupled from the raw event rate. The scheduler is a pure state
//! machine; the session owns the wall-clock cadence timer and calls
//! [`SyncScheduler::poll`] on each tick.

use crate::accumulator::WatchAccumulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    /// Not tracking: before first play, or after pause/ended/error.
    Idle,
    /// Playback active; cadence ticks may dispatch.
    Armed,
}

/// Client-side half of the ledger idempotence guarantee: at most one
/// dispatch per `(video, minute)`, in strictly increasing minute order.
#[derive(Debug)]
pub struct SyncScheduler {
    state: SchedulerState,
}

impl Default for SyncScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.state == SchedulerState::Armed
    }

    pub fn on_play(&mut self) {
        self.state = SchedulerState::Armed;
    }

    pub fn on_pause(&mut self) {
        self.state = SchedulerState::Idle;
    }

    /// Terminal transition for ended/error/detach.
    pub fn on_stop(&mut self) {
        self.state = SchedulerState::Idle;
    }

    /// Cadence check: returns the minute to dispatch, if playback is
    /// active and the completed minute advanced past what was already
    /// sent. The minute is claimed before the caller sends it, so a slow
    /// network can never produce a duplicate.
    pub fn poll(&mut self, accumulator: &mut WatchAccumulator) -> Option<u32> {
        if self.state != SchedulerState::Armed {
            return None;
        }
        Self::claim_advanced_minute(accumulator)
    }

    /// Final check-and-flush for ended/detach, independent of armed
    /// state, so a minute boundary crossed just before teardown is not
    /// lost. Leaves the scheduler idle.
    pub fn flush(&mut self, accumulator: &mut WatchAccumulator) -> Option<u32> {
        self.state = SchedulerState::Idle;
        Self::claim_advanced_minute(accumulator)
    }

    fn claim_advanced_minute(accumulator: &mut WatchAccumulator) -> Option<u32> {
        let minute = accumulator.completed_minute();
        // Minute 0 is never dispatched: ledger credit starts at the
        // first completed minute.
        if minute == 0 || i64::from(minute) <= accumulator.last_synced_minute() {
            return None;
        }
        accumulator.record_synced(minute);
        Some(minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verba_model::VideoId;

    fn accumulator_at(second: u32) -> WatchAccumulator {
        let mut acc = WatchAccumulator::new(VideoId::new());
        acc.observe(second);
        acc
    }

    #[test]
    fn idle_scheduler_never_dispatches() {
        let mut scheduler = SyncScheduler::new();
        let mut acc = accumulator_at(120);
        assert_eq!(scheduler.poll(&mut acc), None);
    }

    #[test]
    fn armed_scheduler_dispatches_each_minute_once() {
        let mut scheduler = SyncScheduler::new();
        scheduler.on_play();

        let mut acc = accumulator_at(65);
        assert_eq!(scheduler.poll(&mut acc), Some(1));
        assert_eq!(scheduler.poll(&mut acc), None);

        acc.observe(140);
        assert_eq!(scheduler.poll(&mut acc), Some(2));
        assert_eq!(scheduler.poll(&mut acc), None);
    }

    #[test]
    fn minute_zero_is_never_dispatched() {
        let mut scheduler = SyncScheduler::new();
        scheduler.on_play();

        let mut acc = accumulator_at(59);
        assert_eq!(scheduler.poll(&mut acc), None);
        assert_eq!(scheduler.flush(&mut acc), None);
    }

    #[test]
    fn pause_disarms_until_next_play() {
        let mut scheduler = SyncScheduler::new();
        scheduler.on_play();
        scheduler.on_pause();

        let mut acc = accumulator_at(300);
        assert_eq!(scheduler.poll(&mut acc), None);

        scheduler.on_play();
        assert_eq!(scheduler.poll(&mut acc), Some(5));
    }

    #[test]
    fn flush_dispatches_pending_minute_even_when_idle() {
        let mut scheduler = SyncScheduler::new();
        let mut acc = accumulator_at(299);

        assert_eq!(scheduler.flush(&mut acc), Some(4));
        // Repeated flush must not resend.
        assert_eq!(scheduler.flush(&mut acc), None);
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn seek_forward_dispatches_only_latest_minute() {
        let mut scheduler = SyncScheduler::new();
        scheduler.on_play();

        let mut acc = accumulator_at(601);
        // A single dispatch carries the highest boundary, not a backlog.
        assert_eq!(scheduler.poll(&mut acc), Some(10));
        assert_eq!(scheduler.poll(&mut acc), None);
    }
}
