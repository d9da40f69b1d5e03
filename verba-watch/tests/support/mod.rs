//! Shared doubles for the pipeline integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use verba_model::{DailyGoalSummary, Identity, ProgressUpdate, StreakSummary};
use verba_watch::{ProgressLedger, SessionObserver, WatchError};

/// Opt into trace output for a test run (`RUST_LOG=verba_watch=debug`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Ledger double that records every attempted write, optionally failing
/// them all (offline mode).
#[derive(Default)]
pub struct RecordingLedger {
    pub attempts: Mutex<Vec<(ProgressUpdate, Identity)>>,
    pub offline: Mutex<bool>,
}

impl RecordingLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn offline() -> Arc<Self> {
        let ledger = Self::default();
        *ledger.offline.lock() = true;
        Arc::new(ledger)
    }

    pub fn minutes(&self) -> Vec<u32> {
        self.attempts
            .lock()
            .iter()
            .map(|(update, _)| update.watched_minutes)
            .collect()
    }
}

#[async_trait]
impl ProgressLedger for RecordingLedger {
    async fn record_progress(
        &self,
        update: &ProgressUpdate,
        identity: &Identity,
    ) -> Result<(), WatchError> {
        self.attempts
            .lock()
            .push((update.clone(), identity.clone()));
        if *self.offline.lock() {
            return Err(WatchError::Ledger {
                status: 503,
                message: "offline".to_string(),
            });
        }
        Ok(())
    }

    async fn fetch_daily_goal(&self, _identity: &Identity) -> Result<DailyGoalSummary, WatchError> {
        Ok(DailyGoalSummary {
            goal_minutes: 15,
            watched_minutes: 0,
            percent: 0.0,
        })
    }

    async fn fetch_streak(&self, _identity: &Identity) -> Result<StreakSummary, WatchError> {
        Ok(StreakSummary {
            current_days: 0,
            longest_days: 0,
            milestone: None,
        })
    }
}

/// Observer double that counts what the shell would see.
#[derive(Default)]
pub struct TestObserver {
    pub ready: Mutex<Vec<u32>>,
    pub progress: Mutex<Vec<u32>>,
    pub ended: Mutex<u32>,
    pub errors: Mutex<Vec<String>>,
    pub sync_failures: Mutex<Vec<String>>,
}

impl TestObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl SessionObserver for TestObserver {
    fn on_ready(&self, duration_secs: u32) {
        self.ready.lock().push(duration_secs);
    }

    fn on_progress(&self, current_secs: u32, _duration_secs: Option<u32>) {
        self.progress.lock().push(current_secs);
    }

    fn on_ended(&self) {
        *self.ended.lock() += 1;
    }

    fn on_error(&self, reason: &str) {
        self.errors.lock().push(reason.to_string());
    }

    fn on_sync_failure(&self, reason: &str) {
        self.sync_failures.lock().push(reason.to_string());
    }
}
