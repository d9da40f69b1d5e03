//! Playback session orchestration.
//!
//! One [`WatchSession`] per mounted video: it owns the backend, the
//! accumulator, the scheduler and the sync client, and is torn down when
//! the video unmounts. Nothing here persists across video switches
//! except the externally owned identity.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use verba_model::{PlaybackEvent, VideoId};

use crate::accumulator::WatchAccumulator;
use crate::backend::PlayerBackend;
use crate::config::WatchConfig;
use crate::error::Result;
use crate::identity::IdentityResolver;
use crate::scheduler::SyncScheduler;
use crate::sync::{ProgressLedger, SyncClient};

/// Callbacks the UI shell hooks to drive on-screen playback state and
/// non-blocking error banners. All methods default to no-ops.
pub trait SessionObserver: Send + Sync {
    fn on_ready(&self, duration_secs: u32) {
        let _ = duration_secs;
    }
    fn on_progress(&self, current_secs: u32, duration_secs: Option<u32>) {
        let _ = (current_secs, duration_secs);
    }
    fn on_ended(&self) {}
    /// Backend playback failure. Recovery is user-initiated (remount);
    /// the engine never retries backend initialization itself.
    fn on_error(&self, reason: &str) {
        let _ = reason;
    }
    /// Sync transport failure side channel, for an optional non-blocking
    /// notice. Playback is unaffected.
    fn on_sync_failure(&self, reason: &str) {
        let _ = reason;
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

struct SessionShared {
    accumulator: Mutex<WatchAccumulator>,
    scheduler: Mutex<SyncScheduler>,
    duration_secs: Mutex<Option<u32>>,
    position_secs: Mutex<u32>,
    observer: Arc<dyn SessionObserver>,
    sync: SyncClient,
}

impl SessionShared {
    fn handle_event(&self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Ready { duration_secs } => {
                *self.duration_secs.lock() = Some(duration_secs);
                self.observer.on_ready(duration_secs);
            }
            PlaybackEvent::Play => {
                self.scheduler.lock().on_play();
            }
            PlaybackEvent::Pause => {
                self.scheduler.lock().on_pause();
            }
            PlaybackEvent::TimeUpdate { seconds } => {
                self.accumulator.lock().observe(seconds);
                *self.position_secs.lock() = seconds;
                self.observer
                    .on_progress(seconds, *self.duration_secs.lock());
            }
            PlaybackEvent::Ended => {
                self.flush_pending();
                self.observer.on_ended();
            }
            PlaybackEvent::Error { reason } => {
                self.scheduler.lock().on_stop();
                self.observer.on_error(&reason);
            }
        }
    }

    /// Cadence check: hand any newly completed minute to the sync client.
    fn tick(&self) {
        let minute = {
            let mut accumulator = self.accumulator.lock();
            self.scheduler.lock().poll(&mut accumulator)
        };
        if let Some(minute) = minute {
            self.sync.dispatch(minute);
        }
    }

    /// Final check-and-flush so a just-crossed minute boundary is not
    /// lost on ended/detach.
    fn flush_pending(&self) {
        let minute = {
            let mut accumulator = self.accumulator.lock();
            self.scheduler.lock().flush(&mut accumulator)
        };
        if let Some(minute) = minute {
            self.sync.dispatch(minute);
        }
    }
}

/// A live watch-tracking pipeline for one mounted video.
pub struct WatchSession<B: PlayerBackend> {
    backend: B,
    shared: Arc<SessionShared>,
    live: CancellationToken,
    event_task: JoinHandle<()>,
    cadence_task: JoinHandle<()>,
}

impl<B: PlayerBackend> std::fmt::Debug for WatchSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchSession")
            .field("video_id", &self.shared.accumulator.lock().video_id())
            .finish()
    }
}

impl<B: PlayerBackend> WatchSession<B> {
    /// Mount the pipeline: attach the backend and start the event and
    /// cadence tasks.
    pub async fn attach(
        video_id: VideoId,
        mut backend: B,
        ledger: Arc<dyn ProgressLedger>,
        identity: Arc<dyn IdentityResolver>,
        observer: Arc<dyn SessionObserver>,
        config: &WatchConfig,
    ) -> Result<Self> {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        backend.attach(events_tx).await?;

        let live = CancellationToken::new();
        let sync = SyncClient::new(
            video_id,
            ledger,
            identity,
            Arc::clone(&observer),
            live.clone(),
        );
        let shared = Arc::new(SessionShared {
            accumulator: Mutex::new(WatchAccumulator::new(video_id)),
            scheduler: Mutex::new(SyncScheduler::new()),
            duration_secs: Mutex::new(None),
            position_secs: Mutex::new(0),
            observer,
            sync,
        });

        let event_shared = Arc::clone(&shared);
        let event_cancel = live.clone();
        let event_task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = event_cancel.cancelled() => break,
                    event = events_rx.recv() => {
                        let Some(event) = event else { break };
                        event_shared.handle_event(event);
                    }
                }
            }
        });

        let cadence_shared = Arc::clone(&shared);
        let cadence_cancel = live.clone();
        let sync_interval = config.sync_interval();
        let cadence_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sync_interval);
            // The tick at t=0 can never have a completed minute.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cadence_cancel.cancelled() => break,
                    _ = ticker.tick() => cadence_shared.tick(),
                }
            }
        });

        tracing::debug!(video_id = %video_id, "watch session attached");

        Ok(Self {
            backend,
            shared,
            live,
            event_task,
            cadence_task,
        })
    }

    /// Unmount the pipeline.
    ///
    /// Detaches the backend (no further events), drains what was already
    /// emitted, performs the final check-and-flush, then cancels the
    /// internal tasks. After this returns no dispatch is issued and no
    /// observer callback fires; a late network response is inert.
    pub async fn detach(mut self) {
        self.backend.detach().await;
        // The backend dropped its sender; the event task drains the
        // queue and exits on its own, so the flush below sees the last
        // position update.
        let _ = self.event_task.await;

        self.shared.flush_pending();
        self.live.cancel();
        let _ = self.cadence_task.await;

        tracing::debug!(
            video_id = %self.shared.accumulator.lock().video_id(),
            minutes = self.shared.accumulator.lock().last_synced_minute(),
            "watch session detached"
        );
    }

    /// Last observed playhead position, in whole seconds.
    pub fn position_secs(&self) -> u32 {
        *self.shared.position_secs.lock()
    }

    /// Media duration, once the backend reported readiness.
    pub fn duration_secs(&self) -> Option<u32> {
        *self.shared.duration_secs.lock()
    }

    /// Highest completed minute boundary reached so far.
    pub fn minutes_watched(&self) -> u32 {
        self.shared.accumulator.lock().completed_minute()
    }

    /// Distinct seconds observed this session; engagement diagnostic.
    pub fn distinct_seconds(&self) -> usize {
        self.shared.accumulator.lock().distinct_seconds()
    }
}
