//! Normalizer for the native media element.
//!
//! The element pushes its own progress/ended/error notifications, so no
//! polling is needed: this backend only translates the native event
//! stream into the shared vocabulary and applies the duration check.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use verba_model::PlaybackEvent;

use super::PlayerBackend;
use crate::error::{Result, WatchError};

/// Notifications pushed by the native media element's bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaElementEvent {
    LoadedMetadata { duration_secs: f64 },
    TimeUpdate { position_secs: f64 },
    Play,
    Pause,
    Ended,
    Error { message: String },
}

/// Normalizer over the native media element.
pub struct MediaElementBackend {
    native: Option<mpsc::UnboundedReceiver<MediaElementEvent>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for MediaElementBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaElementBackend")
            .field("attached", &self.task.is_some())
            .finish()
    }
}

impl MediaElementBackend {
    pub fn new(native: mpsc::UnboundedReceiver<MediaElementEvent>) -> Self {
        Self {
            native: Some(native),
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    fn normalize(event: MediaElementEvent) -> PlaybackEvent {
        match event {
            MediaElementEvent::LoadedMetadata { duration_secs } => {
                PlaybackEvent::from_reported_duration(duration_secs)
            }
            MediaElementEvent::TimeUpdate { position_secs } => PlaybackEvent::TimeUpdate {
                // Backward jumps are forwarded as-is; dedup lives in the
                // accumulator, not here.
                seconds: position_secs.max(0.0).floor() as u32,
            },
            MediaElementEvent::Play => PlaybackEvent::Play,
            MediaElementEvent::Pause => PlaybackEvent::Pause,
            MediaElementEvent::Ended => PlaybackEvent::Ended,
            MediaElementEvent::Error { message } => PlaybackEvent::Error { reason: message },
        }
    }
}

#[async_trait]
impl PlayerBackend for MediaElementBackend {
    async fn attach(&mut self, events: mpsc::UnboundedSender<PlaybackEvent>) -> Result<()> {
        let mut native = self.native.take().ok_or_else(|| WatchError::Backend {
            reason: "media element backend already attached".to_string(),
        })?;

        let cancel = self.cancel.clone();
        self.task = Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    event = native.recv() => {
                        let Some(event) = event else { break };
                        if events.send(Self::normalize(event)).is_err() {
                            break;
                        }
                    }
                }
            }
        }));

        Ok(())
    }

    async fn detach(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}
