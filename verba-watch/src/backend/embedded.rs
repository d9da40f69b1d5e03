//! Normalizer for the embedded third-party iframe player.
//!
//! That player pushes only coarse state changes and does not report
//! sub-second position, so while playback is active the backend polls
//! the player's position query on a fixed cadence (~1 s) and synthesizes
//! `TimeUpdate` events. Polling stops the moment playback stops.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use verba_model::PlaybackEvent;

use super::PlayerBackend;
use crate::error::{Result, WatchError};

/// Coarse state notifications pushed by the embedded player's bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddedPlayerState {
    Ready { duration_secs: f64 },
    Playing,
    Paused,
    Ended,
    Failed { message: String },
}

/// Position query exposed by the embedded player's bridge.
#[async_trait]
pub trait EmbeddedPlayerProbe: Send + Sync {
    /// Current playhead position in seconds.
    async fn position_secs(&self) -> Result<f64>;
}

/// Normalizer over the iframe-embedded player.
pub struct EmbeddedBackend<P> {
    probe: Arc<P>,
    states: Option<mpsc::UnboundedReceiver<EmbeddedPlayerState>>,
    poll_interval: Duration,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl<P> std::fmt::Debug for EmbeddedBackend<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedBackend")
            .field("poll_interval", &self.poll_interval)
            .field("attached", &self.task.is_some())
            .finish()
    }
}

impl<P: EmbeddedPlayerProbe + 'static> EmbeddedBackend<P> {
    pub fn new(
        probe: Arc<P>,
        states: mpsc::UnboundedReceiver<EmbeddedPlayerState>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            probe,
            states: Some(states),
            poll_interval,
            cancel: CancellationToken::new(),
            task: None,
        }
    }
}

#[async_trait]
impl<P: EmbeddedPlayerProbe + 'static> PlayerBackend for EmbeddedBackend<P> {
    async fn attach(&mut self, events: mpsc::UnboundedSender<PlaybackEvent>) -> Result<()> {
        let mut states = self.states.take().ok_or_else(|| WatchError::Backend {
            reason: "embedded backend already attached".to_string(),
        })?;

        let probe = Arc::clone(&self.probe);
        let cancel = self.cancel.clone();
        let poll_interval = self.poll_interval;

        self.task = Some(tokio::spawn(async move {
            let mut polling = false;
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,

                    state = states.recv() => {
                        let Some(state) = state else { break };
                        let event = match state {
                            EmbeddedPlayerState::Ready { duration_secs } => {
                                PlaybackEvent::from_reported_duration(duration_secs)
                            }
                            EmbeddedPlayerState::Playing => {
                                polling = true;
                                PlaybackEvent::Play
                            }
                            EmbeddedPlayerState::Paused => {
                                polling = false;
                                PlaybackEvent::Pause
                            }
                            EmbeddedPlayerState::Ended => {
                                polling = false;
                                PlaybackEvent::Ended
                            }
                            EmbeddedPlayerState::Failed { message } => {
                                polling = false;
                                PlaybackEvent::Error { reason: message }
                            }
                        };
                        if events.send(event).is_err() {
                            break;
                        }
                    }

                    _ = ticker.tick(), if polling => {
                        match probe.position_secs().await {
                            Ok(position) if position >= 0.0 => {
                                let event = PlaybackEvent::TimeUpdate {
                                    seconds: position.floor() as u32,
                                };
                                if events.send(event).is_err() {
                                    break;
                                }
                            }
                            Ok(position) => {
                                tracing::debug!(position, "embedded player reported negative position");
                            }
                            Err(err) => {
                                // Transient bridge hiccup; the next tick retries.
                                tracing::warn!(error = %err, "embedded position poll failed");
                            }
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
