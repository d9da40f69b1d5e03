//! Player backend normalization.
//!
//! Each concrete playback surface, embedded third-party iframe player or
//! native media element, is wrapped behind one port that
//! emits the shared [`PlaybackEvent`] vocabulary. Nothing downstream of
//! this module knows which backend is playing.

mod embedded;
mod native;

pub use embedded::{EmbeddedBackend, EmbeddedPlayerProbe, EmbeddedPlayerState};
pub use native::{MediaElementBackend, MediaElementEvent};

use async_trait::async_trait;
use tokio::sync::mpsc;
use verba_model::PlaybackEvent;

use crate::error::Result;

/// Port over a concrete playback surface.
///
/// Contract: after `detach` returns, no further events are delivered to
/// the sink. The normalizer's internal tasks are cancelled and its
/// sender is dropped before the call completes, which is what prevents
/// use-after-unmount writes into a dead accumulator.
#[async_trait]
pub trait PlayerBackend: Send {
    /// Start translating backend-native notifications into normalized
    /// events on `events`. Attaching twice is a contract violation and
    /// fails with [`crate::WatchError::Backend`].
    async fn attach(&mut self, events: mpsc::UnboundedSender<PlaybackEvent>) -> Result<()>;

    /// Stop event delivery. Idempotent.
    async fn detach(&mut self);
}
