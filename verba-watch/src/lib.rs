//! Watch-time accumulation and synchronization engine.
//!
//! Reconciles two structurally different video backends (the embedded
//! third-party iframe player and the native media element) into one
//! normalized stream of playback facts, derives a defensible
//! "minutes watched" signal from it, and synchronizes that signal to the
//! server-side progress ledger under guest or account identity.
//!
//! Pipeline, leaf to root:
//!
//! ```text
//! player backend -> normalizer -> accumulator -> scheduler -> sync client -> ledger
//! ```
//!
//! The UI shell mounts a [`WatchSession`] per video, receives playback
//! state back through [`SessionObserver`], and unmounts with
//! [`WatchSession::detach`]. Sync failures never interrupt playback;
//! they are logged and reported through the observer side channel.

pub mod accumulator;
pub mod backend;
pub mod config;
pub mod error;
pub mod identity;
pub mod scheduler;
pub mod session;
pub mod sync;

pub use accumulator::WatchAccumulator;
pub use backend::{
    EmbeddedBackend, EmbeddedPlayerProbe, EmbeddedPlayerState, MediaElementBackend,
    MediaElementEvent, PlayerBackend,
};
pub use config::WatchConfig;
pub use error::{Result, WatchError};
pub use identity::{IdentityResolver, StoredIdentity};
pub use scheduler::SyncScheduler;
pub use session::{NoopObserver, SessionObserver, WatchSession};
pub use sync::{HttpLedger, ProgressLedger};
