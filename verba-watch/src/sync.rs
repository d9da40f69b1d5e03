//! Progress synchronization.
//!
//! [`ProgressLedger`] is the port over the server-side ledger;
//! [`HttpLedger`] is its production transport. [`SyncClient`] is the
//! fire-and-forget dispatcher the session uses: it resolves identity at
//! send time, spawns the request, and only ever uses the outcome for
//! logging and the failure side channel, never for control flow, so
//! playback can mechanically never block on the network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, StatusCode};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;
use verba_model::{DailyGoalSummary, Identity, ProgressUpdate, StreakSummary, VideoId};

use crate::error::{Result, WatchError};
use crate::identity::IdentityResolver;
use crate::session::SessionObserver;

/// Port over the external progress ledger.
///
/// The write side is idempotent per `(identity, video)` for
/// non-decreasing minute values; the read side mirrors the server's
/// aggregation and is only ever called by the UI shell, never scheduled
/// by the engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressLedger: Send + Sync {
    async fn record_progress(&self, update: &ProgressUpdate, identity: &Identity) -> Result<()>;

    async fn fetch_daily_goal(&self, identity: &Identity) -> Result<DailyGoalSummary>;

    async fn fetch_streak(&self, identity: &Identity) -> Result<StreakSummary>;
}

/// HTTP transport for the progress ledger.
#[derive(Debug, Clone)]
pub struct HttpLedger {
    client: Client,
    base_url: Url,
    api_version: String,
}

impl HttpLedger {
    /// Build a transport with a bounded per-request timeout, so a slow
    /// network never accumulates unbounded in-flight requests across
    /// successive minute boundaries.
    pub fn new(base_url: Url, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_version: "v1".to_string(),
        })
    }

    /// Build a versioned API URL
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/api/{}/{}", base, self.api_version, path)
    }

    /// Guests identify through a query parameter, accounts through the
    /// Authorization header.
    fn with_identity(&self, builder: RequestBuilder, identity: &Identity) -> RequestBuilder {
        match identity {
            Identity::Account(token) => builder.bearer_auth(&token.access_token),
            Identity::Guest(id) => builder.query(&[("session_id", id.to_string())]),
        }
    }

    async fn ledger_error(response: reqwest::Response) -> WatchError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        WatchError::Ledger { status, message }
    }
}

#[async_trait]
impl ProgressLedger for HttpLedger {
    async fn record_progress(&self, update: &ProgressUpdate, identity: &Identity) -> Result<()> {
        let mut request = self
            .client
            .post(self.build_url("watch/progress"))
            .json(update);
        // The guest session id already rides in the body for anonymous
        // updates; only accounts need a header.
        if let Identity::Account(token) = identity {
            request = request.bearer_auth(&token.access_token);
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            _ => Err(Self::ledger_error(response).await),
        }
    }

    async fn fetch_daily_goal(&self, identity: &Identity) -> Result<DailyGoalSummary> {
        let request = self.client.get(self.build_url("watch/goal"));
        let response = self.with_identity(request, identity).send().await?;
        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            _ => Err(Self::ledger_error(response).await),
        }
    }

    async fn fetch_streak(&self, identity: &Identity) -> Result<StreakSummary> {
        let request = self.client.get(self.build_url("watch/streak"));
        let response = self.with_identity(request, identity).send().await?;
        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            _ => Err(Self::ledger_error(response).await),
        }
    }
}

/// Fire-and-forget dispatcher for minute updates.
pub(crate) struct SyncClient {
    video_id: VideoId,
    ledger: Arc<dyn ProgressLedger>,
    identity: Arc<dyn IdentityResolver>,
    observer: Arc<dyn SessionObserver>,
    live: CancellationToken,
}

impl std::fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncClient")
            .field("video_id", &self.video_id)
            .finish()
    }
}

impl SyncClient {
    pub(crate) fn new(
        video_id: VideoId,
        ledger: Arc<dyn ProgressLedger>,
        identity: Arc<dyn IdentityResolver>,
        observer: Arc<dyn SessionObserver>,
        live: CancellationToken,
    ) -> Self {
        Self {
            video_id,
            ledger,
            identity,
            observer,
            live,
        }
    }

    /// Dispatch one minute update. The identity is resolved now, at send
    /// time, so a mid-session login is picked up by the next dispatch.
    /// The returned handle is only used by tests; the scheduler never
    /// awaits it.
    pub(crate) fn dispatch(&self, minute: u32) -> JoinHandle<()> {
        let identity = self.identity.current();
        let update = ProgressUpdate {
            video_id: self.video_id,
            watched_minutes: minute,
            session_id: identity.guest_id(),
            recorded_at: Utc::now(),
        };

        let ledger = Arc::clone(&self.ledger);
        let observer = Arc::clone(&self.observer);
        let live = self.live.clone();

        tokio::spawn(async move {
            match ledger.record_progress(&update, &identity).await {
                Ok(()) => {
                    tracing::debug!(
                        video_id = %update.video_id,
                        minute = update.watched_minutes,
                        authenticated = identity.is_authenticated(),
                        "synced watch progress"
                    );
                }
                Err(err) => {
                    // Dropped minutes are acceptable loss; never retried,
                    // never raised into the playback pipeline.
                    tracing::warn!(
                        video_id = %update.video_id,
                        minute = update.watched_minutes,
                        error = %err,
                        "failed to sync watch progress"
                    );
                    if !live.is_cancelled() {
                        observer.on_sync_failure(&err.to_string());
                    }
                }
            }
        })
    }
}
