//! Identity resolution boundary.
//!
//! The engine never mints or rotates credentials; it reads whichever one
//! is available at dispatch time. The guest session id is process-wide
//! state with an explicit lifecycle: created lazily once, persisted for
//! the life of the client profile, read thereafter.

use std::path::Path;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use verba_model::{AuthToken, GuestSessionId, Identity};

use crate::error::Result;

/// Capability the sync client depends on instead of a concrete storage
/// mechanism.
pub trait IdentityResolver: Send + Sync {
    /// Whichever credential is available right now. Never empty: a guest
    /// id exists by construction.
    fn current(&self) -> Identity;
}

#[derive(Debug, Serialize, Deserialize)]
struct GuestSessionFile {
    guest_session_id: GuestSessionId,
}

/// Durable identity store backed by a JSON file in the client config
/// directory, with an in-memory bearer token slot the auth flow updates.
#[derive(Debug)]
pub struct StoredIdentity {
    guest_id: GuestSessionId,
    token: RwLock<Option<AuthToken>>,
}

impl StoredIdentity {
    /// Load the persisted guest id, creating and persisting one on first
    /// use. The id is never regenerated while the file is readable.
    pub fn load_or_create() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| std::io::Error::other("no config directory available"))?;
        Self::load_or_create_in(&base.join("verba"))
    }

    /// Same as [`Self::load_or_create`], rooted at an explicit directory.
    pub fn load_or_create_in(dir: &Path) -> Result<Self> {
        let path = dir.join("guest_session.json");
        let guest_id = match Self::read_guest_id(&path) {
            Some(id) => id,
            None => {
                let id = GuestSessionId::new();
                Self::write_guest_id(&path, id)?;
                tracing::info!(guest_id = %id, "created new guest session identity");
                id
            }
        };

        Ok(Self {
            guest_id,
            token: RwLock::new(None),
        })
    }

    fn read_guest_id(path: &Path) -> Option<GuestSessionId> {
        let content = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str::<GuestSessionFile>(&content) {
            Ok(file) => Some(file.guest_session_id),
            Err(err) => {
                tracing::warn!(error = %err, "guest session file is corrupt; regenerating");
                None
            }
        }
    }

    fn write_guest_id(path: &Path, id: GuestSessionId) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&GuestSessionFile {
            guest_session_id: id,
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn guest_id(&self) -> GuestSessionId {
        self.guest_id
    }

    /// Install or clear the account bearer token. Subsequent dispatches
    /// pick up the change; nothing already sent is resent.
    pub fn set_token(&self, token: Option<AuthToken>) {
        *self.token.write() = token;
    }
}

impl IdentityResolver for StoredIdentity {
    fn current(&self) -> Identity {
        match self.token.read().as_ref() {
            Some(token) => Identity::Account(token.clone()),
            None => Identity::Guest(self.guest_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_id_is_created_once_and_persisted() {
        let dir = tempfile::tempdir().unwrap();

        let first = StoredIdentity::load_or_create_in(dir.path()).unwrap();
        let second = StoredIdentity::load_or_create_in(dir.path()).unwrap();
        assert_eq!(first.guest_id(), second.guest_id());
    }

    #[test]
    fn corrupt_file_regenerates_instead_of_failing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("guest_session.json"), "not json").unwrap();

        let identity = StoredIdentity::load_or_create_in(dir.path()).unwrap();
        // The replacement id must now be durable.
        let reloaded = StoredIdentity::load_or_create_in(dir.path()).unwrap();
        assert_eq!(identity.guest_id(), reloaded.guest_id());
    }

    #[test]
    fn token_takes_precedence_over_guest_id() {
        let dir = tempfile::tempdir().unwrap();
        let identity = StoredIdentity::load_or_create_in(dir.path()).unwrap();

        assert!(!identity.current().is_authenticated());

        identity.set_token(Some(AuthToken {
            access_token: "token123".to_string(),
            expires_in: 3600,
        }));
        assert!(identity.current().is_authenticated());

        identity.set_token(None);
        assert_eq!(
            identity.current().guest_id(),
            Some(identity.guest_id())
        );
    }
}
