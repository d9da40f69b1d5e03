use crate::ids::GuestSessionId;

/// Bearer credential for an authenticated account.
///
/// The engine only carries this token; issuance, refresh and revocation
/// belong to the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthToken {
    pub access_token: String,
    pub expires_in: u64,
}

/// Whichever credential is available at dispatch time.
///
/// A guest session id always exists by construction, so resolution can
/// never come up empty-handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Guest(GuestSessionId),
    Account(AuthToken),
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Account(_))
    }

    /// The guest session id, when this identity is anonymous.
    pub fn guest_id(&self) -> Option<GuestSessionId> {
        match self {
            Identity::Guest(id) => Some(*id),
            Identity::Account(_) => None,
        }
    }

    /// The bearer token, when this identity is an account.
    pub fn token(&self) -> Option<&AuthToken> {
        match self {
            Identity::Guest(_) => None,
            Identity::Account(token) => Some(token),
        }
    }
}
