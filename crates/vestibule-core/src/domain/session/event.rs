//! Auth state change events delivered by the identity provider
//!
//! Events carry ids and timestamps for log correlation; the synchronizer
//! processes them strictly in arrival order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The identity the provider reports for a signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderIdentity {
    /// Opaque provider-issued user identifier
    pub uid: String,

    /// Email the provider has on file
    pub email: Option<String>,
}

impl ProviderIdentity {
    /// Create a provider identity
    pub fn new(uid: impl Into<String>, email: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            email,
        }
    }
}

/// A change to the provider's signed-in state
///
/// Delivered once with the current state when a subscription starts, then
/// on every subsequent change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStateChange {
    /// Unique event identifier
    pub id: Uuid,

    /// The signed-in identity, or None when signed out
    pub identity: Option<ProviderIdentity>,

    /// When the change was observed
    pub observed_at: DateTime<Utc>,
}

impl AuthStateChange {
    /// Create a state change event
    pub fn new(identity: Option<ProviderIdentity>) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            observed_at: Utc::now(),
        }
    }

    /// Create a signed-in event
    pub fn signed_in(identity: ProviderIdentity) -> Self {
        Self::new(Some(identity))
    }

    /// Create a signed-out event
    pub fn signed_out() -> Self {
        Self::new(None)
    }

    /// Check if this event reports a signed-in identity
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }
}
