//! Identity provider seam
//!
//! Abstracts over the external identity platform. Credential validation,
//! token refresh and transport security all live behind this trait; the
//! synchronizer only consumes its state-change events and credential
//! operations.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;

use super::event::{AuthStateChange, ProviderIdentity};

/// Identity provider capability set
///
/// Implementations must deliver the current signed-in state once,
/// immediately, on every new subscription, and then an event for every
/// subsequent change, in order.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Subscribe to auth state changes
    ///
    /// The receiver yields the current state first, then every change.
    /// Dropping the receiver ends the subscription.
    async fn subscribe(&self) -> mpsc::Receiver<AuthStateChange>;

    /// Create a new credential, signing the user in
    ///
    /// Email and password validation is the provider's own; it is not
    /// re-validated locally.
    async fn create_credential(&self, email: &str, password: &str) -> Result<ProviderIdentity>;

    /// Verify an existing credential, signing the user in
    async fn verify_credential(&self, email: &str, password: &str) -> Result<ProviderIdentity>;

    /// End the current provider session
    async fn end_session(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify trait is object-safe
    fn _assert_object_safe(_: &dyn IdentityProvider) {}
}
