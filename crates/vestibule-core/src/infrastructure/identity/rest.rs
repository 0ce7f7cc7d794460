//! REST identity provider
//!
//! Client for an Identity-Toolkit-style credential API. The platform owns
//! credential verification, password policy and token handling; this
//! client maps its responses onto the provider seam and notifies
//! subscribers of the resulting sign-in state.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use crate::config::IdentityConfig;
use crate::domain::session::event::{AuthStateChange, ProviderIdentity};
use crate::domain::session::provider::IdentityProvider;
use crate::error::{Error, Result};
use crate::infrastructure::fanout::StateFanout;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialResponse {
    local_id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Identity provider backed by a credential REST API
pub struct RestIdentityProvider {
    client: Client,
    base_url: String,
    api_key: String,
    current: RwLock<Option<ProviderIdentity>>,
    fanout: StateFanout,
}

impl RestIdentityProvider {
    /// Create a provider from configuration
    ///
    /// Fails if the API key is not resolvable from the environment.
    pub fn from_config(config: &IdentityConfig) -> Result<Self> {
        let api_key = config
            .resolved_api_key()
            .map_err(|e| Error::Config(e.to_string()))?
            .ok_or_else(|| {
                Error::Config("identity API key not set; export VESTIBULE_API_KEY".to_string())
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            current: RwLock::new(None),
            fanout: StateFanout::new(),
        })
    }

    async fn credential_call(
        &self,
        operation: &str,
        email: &str,
        password: &str,
    ) -> Result<ProviderIdentity> {
        let url = format!(
            "{}/v1/accounts:{}?key={}",
            self.base_url, operation, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&CredentialRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorEnvelope>()
                .await
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| status.to_string());
            debug!(operation = operation, status = %status, message = %message, "credential call rejected");
            return Err(map_rejection(&message, email));
        }

        let body: CredentialResponse = response.json().await?;
        Ok(ProviderIdentity::new(body.local_id, body.email))
    }

    async fn sign_in(&self, identity: ProviderIdentity) {
        *self.current.write().await = Some(identity.clone());
        self.fanout.emit(AuthStateChange::signed_in(identity)).await;
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn subscribe(&self) -> mpsc::Receiver<AuthStateChange> {
        let current = self.current.read().await.clone();
        self.fanout.subscribe(current).await
    }

    async fn create_credential(&self, email: &str, password: &str) -> Result<ProviderIdentity> {
        let identity = self.credential_call("signUp", email, password).await?;
        self.sign_in(identity.clone()).await;
        Ok(identity)
    }

    async fn verify_credential(&self, email: &str, password: &str) -> Result<ProviderIdentity> {
        let identity = self
            .credential_call("signInWithPassword", email, password)
            .await?;
        self.sign_in(identity.clone()).await;
        Ok(identity)
    }

    async fn end_session(&self) -> Result<()> {
        // The credential API has no server-side sign-out; token
        // invalidation is the platform's concern. Clearing the local
        // notion of the signed-in identity is the whole operation.
        *self.current.write().await = None;
        self.fanout.emit(AuthStateChange::signed_out()).await;
        Ok(())
    }
}

/// Map the API's error message onto the provider error taxonomy
fn map_rejection(message: &str, email: &str) -> Error {
    if message.starts_with("EMAIL_EXISTS") {
        return Error::EmailTaken(email.to_string());
    }
    if message.starts_with("WEAK_PASSWORD") {
        return Error::WeakPassword(message.to_string());
    }
    if message.starts_with("INVALID_LOGIN_CREDENTIALS")
        || message.starts_with("INVALID_PASSWORD")
        || message.starts_with("EMAIL_NOT_FOUND")
    {
        return Error::InvalidCredentials;
    }
    Error::Provider(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_mapping() {
        assert!(matches!(
            map_rejection("EMAIL_EXISTS", "a@b.com"),
            Error::EmailTaken(email) if email == "a@b.com"
        ));
        assert!(matches!(
            map_rejection("WEAK_PASSWORD : Password should be at least 6 characters", "a@b.com"),
            Error::WeakPassword(_)
        ));
        assert!(matches!(
            map_rejection("INVALID_LOGIN_CREDENTIALS", "a@b.com"),
            Error::InvalidCredentials
        ));
        assert!(matches!(
            map_rejection("EMAIL_NOT_FOUND", "a@b.com"),
            Error::InvalidCredentials
        ));
        assert!(matches!(
            map_rejection("TOO_MANY_ATTEMPTS_TRY_LATER", "a@b.com"),
            Error::Provider(_)
        ));
    }

    #[test]
    fn test_credential_response_parses_wire_shape() {
        let json = r#"{"localId":"uid-1","email":"a@b.com","idToken":"opaque"}"#;
        let body: CredentialResponse = serde_json::from_str(json).expect("response should parse");
        assert_eq!(body.local_id, "uid-1");
        assert_eq!(body.email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_error_envelope_parses() {
        let json = r#"{"error":{"code":400,"message":"EMAIL_EXISTS","errors":[]}}"#;
        let envelope: ApiErrorEnvelope = serde_json::from_str(json).expect("envelope should parse");
        assert_eq!(envelope.error.message, "EMAIL_EXISTS");
    }
}
