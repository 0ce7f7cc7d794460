//! In-memory identity provider and profile store
//!
//! Backends for tests and offline runs. The provider mimics the managed
//! platform's own credential validation (duplicate emails rejected,
//! minimum password length) so callers exercise the same error taxonomy
//! they would see against the real service.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex, RwLock};
use uuid::Uuid;

use crate::domain::session::event::{AuthStateChange, ProviderIdentity};
use crate::domain::session::profile::ProfileRecord;
use crate::domain::session::provider::IdentityProvider;
use crate::domain::session::store::ProfileStore;
use crate::error::{Error, Result};

use super::fanout::StateFanout;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct MemoryAccount {
    uid: String,
    password: String,
}

/// In-process identity provider
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: Mutex<HashMap<String, MemoryAccount>>,
    current: RwLock<Option<ProviderIdentity>>,
    fanout: StateFanout,
}

impl MemoryIdentityProvider {
    /// Create a provider with no accounts and no signed-in identity
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a credential without signing it in
    ///
    /// Useful for exercising login paths against a pre-existing account.
    pub async fn seed_account(&self, email: &str, password: &str) -> ProviderIdentity {
        let uid = Uuid::new_v4().to_string();
        self.accounts.lock().await.insert(
            email.to_string(),
            MemoryAccount {
                uid: uid.clone(),
                password: password.to_string(),
            },
        );
        ProviderIdentity::new(uid, Some(email.to_string()))
    }

    /// Replace the signed-in state from outside, as the platform does when
    /// another device signs in or a token expires
    pub async fn push_state(&self, identity: Option<ProviderIdentity>) {
        *self.current.write().await = identity.clone();
        self.fanout.emit(AuthStateChange::new(identity)).await;
    }

    async fn sign_in(&self, identity: ProviderIdentity) {
        *self.current.write().await = Some(identity.clone());
        self.fanout.emit(AuthStateChange::signed_in(identity)).await;
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn subscribe(&self) -> mpsc::Receiver<AuthStateChange> {
        let current = self.current.read().await.clone();
        self.fanout.subscribe(current).await
    }

    async fn create_credential(&self, email: &str, password: &str) -> Result<ProviderIdentity> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::WeakPassword(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let uid = {
            let mut accounts = self.accounts.lock().await;
            if accounts.contains_key(email) {
                return Err(Error::EmailTaken(email.to_string()));
            }
            let uid = Uuid::new_v4().to_string();
            accounts.insert(
                email.to_string(),
                MemoryAccount {
                    uid: uid.clone(),
                    password: password.to_string(),
                },
            );
            uid
        };

        let identity = ProviderIdentity::new(uid, Some(email.to_string()));
        self.sign_in(identity.clone()).await;
        Ok(identity)
    }

    async fn verify_credential(&self, email: &str, password: &str) -> Result<ProviderIdentity> {
        let account = {
            let accounts = self.accounts.lock().await;
            match accounts.get(email) {
                Some(account) if account.password == password => account.clone(),
                _ => return Err(Error::InvalidCredentials),
            }
        };

        let identity = ProviderIdentity::new(account.uid, Some(email.to_string()));
        self.sign_in(identity.clone()).await;
        Ok(identity)
    }

    async fn end_session(&self) -> Result<()> {
        *self.current.write().await = None;
        self.fanout.emit(AuthStateChange::signed_out()).await;
        Ok(())
    }
}

/// In-process profile store
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    records: Mutex<HashMap<String, ProfileRecord>>,
}

impl MemoryProfileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Check if the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, identity: &str) -> Result<Option<ProfileRecord>> {
        Ok(self.records.lock().await.get(identity).cloned())
    }

    async fn put(&self, identity: &str, record: &ProfileRecord) -> Result<()> {
        self.records
            .lock()
            .await
            .insert(identity.to_string(), record.clone());
        Ok(())
    }
}
