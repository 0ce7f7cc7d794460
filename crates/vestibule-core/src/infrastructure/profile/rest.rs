//! REST profile store
//!
//! Client for a documents REST API holding profile records keyed by
//! provider identity. Concurrent writers are resolved by the store's own
//! last-write-wins semantics.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::ProfileConfig;
use crate::domain::session::profile::ProfileRecord;
use crate::domain::session::store::ProfileStore;
use crate::error::{Error, Result};

/// Profile store backed by a documents REST API
pub struct RestProfileStore {
    client: Client,
    base_url: String,
    collection: String,
}

impl RestProfileStore {
    /// Create a store from configuration
    pub fn from_config(config: &ProfileConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
        })
    }

    fn document_url(&self, identity: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.collection, identity)
    }
}

#[async_trait]
impl ProfileStore for RestProfileStore {
    async fn get(&self, identity: &str) -> Result<Option<ProfileRecord>> {
        let response = self.client.get(self.document_url(identity)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let record = response.json::<ProfileRecord>().await.map_err(|e| {
                    Error::Store(format!("malformed profile record for '{}': {}", identity, e))
                })?;
                Ok(Some(record))
            }
            status => Err(Error::Store(format!(
                "read failed for '{}': HTTP {}",
                identity, status
            ))),
        }
    }

    async fn put(&self, identity: &str, record: &ProfileRecord) -> Result<()> {
        let response = self
            .client
            .patch(self.document_url(identity))
            .json(record)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Store(format!(
                "write failed for '{}': HTTP {}",
                identity, status
            )));
        }

        Ok(())
    }
}
