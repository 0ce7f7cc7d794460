//! Profile store seam
//!
//! Abstracts over the remote document store holding profile records. The
//! store resolves concurrent writers with its own last-write-wins
//! semantics; this trait only exposes keyed reads and writes.

use async_trait::async_trait;

use crate::error::Result;

use super::profile::ProfileRecord;

/// Keyed access to profile records
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the record keyed by a provider identity, if it exists
    async fn get(&self, identity: &str) -> Result<Option<ProfileRecord>>;

    /// Write the record keyed by a provider identity
    async fn put(&self, identity: &str, record: &ProfileRecord) -> Result<()>;
}
