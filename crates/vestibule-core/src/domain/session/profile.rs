//! Profile record stored in the remote document store
//!
//! The record is the source of truth across app restarts; the in-memory
//! session is reconstructed from it on every provider state change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::{AccountRole, AccountStatus};

/// The profile document keyed by provider identity
///
/// `role` and `status` default when absent so that partially-written
/// records still deserialize into a usable profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Email captured from the provider at creation, immutable afterwards
    pub email: Option<String>,

    /// User-supplied business name
    #[serde(default)]
    pub business_name: Option<String>,

    /// User-supplied website
    #[serde(default)]
    pub website: Option<String>,

    /// Granted role
    #[serde(default)]
    pub role: AccountRole,

    /// Account standing
    #[serde(default)]
    pub status: AccountStatus,

    /// When the record was first written
    pub created_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Create a fresh record with the registration defaults
    pub fn new(
        email: Option<String>,
        business_name: Option<String>,
        website: Option<String>,
    ) -> Self {
        Self {
            email,
            business_name,
            website,
            role: AccountRole::default(),
            status: AccountStatus::default(),
            created_at: Utc::now(),
        }
    }

    /// Create the default record adopted on a first login from a new device
    pub fn with_defaults(email: Option<String>) -> Self {
        Self::new(email, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_defaults() {
        let record = ProfileRecord::new(Some("a@b.com".to_string()), None, None);
        assert_eq!(record.role, AccountRole::User);
        assert_eq!(record.status, AccountStatus::Active);
        assert_eq!(record.email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_partially_written_record_deserializes() {
        // A record missing role/status (written by an older or interrupted
        // writer) must still deserialize with the defaults.
        let json = r#"{"email":"a@b.com","created_at":"2026-01-01T00:00:00Z"}"#;
        let record: ProfileRecord = serde_json::from_str(json).expect("record should parse");

        assert_eq!(record.role, AccountRole::User);
        assert_eq!(record.status, AccountStatus::Active);
        assert_eq!(record.business_name, None);
    }

    #[test]
    fn test_record_round_trip() {
        let record = ProfileRecord::new(
            Some("a@b.com".to_string()),
            Some("Acme".to_string()),
            Some("https://acme.example".to_string()),
        );
        let json = serde_json::to_string(&record).expect("record should serialize");
        let back: ProfileRecord = serde_json::from_str(&json).expect("record should parse");
        assert_eq!(back, record);
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let mut record = ProfileRecord::new(None, None, None);
        record.role = AccountRole::Admin;
        record.status = AccountStatus::Suspended;
        let json = serde_json::to_string(&record).expect("record should serialize");
        assert!(json.contains(r#""role":"admin""#));
        assert!(json.contains(r#""status":"suspended""#));
    }
}
