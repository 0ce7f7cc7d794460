//! Session entity and related types
//!
//! Defines the in-memory session mirrored from the remote profile record,
//! and the consolidated view published to the UI layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::profile::ProfileRecord;

/// Role granted to an account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Regular account
    #[default]
    User,
    /// Administrative account
    Admin,
}

impl AccountRole {
    /// Create from string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Standing of an account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account is in good standing
    #[default]
    Active,
    /// Account has been suspended
    Suspended,
}

impl AccountStatus {
    /// Create from string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The signed-in user's session, reconstructed from the remote profile
/// record every time the provider reports a signed-in identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    /// Opaque provider-issued user identifier
    pub identity: String,

    /// Email, sourced from the provider at creation
    pub email: Option<String>,

    /// User-supplied business name
    pub business_name: Option<String>,

    /// User-supplied website
    pub website: Option<String>,

    /// Role read from the profile record
    pub role: AccountRole,

    /// Standing read from the profile record
    pub status: AccountStatus,
}

impl UserSession {
    /// Build a session from a stored profile record
    pub fn from_record(identity: impl Into<String>, record: &ProfileRecord) -> Self {
        Self {
            identity: identity.into(),
            email: record.email.clone(),
            business_name: record.business_name.clone(),
            website: record.website.clone(),
            role: record.role,
            status: record.status,
        }
    }

    /// Check if this session carries the admin role
    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }
}

/// Signed-in-or-absent session state
///
/// Every transition installs a complete replacement value; the state is
/// never partially mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No signed-in user
    #[default]
    Absent,
    /// A signed-in user with a reconciled profile
    SignedIn(UserSession),
}

impl SessionState {
    /// The signed-in session, if any
    pub fn session(&self) -> Option<&UserSession> {
        match self {
            Self::Absent => None,
            Self::SignedIn(session) => Some(session),
        }
    }

    /// The signed-in identity, if any
    pub fn identity(&self) -> Option<&str> {
        self.session().map(|s| s.identity.as_str())
    }

    /// Check if a user is signed in
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }
}

/// The consolidated view published to consumers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionView {
    /// Current session state
    pub state: SessionState,

    /// An operation (register, login, logout) is in flight
    pub loading: bool,

    /// The very first provider state resolution has not yet completed;
    /// consumers render a placeholder while this is set
    pub initializing: bool,
}

impl SessionView {
    /// The view installed before the first provider event arrives
    pub fn initializing() -> Self {
        Self {
            state: SessionState::Absent,
            loading: false,
            initializing: true,
        }
    }

    /// Check if the current session carries the admin role
    ///
    /// False for an absent session.
    pub fn is_admin(&self) -> bool {
        self.state.session().is_some_and(UserSession::is_admin)
    }
}
