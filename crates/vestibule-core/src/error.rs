//! Error types for Vestibule

use thiserror::Error;

/// Result type alias using Vestibule's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Vestibule error types
///
/// Operation errors (register, login, logout) propagate to the caller so
/// the UI layer can render them. Failures inside the background
/// subscription are logged and collapse the published session to absent
/// instead of surfacing here.
#[derive(Error, Debug)]
pub enum Error {
    // Provider errors (V100-V199)
    #[error("an account already exists for '{0}'")]
    EmailTaken(String),

    #[error("password rejected by the identity provider: {0}")]
    WeakPassword(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("identity provider error: {0}")]
    Provider(String),

    // Store errors (V200-V299)
    #[error("profile store error: {0}")]
    Store(String),

    #[error("no profile record exists for identity '{0}'")]
    ProfileMissing(String),

    // Wiring errors (V300-V399)
    #[error("session handle is detached: its synchronizer has been torn down")]
    Detached,

    // Config errors (V600-V699)
    #[error("configuration error: {0}")]
    Config(String),

    // Transport errors
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmailTaken(_) => "V100",
            Self::WeakPassword(_) => "V101",
            Self::InvalidCredentials => "V102",
            Self::Provider(_) => "V103",
            Self::Store(_) => "V200",
            Self::ProfileMissing(_) => "V201",
            Self::Detached => "V300",
            Self::Config(_) => "V600",
            Self::Network(_) => "V700",
            Self::Io(_) => "V9999",
        }
    }

    /// Whether this error came from the identity provider rejecting a
    /// credential operation (as opposed to transport or store trouble)
    pub fn is_provider_rejection(&self) -> bool {
        matches!(
            self,
            Self::EmailTaken(_) | Self::WeakPassword(_) | Self::InvalidCredentials | Self::Provider(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::EmailTaken("a@b.com".to_string()).code(), "V100");
        assert_eq!(Error::InvalidCredentials.code(), "V102");
        assert_eq!(Error::Store("io".to_string()).code(), "V200");
        assert_eq!(Error::Detached.code(), "V300");
    }

    #[test]
    fn test_provider_rejection_classification() {
        assert!(Error::InvalidCredentials.is_provider_rejection());
        assert!(Error::EmailTaken("a@b.com".to_string()).is_provider_rejection());
        assert!(!Error::Store("down".to_string()).is_provider_rejection());
        assert!(!Error::Detached.is_provider_rejection());
    }
}
