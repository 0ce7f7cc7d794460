//! Vestibule Core Library
//!
//! This crate provides client-side session synchronization against a
//! managed identity platform, including:
//! - Session domain (synchronizer, published view, guarded handle)
//! - Seams for the identity provider, profile store and navigation
//! - REST backends for the credential API and the document store
//! - In-memory backends for tests and offline runs
//! - Configuration with file persistence

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::session::{
        AccountRole, AccountStatus, Navigator, NullNavigator, Route, SessionHandle, SessionState,
        SessionSynchronizer, SessionView, UserSession,
    };
    pub use crate::error::{Error, Result};
}
