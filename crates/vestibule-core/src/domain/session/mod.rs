//! Session domain module
//!
//! Client-side session synchronization against an external identity
//! provider and a remote profile store.
//!
//! # Architecture
//!
//! - **Entities**: `UserSession`, `ProfileRecord`, `SessionView`,
//!   `AuthStateChange`
//! - **Seams**: `IdentityProvider`, `ProfileStore`, `Navigator`
//! - **Synchronizer**: `SessionSynchronizer` consuming provider events and
//!   publishing the consolidated view
//! - **Handle**: `SessionHandle`, the guarded consumer access point
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vestibule_core::domain::session::SessionSynchronizer;
//! use vestibule_core::domain::session::navigator::NullNavigator;
//! use vestibule_core::infrastructure::memory::{MemoryIdentityProvider, MemoryProfileStore};
//!
//! let synchronizer = SessionSynchronizer::start(
//!     Arc::new(MemoryIdentityProvider::new()),
//!     Arc::new(MemoryProfileStore::new()),
//!     Arc::new(NullNavigator),
//! )
//! .await;
//!
//! synchronizer.register("a@b.com", "hunter22", None, None).await?;
//! let handle = synchronizer.handle();
//! assert!(handle.current().state.is_signed_in());
//! ```

pub mod event;
pub mod handle;
pub mod navigator;
pub mod profile;
pub mod provider;
pub mod session;
pub mod store;
pub mod synchronizer;

// Re-export main types
pub use event::{AuthStateChange, ProviderIdentity};
pub use handle::SessionHandle;
pub use navigator::{Navigator, NullNavigator, Route};
pub use profile::ProfileRecord;
pub use provider::IdentityProvider;
pub use session::{AccountRole, AccountStatus, SessionState, SessionView, UserSession};
pub use store::ProfileStore;
pub use synchronizer::SessionSynchronizer;
