//! Guarded access point for the published session view
//!
//! Handles are cheap to clone and are the only supported way for the UI
//! layer to read session state. A handle outliving its synchronizer is a
//! wiring defect, not a runtime condition: [`SessionHandle::current`]
//! fails loudly when that happens.

use tokio::sync::watch;

use crate::error::{Error, Result};

use super::session::SessionView;

/// Consumer handle onto the published session view
#[derive(Debug, Clone)]
pub struct SessionHandle {
    view: watch::Receiver<SessionView>,
}

impl SessionHandle {
    pub(crate) fn new(view: watch::Receiver<SessionView>) -> Self {
        Self { view }
    }

    /// The currently published view
    ///
    /// # Panics
    ///
    /// Panics if the owning synchronizer has been torn down. Reading
    /// session state from a detached scope is a programming error; use
    /// [`SessionHandle::try_current`] to observe detachment as a value.
    pub fn current(&self) -> SessionView {
        match self.try_current() {
            Ok(view) => view,
            Err(_) => panic!(
                "session handle used outside its provisioning scope: \
                 the synchronizer that published it has been torn down"
            ),
        }
    }

    /// The currently published view, or [`Error::Detached`]
    pub fn try_current(&self) -> Result<SessionView> {
        if self.view.has_changed().is_err() {
            return Err(Error::Detached);
        }
        Ok(self.view.borrow().clone())
    }

    /// Wait for the next republication and return the new view
    pub async fn changed(&mut self) -> Result<SessionView> {
        self.view.changed().await.map_err(|_| Error::Detached)?;
        Ok(self.view.borrow().clone())
    }

    /// Check if the current session carries the admin role
    ///
    /// False for an absent session. Panics like [`SessionHandle::current`]
    /// when detached.
    pub fn is_admin(&self) -> bool {
        self.current().is_admin()
    }
}
