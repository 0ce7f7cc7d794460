//! Session synchronizer orchestrating provider events and profile records
//!
//! Owns the published session view. A single background task consumes the
//! provider's state-change events strictly in arrival order; for each
//! signed-in identity the profile record is fetched, or created with the
//! registration defaults, and adopted as the session. Register, login and
//! logout wrap the corresponding provider calls and install their result
//! optimistically; the provider's own echo of the change re-resolves the
//! same identity, which converges to the same record-derived shape.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

use super::event::{AuthStateChange, ProviderIdentity};
use super::handle::SessionHandle;
use super::navigator::{Navigator, Route};
use super::profile::ProfileRecord;
use super::provider::IdentityProvider;
use super::session::{SessionState, SessionView, UserSession};
use super::store::ProfileStore;

/// Synchronizer owning the published session view
///
/// Dropping the synchronizer aborts the subscription task; in-flight
/// external calls are left to settle but their result is no longer
/// applied. Use [`SessionSynchronizer::shutdown`] for a deterministic
/// teardown that detaches all handles before returning.
pub struct SessionSynchronizer {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn ProfileStore>,
    navigator: Arc<dyn Navigator>,
    view: Arc<watch::Sender<SessionView>>,
    subscription: JoinHandle<()>,
}

impl SessionSynchronizer {
    /// Subscribe to the provider and start the event-consumer task
    ///
    /// The view starts as absent with `initializing` set; the flag clears
    /// once the provider delivers its first state resolution.
    pub async fn start(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn ProfileStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (view_tx, _view_rx) = watch::channel(SessionView::initializing());
        let view = Arc::new(view_tx);

        let events = provider.subscribe().await;
        let subscription = tokio::spawn(Self::run_subscription(
            events,
            Arc::clone(&store),
            Arc::clone(&view),
        ));

        Self {
            provider,
            store,
            navigator,
            view,
            subscription,
        }
    }

    /// Get a guarded handle for consumers of the published view
    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(self.view.subscribe())
    }

    /// The currently published view
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// Check if the current session carries the admin role
    ///
    /// False for an absent session.
    pub fn is_admin(&self) -> bool {
        self.view.borrow().is_admin()
    }

    // ========== Operations ==========

    /// Create a credential and a profile record, then sign in
    ///
    /// Email/password validation is the provider's; it is not repeated
    /// here. On success the session is installed immediately rather than
    /// waiting for the provider's echo, so the UI never flashes a
    /// signed-out state. Provider or store rejections propagate and leave
    /// the session unchanged.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        business_name: Option<String>,
        website: Option<String>,
    ) -> Result<()> {
        self.set_loading(true);
        let result = self
            .register_inner(email, password, business_name, website)
            .await;
        self.set_loading(false);
        result
    }

    async fn register_inner(
        &self,
        email: &str,
        password: &str,
        business_name: Option<String>,
        website: Option<String>,
    ) -> Result<()> {
        let identity = self.provider.create_credential(email, password).await?;

        let record = ProfileRecord::new(identity.email.clone(), business_name, website);
        self.store.put(&identity.uid, &record).await?;

        self.install(SessionState::SignedIn(UserSession::from_record(
            &identity.uid,
            &record,
        )));
        info!(identity = %identity.uid, "registered new account");

        self.navigator.navigate(Route::Landing);
        Ok(())
    }

    /// Verify a credential and adopt the existing profile record
    ///
    /// Login never creates a record. If the provider authenticates but no
    /// record exists, the session is left untouched and the condition is
    /// surfaced as [`Error::ProfileMissing`].
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        self.set_loading(true);
        let result = self.login_inner(email, password).await;
        self.set_loading(false);
        result
    }

    async fn login_inner(&self, email: &str, password: &str) -> Result<()> {
        let identity = self.provider.verify_credential(email, password).await?;

        match self.store.get(&identity.uid).await? {
            Some(record) => {
                self.install(SessionState::SignedIn(UserSession::from_record(
                    &identity.uid,
                    &record,
                )));
                info!(identity = %identity.uid, "signed in");

                self.navigator.navigate(Route::Landing);
                Ok(())
            }
            None => {
                warn!(
                    identity = %identity.uid,
                    "provider authenticated an identity with no profile record"
                );
                Err(Error::ProfileMissing(identity.uid))
            }
        }
    }

    /// End the provider session and publish the absent state
    pub async fn logout(&self) -> Result<()> {
        self.set_loading(true);
        let result = self.logout_inner().await;
        self.set_loading(false);
        result
    }

    async fn logout_inner(&self) -> Result<()> {
        self.provider.end_session().await?;

        self.install(SessionState::Absent);
        info!("signed out");

        self.navigator.navigate(Route::Root);
        Ok(())
    }

    /// Abort the subscription task and detach every handle
    ///
    /// Returns once the task has terminated, so callers can rely on
    /// handles observing the detachment immediately afterwards.
    pub async fn shutdown(mut self) {
        self.subscription.abort();
        let _ = (&mut self.subscription).await;
    }

    // ========== Internals ==========

    fn install(&self, state: SessionState) {
        self.view.send_modify(|view| view.state = state);
    }

    fn set_loading(&self, loading: bool) {
        self.view.send_modify(|view| view.loading = loading);
    }

    /// Consume provider events in arrival order for the synchronizer's
    /// lifetime
    async fn run_subscription(
        mut events: mpsc::Receiver<AuthStateChange>,
        store: Arc<dyn ProfileStore>,
        view: Arc<watch::Sender<SessionView>>,
    ) {
        while let Some(change) = events.recv().await {
            let state = match &change.identity {
                None => SessionState::Absent,
                Some(identity) => match Self::resolve(store.as_ref(), identity).await {
                    Ok(session) => SessionState::SignedIn(session),
                    Err(error) => {
                        // Favor appearing signed out over appearing signed
                        // in with an unreconciled profile; the subscription
                        // itself keeps running.
                        warn!(
                            event = %change.id,
                            identity = %identity.uid,
                            error = %error,
                            "profile reconciliation failed; publishing absent session"
                        );
                        SessionState::Absent
                    }
                },
            };

            debug!(
                event = %change.id,
                signed_in = state.is_signed_in(),
                "provider state change applied"
            );

            view.send_modify(|v| {
                v.state = state;
                v.initializing = false;
                v.loading = false;
            });
        }

        debug!("provider event channel closed; subscription ending");
    }

    /// Fetch the record for an identity, creating the default record on
    /// first sign-in
    async fn resolve(store: &dyn ProfileStore, identity: &ProviderIdentity) -> Result<UserSession> {
        match store.get(&identity.uid).await? {
            Some(record) => Ok(UserSession::from_record(&identity.uid, &record)),
            None => {
                let record = ProfileRecord::with_defaults(identity.email.clone());
                store.put(&identity.uid, &record).await?;
                info!(identity = %identity.uid, "created default profile record on first sign-in");
                Ok(UserSession::from_record(&identity.uid, &record))
            }
        }
    }
}

impl Drop for SessionSynchronizer {
    fn drop(&mut self) {
        self.subscription.abort();
    }
}
