//! Vestibule Core Integration Tests
//!
//! Exercises the public crate surface end-to-end against the in-memory
//! backends: provider event streams, operation flows, and the failure
//! behavior of the background reconciliation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use vestibule_core::domain::session::{
    AccountRole, AccountStatus, NullNavigator, ProfileRecord, ProfileStore, ProviderIdentity,
    SessionHandle, SessionState, SessionSynchronizer, SessionView,
};
use vestibule_core::infrastructure::memory::{MemoryIdentityProvider, MemoryProfileStore};
use vestibule_core::{Error, Result};

/// Store wrapper whose reads can be switched to fail, for exercising the
/// background reconciliation's failure path
struct FlakyStore {
    inner: MemoryProfileStore,
    fail_reads: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MemoryProfileStore::new(),
            fail_reads: AtomicBool::new(false),
        }
    }

    fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileStore for FlakyStore {
    async fn get(&self, identity: &str) -> Result<Option<ProfileRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Store("simulated read outage".to_string()));
        }
        self.inner.get(identity).await
    }

    async fn put(&self, identity: &str, record: &ProfileRecord) -> Result<()> {
        self.inner.put(identity, record).await
    }
}

async fn wait_for(
    handle: &mut SessionHandle,
    pred: impl Fn(&SessionView) -> bool,
) -> SessionView {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let view = handle.try_current().expect("handle detached");
            if pred(&view) {
                return view;
            }
            handle.changed().await.expect("handle detached");
        }
    })
    .await
    .expect("view did not converge in time")
}

#[tokio::test]
async fn test_initial_absent_stream_clears_gate() {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let store = Arc::new(MemoryProfileStore::new());
    let synchronizer =
        SessionSynchronizer::start(provider, store, Arc::new(NullNavigator)).await;

    // Before the first resolution the consumer renders the gate.
    let mut handle = synchronizer.handle();

    let view = wait_for(&mut handle, |v| !v.initializing).await;
    assert_eq!(view.state, SessionState::Absent);
    assert!(!view.loading);
    assert!(!synchronizer.is_admin());
}

#[tokio::test]
async fn test_published_identity_follows_event_stream() {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let store = Arc::new(MemoryProfileStore::new());
    let synchronizer = SessionSynchronizer::start(
        provider.clone(),
        store.clone(),
        Arc::new(NullNavigator),
    )
    .await;
    let mut handle = synchronizer.handle();
    wait_for(&mut handle, |v| !v.initializing).await;

    for uid in ["uid-1", "uid-2", "uid-3"] {
        store
            .put(uid, &ProfileRecord::with_defaults(None))
            .await
            .expect("seed record");
    }

    provider
        .push_state(Some(ProviderIdentity::new("uid-1", None)))
        .await;
    provider
        .push_state(Some(ProviderIdentity::new("uid-2", None)))
        .await;
    provider.push_state(None).await;
    provider
        .push_state(Some(ProviderIdentity::new("uid-3", None)))
        .await;

    // The last event wins.
    let view = wait_for(&mut handle, |v| v.state.identity() == Some("uid-3")).await;
    assert!(view.state.is_signed_in());
}

#[tokio::test]
async fn test_register_round_trip_record() {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let store = Arc::new(MemoryProfileStore::new());
    let synchronizer = SessionSynchronizer::start(
        provider,
        store.clone(),
        Arc::new(NullNavigator),
    )
    .await;

    synchronizer
        .register(
            "merchant@example.com",
            "hunter22",
            Some("Acme".to_string()),
            Some("https://acme.example".to_string()),
        )
        .await
        .expect("register should succeed");

    let identity = synchronizer
        .view()
        .state
        .identity()
        .expect("session should be signed in")
        .to_string();

    let record = store
        .get(&identity)
        .await
        .expect("read should succeed")
        .expect("record should exist");
    assert_eq!(record.business_name.as_deref(), Some("Acme"));
    assert_eq!(record.website.as_deref(), Some("https://acme.example"));
    assert_eq!(record.role, AccountRole::User);
    assert_eq!(record.status, AccountStatus::Active);
}

#[tokio::test]
async fn test_failed_login_keeps_absent_session() {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let store = Arc::new(MemoryProfileStore::new());
    let synchronizer =
        SessionSynchronizer::start(provider, store, Arc::new(NullNavigator)).await;
    let mut handle = synchronizer.handle();
    wait_for(&mut handle, |v| !v.initializing).await;

    let error = synchronizer
        .login("a@b.com", "wrong")
        .await
        .expect_err("unknown account should fail");
    assert!(matches!(error, Error::InvalidCredentials));

    let view = synchronizer.view();
    assert_eq!(view.state, SessionState::Absent);
    assert!(!view.loading);
}

#[tokio::test]
async fn test_logout_then_is_admin_false() {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let store = Arc::new(MemoryProfileStore::new());
    let synchronizer = SessionSynchronizer::start(
        provider,
        store.clone(),
        Arc::new(NullNavigator),
    )
    .await;

    synchronizer
        .register("root@example.com", "hunter22", None, None)
        .await
        .expect("register should succeed");
    let identity = synchronizer
        .view()
        .state
        .identity()
        .expect("signed in")
        .to_string();

    // Promote the stored record and sign in again so the session adopts it.
    let mut record = store
        .get(&identity)
        .await
        .expect("read")
        .expect("record exists");
    record.role = AccountRole::Admin;
    store.put(&identity, &record).await.expect("write");

    synchronizer
        .login("root@example.com", "hunter22")
        .await
        .expect("login should succeed");
    assert!(synchronizer.is_admin());

    synchronizer.logout().await.expect("logout should succeed");
    assert_eq!(synchronizer.view().state, SessionState::Absent);
    assert!(!synchronizer.is_admin());
}

#[tokio::test]
async fn test_first_login_race_converges_to_same_shape() {
    // Two devices resolve the same brand-new identity concurrently; the
    // store keeps the last write, but both adopt the same defaulted shape.
    let store = Arc::new(MemoryProfileStore::new());
    let identity = ProviderIdentity::new("uid-shared", Some("a@b.com".to_string()));

    let device_a = Arc::new(MemoryIdentityProvider::new());
    let device_b = Arc::new(MemoryIdentityProvider::new());

    let sync_a = SessionSynchronizer::start(
        device_a.clone(),
        store.clone(),
        Arc::new(NullNavigator),
    )
    .await;
    let sync_b = SessionSynchronizer::start(
        device_b.clone(),
        store.clone(),
        Arc::new(NullNavigator),
    )
    .await;

    let mut handle_a = sync_a.handle();
    let mut handle_b = sync_b.handle();

    tokio::join!(
        device_a.push_state(Some(identity.clone())),
        device_b.push_state(Some(identity.clone()))
    );

    let view_a = wait_for(&mut handle_a, |v| v.state.is_signed_in()).await;
    let view_b = wait_for(&mut handle_b, |v| v.state.is_signed_in()).await;

    assert_eq!(view_a.state, view_b.state);
    let session = view_a.state.session().expect("signed in");
    assert_eq!(session.role, AccountRole::User);
    assert_eq!(session.status, AccountStatus::Active);

    let record = store
        .get("uid-shared")
        .await
        .expect("read")
        .expect("record exists");
    assert_eq!(record.role, AccountRole::User);
    assert_eq!(record.status, AccountStatus::Active);
}

#[tokio::test]
async fn test_background_store_failure_deauthenticates_but_survives() {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let store = Arc::new(FlakyStore::new());
    let synchronizer = SessionSynchronizer::start(
        provider.clone(),
        store.clone(),
        Arc::new(NullNavigator),
    )
    .await;
    let mut handle = synchronizer.handle();
    wait_for(&mut handle, |v| !v.initializing).await;

    store.set_fail_reads(true);
    provider
        .push_state(Some(ProviderIdentity::new("uid-1", None)))
        .await;

    // The failed reconciliation publishes absent instead of erroring out;
    // give the event time to be applied and verify nothing signed in.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(synchronizer.view().state, SessionState::Absent);

    // The subscription is still alive: once the store recovers, the next
    // event resolves normally.
    store.set_fail_reads(false);
    provider
        .push_state(Some(ProviderIdentity::new("uid-1", None)))
        .await;
    let view = wait_for(&mut handle, |v| v.state.is_signed_in()).await;
    assert_eq!(view.state.identity(), Some("uid-1"));
}

#[tokio::test]
async fn test_handle_survives_while_synchronizer_lives() {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let store = Arc::new(MemoryProfileStore::new());
    let synchronizer =
        SessionSynchronizer::start(provider, store, Arc::new(NullNavigator)).await;

    let handle = synchronizer.handle();
    let cloned = handle.clone();
    assert!(handle.try_current().is_ok());
    assert!(cloned.try_current().is_ok());

    synchronizer.shutdown().await;
    assert!(matches!(handle.try_current(), Err(Error::Detached)));
    assert!(matches!(cloned.try_current(), Err(Error::Detached)));
}
