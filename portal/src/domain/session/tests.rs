//! Tests for the session manager state machine.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    CredentialStoreError, InMemoryCredentialStore, MockAuthBackend, MockCredentialStore,
    NoticeLevel,
};
use crate::domain::{EmailAddress, UserId};
use crate::test_support::RecordingNotifier;

fn profile(name: &str, role: Role) -> UserProfile {
    UserProfile::new(
        UserId::new("7").expect("id"),
        name,
        EmailAddress::new("manager@huntersrun.com").expect("email"),
        role,
    )
    .expect("profile")
}

fn credential(raw: &str) -> Credential {
    Credential::new(raw).expect("credential")
}

fn grant(raw: &str, role: Role) -> AuthGrant {
    AuthGrant {
        credential: credential(raw),
        user: profile("Morgan", role),
    }
}

struct Harness {
    manager: SessionManager,
    store: Arc<InMemoryCredentialStore>,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    fn new(backend: MockAuthBackend, store: InMemoryCredentialStore) -> Self {
        let store = Arc::new(store);
        let notifier = Arc::new(RecordingNotifier::default());
        let manager = SessionManager::new(
            SessionCell::new(),
            SessionPorts {
                backend: Arc::new(backend),
                store: Arc::clone(&store) as Arc<dyn CredentialStore>,
                notifier: Arc::clone(&notifier) as Arc<dyn Notifier>,
            },
        );
        Self {
            manager,
            store,
            notifier,
        }
    }

    fn persisted(&self) -> Option<Credential> {
        self.store.load().expect("load")
    }
}

#[fixture]
fn empty_store() -> InMemoryCredentialStore {
    InMemoryCredentialStore::new()
}

#[rstest]
#[tokio::test]
async fn initialize_without_credential_is_ready_and_anonymous(
    empty_store: InMemoryCredentialStore,
) {
    let mut backend = MockAuthBackend::new();
    backend.expect_current_user().never();
    let harness = Harness::new(backend, empty_store);

    assert_eq!(harness.manager.loading_state(), LoadingState::Initializing);
    let state = harness.manager.initialize().await;

    assert_eq!(state, LoadingState::Ready);
    assert!(!harness.manager.is_authenticated());
    assert!(harness.manager.cell().credential().is_none());
}

#[tokio::test]
async fn initialize_restores_persisted_session() {
    let mut backend = MockAuthBackend::new();
    backend
        .expect_current_user()
        .times(1)
        .returning(|| Ok(profile("Morgan", Role::Manager)));
    let harness = Harness::new(
        backend,
        InMemoryCredentialStore::with_credential(credential("stored")),
    );

    harness.manager.initialize().await;

    let user = harness.manager.current_user().expect("restored user");
    assert_eq!(user.name(), "Morgan");
    assert!(harness.manager.has_role(Role::Manager));
    assert_eq!(harness.manager.cell().credential(), Some(credential("stored")));
    assert!(harness.notifier.take().is_empty());
}

#[rstest]
#[case::rejected(ApiError::status(401, Some("Token expired".into())))]
#[case::server_error(ApiError::status(500, None))]
#[case::offline(ApiError::network("connection refused"))]
#[tokio::test]
async fn initialize_failure_clears_everything(#[case] failure: ApiError) {
    let mut backend = MockAuthBackend::new();
    backend
        .expect_current_user()
        .times(1)
        .returning(move || Err(failure.clone()));
    let harness = Harness::new(
        backend,
        InMemoryCredentialStore::with_credential(credential("stale")),
    );

    let state = harness.manager.initialize().await;

    assert_eq!(state, LoadingState::Ready);
    assert!(harness.manager.current_user().is_none());
    assert!(harness.manager.cell().credential().is_none());
    assert_eq!(harness.persisted(), None);
}

#[tokio::test]
async fn initialize_runs_once() {
    let mut backend = MockAuthBackend::new();
    backend
        .expect_current_user()
        .times(1)
        .returning(|| Ok(profile("Morgan", Role::Tenant)));
    let harness = Harness::new(
        backend,
        InMemoryCredentialStore::with_credential(credential("stored")),
    );

    harness.manager.initialize().await;
    let second = harness.manager.initialize().await;

    assert_eq!(second, LoadingState::Ready);
}

#[tokio::test]
async fn initialize_erases_unreadable_credential() {
    let mut backend = MockAuthBackend::new();
    backend.expect_current_user().never();
    let mut store = MockCredentialStore::new();
    store
        .expect_load()
        .times(1)
        .returning(|| Err(CredentialStoreError::corrupt("not utf-8")));
    store.expect_erase().times(1).returning(|| Ok(()));

    let manager = SessionManager::new(
        SessionCell::new(),
        SessionPorts {
            backend: Arc::new(backend),
            store: Arc::new(store),
            notifier: Arc::new(RecordingNotifier::default()),
        },
    );

    assert_eq!(manager.initialize().await, LoadingState::Ready);
    assert!(!manager.is_authenticated());
}

#[rstest]
#[tokio::test]
async fn login_success_persists_and_notifies(empty_store: InMemoryCredentialStore) {
    let mut backend = MockAuthBackend::new();
    backend
        .expect_login()
        .withf(|creds| {
            creds.email().as_ref() == "manager@huntersrun.com" && creds.password() == "password123"
        })
        .times(1)
        .returning(|_| Ok(grant("issued", Role::Manager)));
    let harness = Harness::new(backend, empty_store);

    let user = harness
        .manager
        .login("Manager@Huntersrun.com", "password123")
        .await
        .expect("login succeeds");

    assert_eq!(user.role(), Role::Manager);
    assert_eq!(harness.persisted(), Some(credential("issued")));
    assert_eq!(harness.manager.cell().credential(), Some(credential("issued")));
    let notices = harness.notifier.take();
    assert_eq!(notices, vec![Notice::success("Login successful")]);
}

#[rstest]
#[case::backend_message(Some("Invalid credentials".to_owned()), "Invalid credentials")]
#[case::fallback(None, "Login failed")]
#[tokio::test]
async fn login_failure_reports_and_leaves_state(
    empty_store: InMemoryCredentialStore,
    #[case] backend_message: Option<String>,
    #[case] expected: &str,
) {
    let mut backend = MockAuthBackend::new();
    backend
        .expect_login()
        .times(1)
        .returning(move |_| Err(ApiError::status(401, backend_message.clone())));
    let harness = Harness::new(backend, empty_store);

    let error = harness
        .manager
        .login("bad@x.com", "wrong")
        .await
        .expect_err("login fails");

    assert_eq!(error.kind(), SessionErrorKind::Rejected);
    assert_eq!(error.message(), expected);
    assert_eq!(error.status(), Some(401));
    assert_eq!(harness.persisted(), None);
    assert!(harness.manager.current_user().is_none());
    let notices = harness.notifier.take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level(), NoticeLevel::Error);
    assert_eq!(notices[0].message(), expected);
}

#[rstest]
#[case::bad_email("not-an-email", "password123")]
#[case::empty_password("manager@huntersrun.com", "")]
#[tokio::test]
async fn login_validation_never_reaches_backend(
    empty_store: InMemoryCredentialStore,
    #[case] email: &str,
    #[case] password: &str,
) {
    let mut backend = MockAuthBackend::new();
    backend.expect_login().never();
    let harness = Harness::new(backend, empty_store);

    let error = harness
        .manager
        .login(email, password)
        .await
        .expect_err("validation fails");

    assert_eq!(error.kind(), SessionErrorKind::Validation);
    assert!(!error.message().is_empty());
    assert!(harness.notifier.take().is_empty());
}

#[tokio::test]
async fn login_survives_unwritable_storage() {
    let mut backend = MockAuthBackend::new();
    backend
        .expect_login()
        .returning(|_| Ok(grant("issued", Role::Tenant)));
    let mut store = MockCredentialStore::new();
    store
        .expect_persist()
        .times(1)
        .returning(|_| Err(CredentialStoreError::io("read-only filesystem")));

    let manager = SessionManager::new(
        SessionCell::new(),
        SessionPorts {
            backend: Arc::new(backend),
            store: Arc::new(store),
            notifier: Arc::new(RecordingNotifier::default()),
        },
    );

    manager
        .login("tenant@huntersrun.com", "password123")
        .await
        .expect("in-memory session still opens");
    assert!(manager.is_authenticated());
}

#[rstest]
#[tokio::test]
async fn register_opens_session(empty_store: InMemoryCredentialStore) {
    let mut backend = MockAuthBackend::new();
    backend
        .expect_register()
        .withf(|registration| registration.role() == Role::Tenant)
        .times(1)
        .returning(|_| Ok(grant("fresh", Role::Tenant)));
    let harness = Harness::new(backend, empty_store);
    let registration =
        Registration::try_new("Morgan", "morgan@huntersrun.com", "secret1", "secret1")
            .expect("registration");

    harness
        .manager
        .register(&registration)
        .await
        .expect("register succeeds");

    assert_eq!(harness.persisted(), Some(credential("fresh")));
    assert!(harness.manager.has_role(Role::Tenant));
    assert_eq!(
        harness.notifier.take(),
        vec![Notice::success("Registration successful")]
    );
}

#[rstest]
#[case::backend_ok(Ok(()))]
#[case::backend_down(Err(ApiError::network("timed out")))]
#[tokio::test]
async fn logout_always_clears(#[case] outcome: Result<(), ApiError>) {
    let mut backend = MockAuthBackend::new();
    backend
        .expect_login()
        .returning(|_| Ok(grant("issued", Role::Manager)));
    backend
        .expect_logout()
        .times(1)
        .returning(move || outcome.clone());
    let harness = Harness::new(backend, InMemoryCredentialStore::new());
    harness
        .manager
        .login("manager@huntersrun.com", "password123")
        .await
        .expect("login");
    harness.notifier.take();

    harness.manager.logout().await;

    assert!(harness.manager.current_user().is_none());
    assert!(harness.manager.cell().credential().is_none());
    assert_eq!(harness.persisted(), None);
    assert_eq!(
        harness.notifier.take(),
        vec![Notice::success("Logged out successfully")]
    );
}

async fn signed_in(backend: MockAuthBackend) -> Harness {
    let harness = Harness::new(backend, InMemoryCredentialStore::new());
    harness
        .manager
        .login("manager@huntersrun.com", "password123")
        .await
        .expect("login");
    harness.notifier.take();
    harness
}

fn backend_with_login() -> MockAuthBackend {
    let mut backend = MockAuthBackend::new();
    backend
        .expect_login()
        .returning(|_| Ok(grant("issued", Role::Manager)));
    backend
}

#[tokio::test]
async fn update_profile_failure_keeps_cached_reference() {
    let mut backend = backend_with_login();
    backend
        .expect_update_profile()
        .times(1)
        .returning(|_| Err(ApiError::status(422, Some("Email already in use".into()))));
    let harness = signed_in(backend).await;
    let before = harness.manager.current_user().expect("user");

    let update = ProfileUpdate::new()
        .with_email("taken@huntersrun.com")
        .expect("email");
    let error = harness
        .manager
        .update_profile(&update)
        .await
        .expect_err("update fails");

    let after = harness.manager.current_user().expect("user");
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(error.message(), "Email already in use");
    assert_eq!(harness.notifier.take()[0].level(), NoticeLevel::Error);
}

#[tokio::test]
async fn update_profile_success_replaces_user() {
    let mut backend = backend_with_login();
    backend
        .expect_update_profile()
        .times(1)
        .returning(|_| Ok(profile("Morgan Lee", Role::Manager).with_phone("555-0100")));
    let harness = signed_in(backend).await;
    let before = harness.manager.current_user().expect("user");

    let update = ProfileUpdate::new()
        .with_name("Morgan Lee")
        .expect("name")
        .with_phone("555-0100");
    let user = harness
        .manager
        .update_profile(&update)
        .await
        .expect("update succeeds");

    assert!(!Arc::ptr_eq(&before, &user));
    assert_eq!(user.name(), "Morgan Lee");
    assert_eq!(user.phone(), Some("555-0100"));
    assert_eq!(
        harness.notifier.take(),
        vec![Notice::success("Profile updated successfully")]
    );
}

#[tokio::test]
async fn update_profile_rejects_empty_update() {
    let mut backend = backend_with_login();
    backend.expect_update_profile().never();
    let harness = signed_in(backend).await;

    let error = harness
        .manager
        .update_profile(&ProfileUpdate::new())
        .await
        .expect_err("empty update");

    assert_eq!(error.kind(), SessionErrorKind::Validation);
}

#[rstest]
#[case::backend_message(
    Some("Current password is incorrect".to_owned()),
    "Current password is incorrect",
)]
#[case::fallback(None, "Password change failed")]
#[tokio::test]
async fn change_password_failure_reports(
    #[case] backend_message: Option<String>,
    #[case] expected: &str,
) {
    let mut backend = backend_with_login();
    backend
        .expect_change_password()
        .times(1)
        .returning(move |_| Err(ApiError::status(400, backend_message.clone())));
    let harness = signed_in(backend).await;

    let error = harness
        .manager
        .change_password("password123", "brand-new-pass")
        .await
        .expect_err("change fails");

    assert_eq!(error.message(), expected);
    assert!(harness.manager.is_authenticated());
}

#[tokio::test]
async fn change_password_success_leaves_session() {
    let mut backend = backend_with_login();
    backend
        .expect_change_password()
        .withf(|change| change.current() == "password123" && change.next() == "brand-new-pass")
        .times(1)
        .returning(|_| Ok(()));
    let harness = signed_in(backend).await;
    let before = harness.manager.current_user().expect("user");

    harness
        .manager
        .change_password("password123", "brand-new-pass")
        .await
        .expect("change succeeds");

    let after = harness.manager.current_user().expect("user");
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(
        harness.notifier.take(),
        vec![Notice::success("Password changed successfully")]
    );
}

#[tokio::test]
async fn change_password_validates_locally() {
    let mut backend = backend_with_login();
    backend.expect_change_password().never();
    let harness = signed_in(backend).await;

    let error = harness
        .manager
        .change_password("password123", "password123")
        .await
        .expect_err("unchanged password");

    assert_eq!(error.kind(), SessionErrorKind::Validation);
}

#[tokio::test]
async fn persisted_login_round_trips_through_initialize() {
    let store = Arc::new(InMemoryCredentialStore::new());

    let mut first = MockAuthBackend::new();
    first
        .expect_login()
        .returning(|_| Ok(grant("issued", Role::Manager)));
    let manager = SessionManager::new(
        SessionCell::new(),
        SessionPorts {
            backend: Arc::new(first),
            store: Arc::clone(&store) as Arc<dyn CredentialStore>,
            notifier: Arc::new(RecordingNotifier::default()),
        },
    );
    manager
        .login("manager@huntersrun.com", "password123")
        .await
        .expect("login");

    let mut second = MockAuthBackend::new();
    second
        .expect_current_user()
        .times(1)
        .returning(|| Ok(profile("Morgan", Role::Manager)));
    let restarted = SessionManager::new(
        SessionCell::new(),
        SessionPorts {
            backend: Arc::new(second),
            store: Arc::clone(&store) as Arc<dyn CredentialStore>,
            notifier: Arc::new(RecordingNotifier::default()),
        },
    );
    restarted.initialize().await;

    assert_eq!(
        restarted.current_user().as_deref(),
        Some(&profile("Morgan", Role::Manager))
    );
    assert_eq!(restarted.cell().credential(), Some(credential("issued")));
}
