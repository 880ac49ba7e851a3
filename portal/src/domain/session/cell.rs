//! Shared session state cell.
//!
//! One [`SessionCell`] is created per portal instance and handed to both the
//! session manager and the HTTP client. Reads are public; every mutator is
//! crate-private so the write sites stay auditable.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{Credential, UserProfile};

/// Startup phase of the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LoadingState {
    /// Restoration from storage has not finished.
    #[default]
    Initializing,
    /// Restoration finished (successfully or not).
    Ready,
}

#[derive(Debug, Default)]
struct SessionState {
    credential: Option<Credential>,
    user: Option<Arc<UserProfile>>,
    loading: LoadingState,
}

/// Interior-mutable session state shared between the session manager and the
/// HTTP client.
///
/// ## Invariants
/// - `user` is only ever set while a credential is attached.
/// - `loading` moves from `Initializing` to `Ready` once and never back.
#[derive(Debug, Clone, Default)]
pub struct SessionCell {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionCell {
    /// Create an empty, initializing session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Credential to attach to the next outgoing request.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.read().credential.clone()
    }

    /// Cached profile of the authenticated user.
    #[must_use]
    pub fn current_user(&self) -> Option<Arc<UserProfile>> {
        self.read().user.clone()
    }

    /// Startup phase.
    #[must_use]
    pub fn loading_state(&self) -> LoadingState {
        self.read().loading
    }

    /// Attach a credential whose owner is not yet known (session restore).
    pub(crate) fn attach_credential(&self, credential: Credential) {
        let mut state = self.write();
        state.credential = Some(credential);
        state.user = None;
    }

    /// Install a freshly authenticated credential and profile together.
    pub(crate) fn establish(&self, credential: Credential, user: UserProfile) -> Arc<UserProfile> {
        let user = Arc::new(user);
        let mut state = self.write();
        state.credential = Some(credential);
        state.user = Some(Arc::clone(&user));
        user
    }

    /// Replace the cached profile if `credential` is still the attached one.
    ///
    /// Returns `None` when the session was revoked or replaced meanwhile.
    pub(crate) fn adopt_user(
        &self,
        credential: &Credential,
        user: UserProfile,
    ) -> Option<Arc<UserProfile>> {
        let mut state = self.write();
        if state.credential.as_ref() != Some(credential) {
            return None;
        }
        let user = Arc::new(user);
        state.user = Some(Arc::clone(&user));
        Some(user)
    }

    /// Drop the credential and profile.
    pub(crate) fn revoke(&self) {
        let mut state = self.write();
        state.credential = None;
        state.user = None;
    }

    /// Drop the credential and profile only if `rejected` is still attached.
    ///
    /// Returns whether anything was revoked, so concurrent rejections of the
    /// same credential act once.
    pub(crate) fn revoke_if_current(&self, rejected: &Credential) -> bool {
        let mut state = self.write();
        if state.credential.as_ref() != Some(rejected) {
            return false;
        }
        state.credential = None;
        state.user = None;
        true
    }

    /// Finish initialization. Returns `true` only for the first call.
    pub(crate) fn mark_ready(&self) -> bool {
        let mut state = self.write();
        let first = state.loading == LoadingState::Initializing;
        state.loading = LoadingState::Ready;
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailAddress, Role, UserId};

    fn profile(name: &str) -> UserProfile {
        UserProfile::new(
            UserId::new("u-1").expect("id"),
            name,
            EmailAddress::new("ada@example.com").expect("email"),
            Role::Tenant,
        )
        .expect("profile")
    }

    fn credential(raw: &str) -> Credential {
        Credential::new(raw).expect("credential")
    }

    #[test]
    fn revoke_if_current_acts_once() {
        let cell = SessionCell::new();
        cell.establish(credential("a"), profile("Ada"));

        assert!(cell.revoke_if_current(&credential("a")));
        assert!(!cell.revoke_if_current(&credential("a")));
        assert!(cell.current_user().is_none());
        assert!(cell.credential().is_none());
    }

    #[test]
    fn revoke_if_current_ignores_superseded_credentials() {
        let cell = SessionCell::new();
        cell.establish(credential("new"), profile("Ada"));

        assert!(!cell.revoke_if_current(&credential("old")));
        assert_eq!(cell.credential(), Some(credential("new")));
    }

    #[test]
    fn adopt_user_requires_the_same_credential() {
        let cell = SessionCell::new();
        cell.attach_credential(credential("a"));

        assert!(cell.adopt_user(&credential("b"), profile("Ada")).is_none());
        assert!(cell.current_user().is_none());
        assert!(cell.adopt_user(&credential("a"), profile("Ada")).is_some());
        assert_eq!(cell.current_user().map(|user| user.name().to_owned()), Some("Ada".to_owned()));
    }

    #[test]
    fn mark_ready_transitions_once() {
        let cell = SessionCell::new();
        assert_eq!(cell.loading_state(), LoadingState::Initializing);
        assert!(cell.mark_ready());
        assert!(!cell.mark_ready());
        assert_eq!(cell.loading_state(), LoadingState::Ready);
    }
}
