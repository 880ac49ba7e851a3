//! Session manager: the single source of truth for who is logged in.
//!
//! [`SessionManager`] mediates every identity transition (restore, login,
//! registration, logout, profile changes) and is the only code that writes
//! the persisted credential on the success path. Its operations never return
//! transport errors raw: every failure becomes a [`SessionError`] plus an
//! error [`Notice`], and logout cannot fail at all.

mod cell;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

pub use self::cell::{LoadingState, SessionCell};
use crate::domain::ports::{AuthBackend, AuthGrant, CredentialStore, Notice, Notifier};
use crate::domain::{
    ApiError, ApiErrorKind, AuthValidationError, Credential, LoginCredentials, PasswordChange,
    ProfileUpdate, Registration, Role, UserProfile,
};

const LOGIN_SUCCEEDED: &str = "Login successful";
const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_SUCCEEDED: &str = "Registration successful";
const REGISTRATION_FAILED: &str = "Registration failed";
const LOGOUT_SUCCEEDED: &str = "Logged out successfully";
const PROFILE_UPDATED: &str = "Profile updated successfully";
const PROFILE_UPDATE_FAILED: &str = "Profile update failed";
const PASSWORD_CHANGED: &str = "Password changed successfully";
const PASSWORD_CHANGE_FAILED: &str = "Password change failed";

/// Why a session operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionErrorKind {
    /// Input was rejected locally; nothing was sent.
    Validation,
    /// The backend answered with an error.
    Rejected,
    /// The backend could not be reached.
    Unavailable,
}

/// Failed session operation, carrying a message fit for display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SessionError {
    kind: SessionErrorKind,
    message: String,
    status: Option<u16>,
}

impl SessionError {
    fn validation(error: &AuthValidationError) -> Self {
        Self {
            kind: SessionErrorKind::Validation,
            message: error.to_string(),
            status: None,
        }
    }

    fn from_api(error: &ApiError, fallback: &str) -> Self {
        let kind = match error.kind() {
            ApiErrorKind::Network => SessionErrorKind::Unavailable,
            _ => SessionErrorKind::Rejected,
        };
        Self {
            kind,
            message: error.user_message(fallback),
            status: error.status_code(),
        }
    }

    /// Failure category.
    #[must_use]
    pub fn kind(&self) -> SessionErrorKind {
        self.kind
    }

    /// Human-readable message; never empty.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP status, when the backend answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

/// Collaborators the session manager drives.
#[derive(Clone)]
pub struct SessionPorts {
    /// Backend authentication endpoints.
    pub backend: Arc<dyn AuthBackend>,
    /// Durable credential slot.
    pub store: Arc<dyn CredentialStore>,
    /// Transient notice sink.
    pub notifier: Arc<dyn Notifier>,
}

/// Owns the current identity and every transition that changes it.
pub struct SessionManager {
    cell: SessionCell,
    backend: Arc<dyn AuthBackend>,
    store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    initialize_started: AtomicBool,
}

impl SessionManager {
    /// Create a manager over `cell`, which must be the same cell the HTTP
    /// client attaches credentials from.
    #[must_use]
    pub fn new(cell: SessionCell, ports: SessionPorts) -> Self {
        let SessionPorts {
            backend,
            store,
            notifier,
        } = ports;
        Self {
            cell,
            backend,
            store,
            notifier,
            initialize_started: AtomicBool::new(false),
        }
    }

    /// Shared session state.
    #[must_use]
    pub fn cell(&self) -> &SessionCell {
        &self.cell
    }

    /// Cached profile of the authenticated user.
    #[must_use]
    pub fn current_user(&self) -> Option<Arc<UserProfile>> {
        self.cell.current_user()
    }

    /// Startup phase.
    #[must_use]
    pub fn loading_state(&self) -> LoadingState {
        self.cell.loading_state()
    }

    /// Whether a validated user is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.cell.current_user().is_some()
    }

    /// Whether the authenticated user holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.cell
            .current_user()
            .is_some_and(|user| user.role() == role)
    }

    /// Restore the persisted session. Runs once; later calls return the
    /// current loading state without touching storage or the network.
    pub async fn initialize(&self) -> LoadingState {
        if self.initialize_started.swap(true, Ordering::AcqRel) {
            return self.cell.loading_state();
        }

        if let Some(credential) = self.load_persisted() {
            self.restore(credential).await;
        }

        self.cell.mark_ready();
        debug!(authenticated = self.is_authenticated(), "session initialised");
        self.cell.loading_state()
    }

    fn load_persisted(&self) -> Option<Credential> {
        match self.store.load() {
            Ok(credential) => credential,
            Err(error) => {
                warn!(%error, "discarding unreadable persisted credential");
                self.erase_persisted();
                None
            }
        }
    }

    async fn restore(&self, credential: Credential) {
        self.cell.attach_credential(credential.clone());
        match self.backend.current_user().await {
            Ok(user) => {
                if self.cell.adopt_user(&credential, user).is_none() {
                    debug!("session revoked while restoring");
                }
            }
            Err(error) => {
                debug!(%error, "persisted credential no longer accepted");
                if self.cell.revoke_if_current(&credential) {
                    self.erase_persisted();
                }
            }
        }
    }

    /// Authenticate with email and password.
    ///
    /// On failure nothing is persisted and the cached user is unchanged.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Arc<UserProfile>, SessionError> {
        let credentials = LoginCredentials::try_from_parts(email, password)
            .map_err(|error| SessionError::validation(&error))?;
        let outcome = self.backend.login(&credentials).await;
        self.finish_authentication(outcome, LOGIN_SUCCEEDED, LOGIN_FAILED)
    }

    /// Create an account and open a session for it, exactly as [`Self::login`].
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> Result<Arc<UserProfile>, SessionError> {
        let outcome = self.backend.register(registration).await;
        self.finish_authentication(outcome, REGISTRATION_SUCCEEDED, REGISTRATION_FAILED)
    }

    fn finish_authentication(
        &self,
        outcome: Result<AuthGrant, ApiError>,
        success: &str,
        fallback: &str,
    ) -> Result<Arc<UserProfile>, SessionError> {
        let AuthGrant { credential, user } = outcome.map_err(|error| self.fail(&error, fallback))?;

        if let Err(error) = self.store.persist(&credential) {
            warn!(%error, "credential not persisted; session will not survive a restart");
        }
        let user = self.cell.establish(credential, user);
        info!(user_id = %user.id(), role = %user.role(), "session established");
        self.notifier.notify(Notice::success(success));
        Ok(user)
    }

    /// End the session. The backend is told best-effort; local state is
    /// cleared regardless.
    pub async fn logout(&self) {
        if let Err(error) = self.backend.logout().await {
            warn!(%error, "backend logout failed; clearing session anyway");
        }
        self.erase_persisted();
        self.cell.revoke();
        info!("session closed");
        self.notifier.notify(Notice::success(LOGOUT_SUCCEEDED));
    }

    /// Submit a partial profile update. On success the cached profile is
    /// replaced by the backend's canonical copy; on failure it is untouched.
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<Arc<UserProfile>, SessionError> {
        if update.is_empty() {
            return Err(SessionError::validation(
                &AuthValidationError::EmptyProfileUpdate,
            ));
        }

        let credential = self.cell.credential();
        let user = self
            .backend
            .update_profile(update)
            .await
            .map_err(|error| self.fail(&error, PROFILE_UPDATE_FAILED))?;

        let adopted = credential.and_then(|credential| self.cell.adopt_user(&credential, user));
        let Some(user) = adopted else {
            return Err(self.fail(&ApiError::status(401, None), PROFILE_UPDATE_FAILED));
        };
        self.notifier.notify(Notice::success(PROFILE_UPDATED));
        Ok(user)
    }

    /// Change the account password. Local state is not affected.
    pub async fn change_password(&self, current: &str, next: &str) -> Result<(), SessionError> {
        let change = PasswordChange::try_new(current, next)
            .map_err(|error| SessionError::validation(&error))?;
        self.backend
            .change_password(&change)
            .await
            .map_err(|error| self.fail(&error, PASSWORD_CHANGE_FAILED))?;
        self.notifier.notify(Notice::success(PASSWORD_CHANGED));
        Ok(())
    }

    fn fail(&self, error: &ApiError, fallback: &str) -> SessionError {
        debug!(%error, "session operation failed");
        let failure = SessionError::from_api(error, fallback);
        self.notifier.notify(Notice::error(failure.message()));
        failure
    }

    fn erase_persisted(&self) {
        if let Err(error) = self.store.erase() {
            warn!(%error, "failed to erase persisted credential");
        }
    }
}

#[cfg(test)]
mod tests;
