//! Driven port for the backend's authentication endpoints.
//!
//! The session manager talks to the backend only through this trait, which
//! keeps its state machine testable with a mock in place of HTTP.

use async_trait::async_trait;

use crate::domain::{
    ApiError, Credential, LoginCredentials, PasswordChange, ProfileUpdate, Registration,
    UserProfile,
};

/// Successful login or registration: the issued credential and the profile.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthGrant {
    /// Bearer credential for subsequent requests.
    pub credential: Credential,
    /// Canonical profile of the authenticated user.
    pub user: UserProfile,
}

/// Backend authentication operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for a session.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthGrant, ApiError>;

    /// Create an account and open a session for it.
    async fn register(&self, registration: &Registration) -> Result<AuthGrant, ApiError>;

    /// Resolve the profile behind the currently attached credential.
    async fn current_user(&self) -> Result<UserProfile, ApiError>;

    /// Apply a partial profile update and return the canonical profile.
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError>;

    /// Change the account password.
    async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError>;

    /// Tell the backend the session is ending.
    async fn logout(&self) -> Result<(), ApiError>;
}
