//! [`AuthBackend`] port implemented over the HTTP client.

use async_trait::async_trait;

use super::ApiClient;
use crate::domain::ports::{AuthBackend, AuthGrant};
use crate::domain::{
    ApiError, LoginCredentials, PasswordChange, ProfileUpdate, Registration, UserProfile,
};

#[async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthGrant, ApiError> {
        self.auth().login(credentials).await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthGrant, ApiError> {
        self.auth().register(registration).await
    }

    async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.auth().current_user().await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.auth().update_profile(update).await
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        self.auth().change_password(change).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.auth().logout().await
    }
}
