//! `/auth` endpoints.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::ports::AuthGrant;
use crate::domain::{
    ApiError, Credential, LoginCredentials, PasswordChange, ProfileUpdate, Registration,
    UserProfile,
};
use crate::outbound::http::{ApiClient, ApiRequest, HttpMethod, OperationDescriptor};

const LOGIN: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Post, "/auth/login").anonymous();
const REGISTER: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Post, "/auth/register").anonymous();
const CURRENT_USER: OperationDescriptor = OperationDescriptor::json(HttpMethod::Get, "/auth/me");
const UPDATE_PROFILE: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Put, "/auth/profile");
const CHANGE_PASSWORD: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Put, "/auth/change-password");
const LOGOUT: OperationDescriptor = OperationDescriptor::json(HttpMethod::Post, "/auth/logout");

#[derive(Deserialize)]
struct AuthResponseDto {
    token: String,
    user: UserProfile,
}

impl TryFrom<AuthResponseDto> for AuthGrant {
    type Error = ApiError;

    fn try_from(dto: AuthResponseDto) -> Result<Self, Self::Error> {
        let credential = Credential::new(dto.token).map_err(|error| {
            ApiError::decode(format!("unusable token in auth response: {error}"))
        })?;
        Ok(Self {
            credential,
            user: dto.user,
        })
    }
}

/// `/auth/me` and `/auth/profile` answer either `{"user": {...}}` or the bare
/// profile.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileResponseDto {
    Wrapped { user: UserProfile },
    Bare(UserProfile),
}

impl From<ProfileResponseDto> for UserProfile {
    fn from(dto: ProfileResponseDto) -> Self {
        match dto {
            ProfileResponseDto::Wrapped { user } | ProfileResponseDto::Bare(user) => user,
        }
    }
}

/// Authentication operations.
pub struct Auth<'a> {
    client: &'a ApiClient,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and profile.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthGrant, ApiError> {
        let body = json!({
            "email": credentials.email(),
            "password": credentials.password(),
        });
        let dto: AuthResponseDto = self
            .client
            .execute_as(&LOGIN, ApiRequest::new().body(body))
            .await?;
        dto.try_into()
    }

    /// Create an account and receive a token and profile.
    pub async fn register(&self, registration: &Registration) -> Result<AuthGrant, ApiError> {
        let mut body = json!({
            "name": registration.name(),
            "email": registration.email(),
            "password": registration.password(),
            "role": registration.role(),
        });
        if let (Some(phone), Value::Object(map)) = (registration.phone(), &mut body) {
            map.insert("phone".to_owned(), Value::from(phone));
        }
        let dto: AuthResponseDto = self
            .client
            .execute_as(&REGISTER, ApiRequest::new().body(body))
            .await?;
        dto.try_into()
    }

    /// Profile behind the attached credential.
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let dto: ProfileResponseDto = self
            .client
            .execute_as(&CURRENT_USER, ApiRequest::new())
            .await?;
        Ok(dto.into())
    }

    /// Apply a partial update and return the canonical profile.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let body = serde_json::to_value(update)
            .map_err(|error| ApiError::invalid_request(error.to_string()))?;
        let dto: ProfileResponseDto = self
            .client
            .execute_as(&UPDATE_PROFILE, ApiRequest::new().body(body))
            .await?;
        Ok(dto.into())
    }

    /// Change the account password.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        let body = json!({
            "currentPassword": change.current(),
            "newPassword": change.next(),
        });
        self.client
            .execute(&CHANGE_PASSWORD, ApiRequest::new().body(body))
            .await
            .map(drop)
    }

    /// Tell the backend the session is ending.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client
            .execute(&LOGOUT, ApiRequest::new())
            .await
            .map(drop)
    }
}
