//! Authentication payloads validated before they reach the network.
//!
//! Forms hand raw strings to these constructors; anything that fails here is
//! reported inline and never costs a round trip to the backend.

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use super::user::{EmailAddress, Role, UserValidationError};

/// Minimum password length accepted by registration and password changes.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Domain error returned when auth payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    /// A user field (email, name) was invalid.
    #[error(transparent)]
    User(#[from] UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password was shorter than [`MIN_PASSWORD_LEN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Required minimum length.
        min: usize,
    },
    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
    /// New password equals the current one.
    #[error("new password must differ from the current password")]
    PasswordUnchanged,
    /// Profile update carried no fields.
    #[error("profile update must change at least one field")]
    EmptyProfileUpdate,
}

fn check_new_password(password: &str) -> Result<(), AuthValidationError> {
    if password.is_empty() {
        return Err(AuthValidationError::EmptyPassword);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is a normalised [`EmailAddress`].
/// - `password` is non-empty but otherwise kept exactly as typed.
///
/// # Examples
/// ```
/// use portal::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("manager@huntersrun.com", "password123").unwrap();
/// assert_eq!(creds.email().as_ref(), "manager@huntersrun.com");
/// assert_eq!(creds.password(), "password123");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Login email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password as typed.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated self-registration payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    name: String,
    email: EmailAddress,
    password: Zeroizing<String>,
    role: Role,
    phone: Option<String>,
}

impl Registration {
    /// Validate the core registration fields. The role defaults to
    /// [`Role::Tenant`].
    pub fn try_new(
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, AuthValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName.into());
        }
        let email = EmailAddress::new(email)?;
        check_new_password(password)?;
        if password != confirm_password {
            return Err(AuthValidationError::PasswordMismatch);
        }
        Ok(Self {
            name: name.to_owned(),
            email,
            password: Zeroizing::new(password.to_owned()),
            role: Role::Tenant,
            phone: None,
        })
    }

    /// Request a specific role (subject to backend approval).
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Attach an optional phone number; blank input is ignored.
    #[must_use]
    pub fn with_phone(mut self, phone: &str) -> Self {
        let phone = phone.trim();
        self.phone = (!phone.is_empty()).then(|| phone.to_owned());
        self
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Login email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Chosen password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Requested role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Optional phone number.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

/// Partial profile update. Only populated fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<EmailAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
}

impl ProfileUpdate {
    /// Start an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the display name.
    pub fn with_name(mut self, name: &str) -> Result<Self, AuthValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName.into());
        }
        self.name = Some(name.to_owned());
        Ok(self)
    }

    /// Change the login email.
    pub fn with_email(mut self, email: &str) -> Result<Self, AuthValidationError> {
        self.email = Some(EmailAddress::new(email)?);
        Ok(self)
    }

    /// Change the phone number. An empty string clears it on the backend.
    #[must_use]
    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(phone.trim().to_owned());
        self
    }

    /// Whether no field has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// Validated password change request.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordChange {
    current: Zeroizing<String>,
    next: Zeroizing<String>,
}

impl PasswordChange {
    /// Validate the current and replacement passwords.
    pub fn try_new(current: &str, next: &str) -> Result<Self, AuthValidationError> {
        if current.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        check_new_password(next)?;
        if current == next {
            return Err(AuthValidationError::PasswordUnchanged);
        }
        Ok(Self {
            current: Zeroizing::new(current.to_owned()),
            next: Zeroizing::new(next.to_owned()),
        })
    }

    /// Password currently in use.
    #[must_use]
    pub fn current(&self) -> &str {
        self.current.as_str()
    }

    /// Replacement password.
    #[must_use]
    pub fn next(&self) -> &str {
        self.next.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordChange(<redacted>)")
    }
}
