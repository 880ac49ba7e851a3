//! User data model cached by the session manager.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was missing or blank.
    #[error("user id must not be empty")]
    EmptyId,
    /// Email was missing or blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email did not look like `local@domain.tld`.
    #[error("email address is not valid")]
    InvalidEmail,
    /// Name was missing or blank.
    #[error("name must not be empty")]
    EmptyName,
    /// Role string did not name a known role.
    #[error("unknown role '{value}'")]
    UnknownRole {
        /// Role string as received.
        value: String,
    },
}

/// Backend-assigned user identifier.
///
/// The backend may send numeric or string identifiers; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawUserId", into = "String")]
pub struct UserId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Text(String),
    Number(u64),
}

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<RawUserId> for UserId {
    type Error = UserValidationError;

    fn try_from(value: RawUserId) -> Result<Self, Self::Error> {
        match value {
            RawUserId::Text(text) => Self::new(text),
            RawUserId::Number(number) => Self::new(number.to_string()),
        }
    }
}

/// Portal role controlling which screens and operations a user may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Property manager.
    Manager,
    /// Maintenance staff member.
    Maintenance,
    /// Resident tenant.
    Tenant,
}

impl Role {
    /// Wire name used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Maintenance => "maintenance",
            Self::Tenant => "tenant",
        }
    }

    /// Whether the role may create and edit properties, units and users.
    #[must_use]
    pub const fn can_manage_properties(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    /// Whether the role works maintenance tickets (assignment, work sessions).
    #[must_use]
    pub const fn handles_maintenance(self) -> bool {
        matches!(self, Self::Admin | Self::Manager | Self::Maintenance)
    }

    /// Whether the role sees portfolio-wide payment data.
    #[must_use]
    pub const fn sees_all_payments(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "maintenance" => Ok(Self::Maintenance),
            "tenant" => Ok(Self::Tenant),
            _ => Err(UserValidationError::UnknownRole {
                value: value.to_owned(),
            }),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for &'static str {
    fn from(value: Role) -> Self {
        value.as_str()
    }
}

/// Normalised email address (trimmed, lower-cased).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; deliverability is the backend's concern.
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  Manager@HuntersRun.com ").unwrap();
    /// assert_eq!(email.as_ref(), "manager@huntersrun.com");
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Adopt an address the backend already holds on file, normalised but
    /// not shape-checked.
    fn from_backend(email: &str) -> Self {
        Self(email.trim().to_lowercase())
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Read-only copy of the authenticated user's profile.
///
/// The backend owns the record; the client replaces its copy wholesale after
/// every successful auth call. Display fields the client does not model are
/// kept in [`UserProfile::extra`] so they round-trip untouched.
///
/// ## Invariants
/// - `name` is non-empty once trimmed.
/// - `email` is a normalised [`EmailAddress`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "UserProfileDto", into = "UserProfileDto")]
pub struct UserProfile {
    id: UserId,
    name: String,
    email: EmailAddress,
    role: Role,
    phone: Option<String>,
    extra: Map<String, Value>,
}

impl UserProfile {
    /// Build a profile from validated components.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: EmailAddress,
        role: Role,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            email,
            role,
            phone: None,
            extra: Map::new(),
        })
    }

    /// Attach a contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Stable backend identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
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

    /// Portal role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Contact phone number, when on file.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Additional display field sent by the backend (e.g. `unit`, `avatar`).
    #[must_use]
    pub fn extra(&self, field: &str) -> Option<&Value> {
        self.extra.get(field)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserProfileDto {
    id: UserId,
    name: String,
    email: String,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<UserProfile> for UserProfileDto {
    fn from(value: UserProfile) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email.into(),
            role: value.role,
            phone: value.phone,
            extra: value.extra,
        }
    }
}

// The backend owns stored profiles, so only the role is checked here.
impl From<UserProfileDto> for UserProfile {
    fn from(value: UserProfileDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: EmailAddress::from_backend(&value.email),
            role: value.role,
            phone: value.phone,
            extra: value.extra,
        }
    }
}
