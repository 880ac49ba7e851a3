//! Domain primitives, the session manager and its ports.
//!
//! Purpose: keep identity, validation and session state transitions free of
//! transport details. Adapters in `outbound` implement the traits declared in
//! [`ports`]; nothing in this module imports reqwest or the filesystem.
//!
//! Public surface:
//! - [`SessionManager`] and [`SessionCell`]: who is logged in.
//! - [`UserProfile`], [`Role`], [`EmailAddress`]: cached identity.
//! - [`LoginCredentials`], [`Registration`], [`ProfileUpdate`],
//!   [`PasswordChange`]: validated auth payloads.
//! - [`ApiError`]: the transport-agnostic failure taxonomy.
//! - [`RequestSequencer`]: stale-response suppression.
//! - [`payment`], [`work_timer`], [`signature`]: form-level helpers.

pub mod auth;
pub mod credential;
pub mod error;
pub mod payment;
pub mod ports;
pub mod sequence;
pub mod session;
pub mod signature;
pub mod user;
pub mod work_timer;

pub use self::auth::{
    AuthValidationError, LoginCredentials, MIN_PASSWORD_LEN, PasswordChange, ProfileUpdate,
    Registration,
};
pub use self::credential::{Credential, CredentialValidationError};
pub use self::error::{ApiError, ApiErrorKind};
pub use self::payment::{
    AccountType, BankAccountDetails, CardBrand, CardDetails, PaymentAmount, PaymentMethodInput,
    PaymentValidationError,
};
pub use self::sequence::{RequestSequencer, RequestTicket};
pub use self::session::{
    LoadingState, SessionCell, SessionError, SessionErrorKind, SessionManager, SessionPorts,
};
pub use self::signature::{SignatureCapture, SignatureError};
pub use self::user::{EmailAddress, Role, UserId, UserProfile, UserValidationError};
pub use self::work_timer::{WorkSessionSummary, WorkTimer, WorkTimerError};
