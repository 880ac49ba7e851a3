//! Port for the durable credential slot.
//!
//! The persisted credential lives under one fixed key. Only the session
//! manager writes it on the success path; the HTTP adapter's rejection
//! handler may erase it. `tools/architecture-lint` enforces both rules.

use std::sync::{Mutex, PoisonError};

use crate::domain::Credential;

use super::define_port_error;

/// Storage key under which the credential is persisted.
pub const CREDENTIAL_KEY: &str = "token";

define_port_error! {
    /// Errors raised by credential storage adapters.
    pub enum CredentialStoreError {
        /// The backing storage could not be read or written.
        Io { message: String } => "credential storage failed: {message}",
        /// The stored value is not a usable credential.
        Corrupt { message: String } => "stored credential is unreadable: {message}",
    }
}

/// Durable client-side slot holding the opaque credential.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Read the persisted credential, if any.
    fn load(&self) -> Result<Option<Credential>, CredentialStoreError>;

    /// Replace the persisted credential.
    fn persist(&self, credential: &Credential) -> Result<(), CredentialStoreError>;

    /// Remove the persisted credential. Erasing an empty slot succeeds.
    fn erase(&self) -> Result<(), CredentialStoreError>;
}

/// Process-local store used by tests and by embedders without durable storage.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl InMemoryCredentialStore {
    /// Start with an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a credential already persisted, as after a previous run.
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialStoreError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn persist(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn erase(&self) -> Result<(), CredentialStoreError> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}
