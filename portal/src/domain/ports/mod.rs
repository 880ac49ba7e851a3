//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_backend;
mod credential_store;
mod feedback;

#[cfg(test)]
pub use auth_backend::MockAuthBackend;
pub use auth_backend::{AuthBackend, AuthGrant};
#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::{
    CREDENTIAL_KEY, CredentialStore, CredentialStoreError, InMemoryCredentialStore,
};
#[cfg(test)]
pub use feedback::{MockNavigator, MockNotifier};
pub use feedback::{
    Navigator, NoopNavigator, Notice, NoticeLevel, Notifier, SilentNotifier, Surface,
};
