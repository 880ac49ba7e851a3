//! Global handling of rejected credentials.
//!
//! When any call comes back 401, the session it was made under is over. The
//! handler clears the shared cell, erases the persisted credential and sends
//! the user to the login surface. It acts only when the rejected credential is
//! still the live one, so a burst of concurrent 401s, or a late 401 from a
//! session already replaced by a fresh login, does nothing extra.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ports::{CredentialStore, Navigator, Surface};
use crate::domain::{Credential, SessionCell};

/// Forced logout on credential rejection.
#[derive(Clone)]
pub struct UnauthorizedHandler {
    cell: SessionCell,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl UnauthorizedHandler {
    /// Create a handler over the shared session cell.
    #[must_use]
    pub fn new(
        cell: SessionCell,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            cell,
            store,
            navigator,
        }
    }

    /// React to a 401 for a request sent with `presented`.
    ///
    /// Returns whether this call ended the session. Requests sent without a
    /// credential (a failed login, for instance) never trigger it.
    pub fn handle(&self, presented: Option<&Credential>) -> bool {
        let Some(presented) = presented else {
            debug!("401 for an anonymous request; nothing to revoke");
            return false;
        };
        if !self.cell.revoke_if_current(presented) {
            debug!("401 for a credential that is no longer live");
            return false;
        }

        warn!("credential rejected by backend; session cleared");
        if let Err(error) = self.store.erase() {
            warn!(%error, "failed to erase persisted credential after rejection");
        }
        self.navigator.navigate(Surface::Login);
        true
    }
}
