//! Composition root: one session cell shared by the API client and the
//! session manager.

use std::sync::Arc;

use crate::config::{ConfigError, PortalSettings};
use crate::domain::ports::{CredentialStore, CredentialStoreError, Navigator, Notifier};
use crate::domain::{SessionCell, SessionManager, SessionPorts};
use crate::outbound::credential_store::FileCredentialStore;
use crate::outbound::feedback::{TracingNavigator, TracingNotifier};
use crate::outbound::http::{ApiClient, ApiClientConfig, UnauthorizedHandler};

/// Failures while assembling a [`Portal`].
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Settings could not be interpreted.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The credential directory could not be opened.
    #[error(transparent)]
    CredentialStore(#[from] CredentialStoreError),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// A wired portal client.
#[derive(Clone)]
pub struct Portal {
    api: ApiClient,
    session: Arc<SessionManager>,
}

impl Portal {
    /// Wire the default adapters: file credential store, tracing feedback.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError`] when the settings are invalid or the
    /// credential directory cannot be opened.
    pub fn connect(settings: &PortalSettings) -> Result<Self, StartupError> {
        let config = settings.api_client_config()?;
        let store = FileCredentialStore::open(&settings.credential_dir())?;
        Self::from_parts(
            config,
            Arc::new(store),
            Arc::new(TracingNotifier),
            Arc::new(TracingNavigator::new()),
        )
    }

    /// Wire caller-supplied adapters around a fresh session cell.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Http`] when the HTTP client cannot be built.
    pub fn from_parts(
        config: ApiClientConfig,
        store: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, StartupError> {
        let cell = SessionCell::new();
        let unauthorized = UnauthorizedHandler::new(cell.clone(), Arc::clone(&store), navigator);
        let api = ApiClient::new(config, cell.clone(), unauthorized)?;
        let session = SessionManager::new(
            cell,
            SessionPorts {
                backend: Arc::new(api.clone()),
                store,
                notifier,
            },
        );
        Ok(Self {
            api,
            session: Arc::new(session),
        })
    }

    /// Typed REST client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Session manager.
    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }
}
