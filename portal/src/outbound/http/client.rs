//! Reqwest-backed client for the portal REST API.
//!
//! The client owns transport concerns only: URL rendering, credential
//! attachment, body encoding, and response decoding. Every call goes through
//! [`ApiClient::execute`], so the bearer header and the 401 handling apply
//! identically to every resource.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::decoder::{decode_body, map_transport_error};
use super::descriptor::{Encoding, OperationDescriptor};
use super::multipart::build_form;
use super::request::ApiRequest;
use super::resources::{
    Auth, Dashboard, Leases, Maintenance, Messages, Payments, Properties, Units, Users,
};
use super::unauthorized::UnauthorizedHandler;
use crate::domain::{ApiError, SessionCell};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("huntersrun-portal/", env!("CARGO_PKG_VERSION"));
const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Transport settings for [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    /// API root, e.g. `http://localhost:5000/api`.
    pub base_url: Url,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl ApiClientConfig {
    /// Settings with the default timeout and user agent.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

struct Inner {
    http: Client,
    base_url: Url,
    user_agent: String,
    cell: SessionCell,
    unauthorized: UnauthorizedHandler,
}

/// Shared API client. Cloning is cheap; clones share the connection pool and
/// the session cell.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl ApiClient {
    /// Build a client reading credentials from `cell`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        config: ApiClientConfig,
        cell: SessionCell,
        unauthorized: UnauthorizedHandler,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: config.base_url,
                user_agent: config.user_agent,
                cell,
                unauthorized,
            }),
        })
    }

    /// API root every path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Perform `operation` and return the decoded JSON body.
    ///
    /// For authenticated operations the credential is read from the session
    /// cell at send time. A 401 for a request that carried the live
    /// credential ends the session before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for local request problems, transport failures,
    /// non-success statuses, and undecodable bodies.
    pub async fn execute(
        &self,
        operation: &OperationDescriptor,
        request: ApiRequest,
    ) -> Result<Value, ApiError> {
        let ApiRequest {
            path_params,
            query,
            body,
            files,
        } = request;
        let url = operation.resolve(&self.inner.base_url, path_params.as_slice())?;
        let request_id = Uuid::new_v4();

        let mut builder = self
            .inner
            .http
            .request(operation.method.into(), url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, self.inner.user_agent.as_str())
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        builder = match operation.encoding {
            Encoding::Json if !files.is_empty() => {
                return Err(ApiError::invalid_request(format!(
                    "{} {} does not accept file uploads",
                    operation.method.as_str(),
                    operation.path
                )));
            }
            Encoding::Json => match &body {
                Some(body) => builder.json(body),
                None => builder,
            },
            Encoding::Multipart => builder.multipart(build_form(body.as_ref(), files)?),
        };

        let credential = if operation.authenticated {
            self.inner.cell.credential()
        } else {
            None
        };
        if let Some(credential) = &credential {
            builder = builder.bearer_auth(credential.expose());
        }

        let response = builder
            .send()
            .await
            .map_err(|error| map_transport_error(&error))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|error| map_transport_error(&error))?;
        debug!(
            %request_id,
            method = operation.method.as_str(),
            path = operation.path,
            status = status.as_u16(),
            authenticated = credential.is_some(),
            "api call completed"
        );

        if status == StatusCode::UNAUTHORIZED {
            self.inner.unauthorized.handle(credential.as_ref());
        }
        decode_body(status, bytes.as_ref())
    }

    /// Perform `operation` and deserialize the body into `T`.
    pub(crate) async fn execute_as<T: DeserializeOwned>(
        &self,
        operation: &OperationDescriptor,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let value = self.execute(operation, request).await?;
        serde_json::from_value(value).map_err(|error| {
            ApiError::decode(format!(
                "unexpected {} {} response: {error}",
                operation.method.as_str(),
                operation.path
            ))
        })
    }

    /// Authentication endpoints.
    #[must_use]
    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    /// Payment methods, balance and history.
    #[must_use]
    pub fn payments(&self) -> Payments<'_> {
        Payments::new(self)
    }

    /// Message threads.
    #[must_use]
    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self)
    }

    /// Lease documents and signatures.
    #[must_use]
    pub fn leases(&self) -> Leases<'_> {
        Leases::new(self)
    }

    /// Maintenance requests.
    #[must_use]
    pub fn maintenance(&self) -> Maintenance<'_> {
        Maintenance::new(self)
    }

    /// Properties.
    #[must_use]
    pub fn properties(&self) -> Properties<'_> {
        Properties::new(self)
    }

    /// Units.
    #[must_use]
    pub fn units(&self) -> Units<'_> {
        Units::new(self)
    }

    /// User administration.
    #[must_use]
    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    /// Dashboard aggregates.
    #[must_use]
    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::new(self)
    }
}
