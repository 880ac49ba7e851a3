//! HTTP adapter for the portal REST API.
//!
//! [`ApiClient`] is the single point of HTTP configuration. It reads the
//! bearer credential from the shared [`crate::domain::SessionCell`] at send
//! time, routes every 401 through [`UnauthorizedHandler`], and exposes one
//! operation group per backend resource.

mod auth_backend;
mod client;
mod decoder;
mod descriptor;
mod multipart;
mod request;
pub mod resources;
mod unauthorized;

pub use self::client::{ApiClient, ApiClientConfig};
pub use self::descriptor::{Encoding, HttpMethod, OperationDescriptor};
pub use self::multipart::FilePart;
pub use self::request::ApiRequest;
pub use self::resources::DashboardOverview;
pub use self::unauthorized::UnauthorizedHandler;
