//! Client library for the Huntersrun property portal.
//!
//! `domain` holds the session manager, validated value types and the ports it
//! talks through. `outbound` holds the adapters: the reqwest HTTP client, the
//! on-disk credential store and tracing-backed feedback. [`app::Portal`] wires
//! the two together around one shared [`domain::SessionCell`].

pub mod app;
pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use app::Portal;
pub use config::PortalSettings;
