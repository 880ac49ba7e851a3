//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest client for the portal REST API, including the
//!   rejected-credential handler and one operation group per resource.
//! - **credential_store**: cap-std file holding the persisted credential.
//! - **feedback**: tracing-backed notifier and navigator for headless use.
//!
//! Adapters translate between domain types and wire representations. They
//! contain no session logic.

pub mod credential_store;
pub mod feedback;
pub mod http;
