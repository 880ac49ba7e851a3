//! Mock portal backend shared by the integration suites.

use std::sync::Arc;

use portal::Portal;
use portal::domain::ports::{CredentialStore, Navigator, Notifier};
use portal::outbound::http::ApiClientConfig;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const EMAIL: &str = "morgan@huntersrun.com";
pub const PASSWORD: &str = "correct-horse";
pub const TOKEN: &str = "tok-morgan-1";

pub fn user_json() -> Value {
    json!({
        "id": 7,
        "name": "Morgan Reyes",
        "email": EMAIL,
        "role": "manager",
        "phone": "555-0100"
    })
}

/// API root served by `server`.
pub fn api_base(server: &MockServer) -> Url {
    Url::parse(&format!("{}/api", server.uri())).expect("mock server url")
}

/// Accept `EMAIL`/`PASSWORD` and reject everything else with the backend's
/// usual message.
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({"email": EMAIL, "password": PASSWORD})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": TOKEN, "user": user_json()})),
        )
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .with_priority(2)
        .mount(server)
        .await;
}

pub fn portal_for(
    server: &MockServer,
    store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
) -> Portal {
    Portal::from_parts(ApiClientConfig::new(api_base(server)), store, notifier, navigator)
        .expect("portal")
}
