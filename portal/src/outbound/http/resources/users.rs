//! `/users` endpoints (admin and manager views).

use serde_json::Value;

use crate::domain::ApiError;
use crate::outbound::http::{ApiClient, ApiRequest, HttpMethod, OperationDescriptor};

const LIST: OperationDescriptor = OperationDescriptor::json(HttpMethod::Get, "/users");
const GET: OperationDescriptor = OperationDescriptor::json(HttpMethod::Get, "/users/{id}");
const CREATE: OperationDescriptor = OperationDescriptor::json(HttpMethod::Post, "/users");
const UPDATE: OperationDescriptor = OperationDescriptor::json(HttpMethod::Put, "/users/{id}");
const DELETE: OperationDescriptor = OperationDescriptor::json(HttpMethod::Delete, "/users/{id}");
const TENANTS: OperationDescriptor = OperationDescriptor::json(HttpMethod::Get, "/users/tenants");
const MAINTENANCE_STAFF: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/users/maintenance-staff");

/// User administration operations.
pub struct Users<'a> {
    client: &'a ApiClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &Value) -> Result<Value, ApiError> {
        self.client
            .execute(&LIST, ApiRequest::new().filters(filters))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.client.execute(&GET, ApiRequest::new().param(id)).await
    }

    pub async fn create(&self, user: Value) -> Result<Value, ApiError> {
        self.client.execute(&CREATE, ApiRequest::new().body(user)).await
    }

    pub async fn update(&self, id: &str, changes: Value) -> Result<Value, ApiError> {
        let request = ApiRequest::new().param(id).body(changes);
        self.client.execute(&UPDATE, request).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.client
            .execute(&DELETE, ApiRequest::new().param(id))
            .await
    }

    /// Tenant directory.
    pub async fn tenants(&self) -> Result<Value, ApiError> {
        self.client.execute(&TENANTS, ApiRequest::new()).await
    }

    /// Staff who can be assigned maintenance requests.
    pub async fn maintenance_staff(&self) -> Result<Value, ApiError> {
        self.client
            .execute(&MAINTENANCE_STAFF, ApiRequest::new())
            .await
    }
}
