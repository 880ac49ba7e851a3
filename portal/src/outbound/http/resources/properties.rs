//! `/properties` endpoints.

use serde_json::Value;

use crate::domain::ApiError;
use crate::outbound::http::{ApiClient, ApiRequest, HttpMethod, OperationDescriptor};

const LIST: OperationDescriptor = OperationDescriptor::json(HttpMethod::Get, "/properties");
const GET: OperationDescriptor = OperationDescriptor::json(HttpMethod::Get, "/properties/{id}");
const CREATE: OperationDescriptor = OperationDescriptor::json(HttpMethod::Post, "/properties");
const UPDATE: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Put, "/properties/{id}");
const DELETE: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Delete, "/properties/{id}");
const UNITS: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/properties/{id}/units");
const STATS: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/properties/{id}/stats");

/// Property operations.
pub struct Properties<'a> {
    client: &'a ApiClient,
}

impl<'a> Properties<'a> {
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

    pub async fn create(&self, property: Value) -> Result<Value, ApiError> {
        self.client
            .execute(&CREATE, ApiRequest::new().body(property))
            .await
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

    /// Units belonging to one property.
    pub async fn units(&self, id: &str) -> Result<Value, ApiError> {
        self.client.execute(&UNITS, ApiRequest::new().param(id)).await
    }

    /// Occupancy and revenue figures for one property.
    pub async fn stats(&self, id: &str) -> Result<Value, ApiError> {
        self.client.execute(&STATS, ApiRequest::new().param(id)).await
    }
}
