//! `/units` endpoints.

use serde_json::Value;

use crate::domain::ApiError;
use crate::outbound::http::{ApiClient, ApiRequest, HttpMethod, OperationDescriptor};

const LIST: OperationDescriptor = OperationDescriptor::json(HttpMethod::Get, "/units");
const GET: OperationDescriptor = OperationDescriptor::json(HttpMethod::Get, "/units/{id}");
const CREATE: OperationDescriptor = OperationDescriptor::json(HttpMethod::Post, "/units");
const UPDATE: OperationDescriptor = OperationDescriptor::json(HttpMethod::Put, "/units/{id}");
const DELETE: OperationDescriptor = OperationDescriptor::json(HttpMethod::Delete, "/units/{id}");
const AVAILABLE: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/units/available");

/// Unit operations.
pub struct Units<'a> {
    client: &'a ApiClient,
}

impl<'a> Units<'a> {
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

    pub async fn create(&self, unit: Value) -> Result<Value, ApiError> {
        self.client.execute(&CREATE, ApiRequest::new().body(unit)).await
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

    /// Vacant units, optionally narrowed by property or bedroom count.
    pub async fn available(&self, filters: &Value) -> Result<Value, ApiError> {
        self.client
            .execute(&AVAILABLE, ApiRequest::new().filters(filters))
            .await
    }
}
