//! `/maintenance` endpoints.

use serde_json::{Value, json};

use crate::domain::{ApiError, WorkSessionSummary};
use crate::outbound::http::{ApiClient, ApiRequest, FilePart, HttpMethod, OperationDescriptor};

const LIST: OperationDescriptor = OperationDescriptor::json(HttpMethod::Get, "/maintenance");
const GET: OperationDescriptor = OperationDescriptor::json(HttpMethod::Get, "/maintenance/{id}");
const CREATE: OperationDescriptor =
    OperationDescriptor::multipart(HttpMethod::Post, "/maintenance");
const UPDATE: OperationDescriptor =
    OperationDescriptor::multipart(HttpMethod::Put, "/maintenance/{id}");
const ASSIGN: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Put, "/maintenance/{id}/assign");
const RATE: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Post, "/maintenance/{id}/rate");
const CATEGORIES: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/maintenance/categories");
const STATS: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/maintenance/stats");

/// Form field carrying photo evidence.
pub const PHOTO_FIELD: &str = "photos";
/// Lowest accepted satisfaction rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted satisfaction rating.
pub const MAX_RATING: u8 = 5;

/// Maintenance request operations.
pub struct Maintenance<'a> {
    client: &'a ApiClient,
}

impl<'a> Maintenance<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Requests visible to the current user.
    pub async fn list(&self, filters: &Value) -> Result<Value, ApiError> {
        self.client
            .execute(&LIST, ApiRequest::new().filters(filters))
            .await
    }

    /// One request.
    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.client.execute(&GET, ApiRequest::new().param(id)).await
    }

    /// File a request. Scalar fields (title, category, priority, unit) and
    /// each photo travel as one multipart form.
    pub async fn create(&self, fields: Value, photos: Vec<FilePart>) -> Result<Value, ApiError> {
        let request = ApiRequest::new().body(fields).files(as_photos(photos));
        self.client.execute(&CREATE, request).await
    }

    /// Update status, notes or photos of a request.
    pub async fn update(
        &self,
        id: &str,
        fields: Value,
        photos: Vec<FilePart>,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::new()
            .param(id)
            .body(fields)
            .files(as_photos(photos));
        self.client.execute(&UPDATE, request).await
    }

    /// Record a finished work session against a request.
    pub async fn log_work(
        &self,
        id: &str,
        session: &WorkSessionSummary,
        notes: &str,
    ) -> Result<Value, ApiError> {
        self.update(id, session.to_payload(notes), Vec::new()).await
    }

    /// Assign a request to a maintenance staff member.
    pub async fn assign(&self, id: &str, assignee_id: &str) -> Result<Value, ApiError> {
        let request = ApiRequest::new()
            .param(id)
            .body(json!({ "assignedTo": assignee_id }));
        self.client.execute(&ASSIGN, request).await
    }

    /// Rate completed work from 1 to 5.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] without calling the backend when
    /// `rating` is out of range.
    pub async fn rate(
        &self,
        id: &str,
        rating: u8,
        feedback: Option<&str>,
    ) -> Result<Value, ApiError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ApiError::invalid_request(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }
        let request = ApiRequest::new()
            .param(id)
            .body(json!({ "rating": rating, "feedback": feedback }));
        self.client.execute(&RATE, request).await
    }

    /// Request categories offered by the form.
    pub async fn categories(&self) -> Result<Value, ApiError> {
        self.client.execute(&CATEGORIES, ApiRequest::new()).await
    }

    /// Aggregate counts for the maintenance dashboard.
    pub async fn stats(&self) -> Result<Value, ApiError> {
        self.client.execute(&STATS, ApiRequest::new()).await
    }
}

fn as_photos(photos: Vec<FilePart>) -> impl Iterator<Item = FilePart> {
    photos.into_iter().map(|photo| photo.renamed(PHOTO_FIELD))
}
