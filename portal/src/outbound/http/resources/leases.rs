//! `/leases` endpoints.

use serde_json::Value;

use crate::domain::{ApiError, SignatureCapture};
use crate::outbound::http::{ApiClient, ApiRequest, FilePart, HttpMethod, OperationDescriptor};

const DOCUMENTS: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/leases/documents");
const DOCUMENT: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/leases/documents/{id}");
const UPLOAD_DOCUMENT: OperationDescriptor =
    OperationDescriptor::multipart(HttpMethod::Post, "/leases/documents");
const SIGNATURE_REQUESTS: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/leases/signature-requests");
const SIGN_DOCUMENT: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Post, "/leases/documents/{id}/sign");
const CURRENT_LEASE: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/leases/current");
const REQUEST_RENEWAL: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Post, "/leases/renewal-request");

/// Form field carrying the uploaded lease document.
pub const DOCUMENT_FIELD: &str = "document";

/// Lease operations.
pub struct Leases<'a> {
    client: &'a ApiClient,
}

impl<'a> Leases<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Lease documents visible to the current user.
    pub async fn documents(&self, filters: &Value) -> Result<Value, ApiError> {
        self.client
            .execute(&DOCUMENTS, ApiRequest::new().filters(filters))
            .await
    }

    /// One document.
    pub async fn document(&self, id: &str) -> Result<Value, ApiError> {
        self.client
            .execute(&DOCUMENT, ApiRequest::new().param(id))
            .await
    }

    /// Upload a document with its metadata fields (title, tenant, unit).
    pub async fn upload_document(
        &self,
        metadata: Value,
        document: FilePart,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::new()
            .body(metadata)
            .files([document.renamed(DOCUMENT_FIELD)]);
        self.client.execute(&UPLOAD_DOCUMENT, request).await
    }

    /// Documents awaiting the current user's signature.
    pub async fn signature_requests(&self) -> Result<Value, ApiError> {
        self.client
            .execute(&SIGNATURE_REQUESTS, ApiRequest::new())
            .await
    }

    /// Submit a captured signature for a document.
    pub async fn sign_document(
        &self,
        id: &str,
        signature: &SignatureCapture,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::new().param(id).body(signature.to_payload());
        self.client.execute(&SIGN_DOCUMENT, request).await
    }

    /// The current tenant's active lease.
    pub async fn current(&self) -> Result<Value, ApiError> {
        self.client.execute(&CURRENT_LEASE, ApiRequest::new()).await
    }

    /// Ask for a renewal (preferred term, notes).
    pub async fn request_renewal(&self, details: Value) -> Result<Value, ApiError> {
        self.client
            .execute(&REQUEST_RENEWAL, ApiRequest::new().body(details))
            .await
    }
}
