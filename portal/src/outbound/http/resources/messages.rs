//! `/messages` endpoints.

use serde_json::{Value, json};

use crate::domain::ApiError;
use crate::outbound::http::{ApiClient, ApiRequest, FilePart, HttpMethod, OperationDescriptor};

const THREADS: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/messages/threads");
const CREATE_THREAD: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Post, "/messages/threads");
const THREAD_MESSAGES: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/messages/threads/{id}/messages");
const SEND_MESSAGE: OperationDescriptor =
    OperationDescriptor::multipart(HttpMethod::Post, "/messages/threads/{id}/messages");
const UPDATE_THREAD_STATUS: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Put, "/messages/threads/{id}/status");
const UNREAD_COUNT: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/messages/unread-count");

/// Form field carrying message attachments.
pub const ATTACHMENT_FIELD: &str = "attachments";

/// Messaging operations.
pub struct Messages<'a> {
    client: &'a ApiClient,
}

impl<'a> Messages<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Threads visible to the current user.
    pub async fn threads(&self, filters: &Value) -> Result<Value, ApiError> {
        self.client
            .execute(&THREADS, ApiRequest::new().filters(filters))
            .await
    }

    /// Open a new thread (subject, recipients, first message).
    pub async fn create_thread(&self, thread: Value) -> Result<Value, ApiError> {
        self.client
            .execute(&CREATE_THREAD, ApiRequest::new().body(thread))
            .await
    }

    /// Messages in one thread.
    pub async fn thread_messages(&self, thread_id: &str) -> Result<Value, ApiError> {
        self.client
            .execute(&THREAD_MESSAGES, ApiRequest::new().param(thread_id))
            .await
    }

    /// Post a reply. Attachments are renamed onto the `attachments` field.
    pub async fn send_message(
        &self,
        thread_id: &str,
        content: &str,
        attachments: Vec<FilePart>,
    ) -> Result<Value, ApiError> {
        let files = attachments
            .into_iter()
            .map(|file| file.renamed(ATTACHMENT_FIELD));
        let request = ApiRequest::new()
            .param(thread_id)
            .body(json!({ "content": content }))
            .files(files);
        self.client.execute(&SEND_MESSAGE, request).await
    }

    /// Mark a thread open, resolved or archived.
    pub async fn update_thread_status(
        &self,
        thread_id: &str,
        status: &str,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::new()
            .param(thread_id)
            .body(json!({ "status": status }));
        self.client.execute(&UPDATE_THREAD_STATUS, request).await
    }

    /// Number of unread messages.
    pub async fn unread_count(&self) -> Result<Value, ApiError> {
        self.client.execute(&UNREAD_COUNT, ApiRequest::new()).await
    }
}
