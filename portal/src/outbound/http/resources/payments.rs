//! `/payments` endpoints.

use serde_json::{Value, json};

use crate::domain::{ApiError, PaymentAmount, PaymentMethodInput};
use crate::outbound::http::{ApiClient, ApiRequest, HttpMethod, OperationDescriptor};

const LIST_METHODS: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/payments/methods");
const ADD_METHOD: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Post, "/payments/methods");
const UPDATE_METHOD: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Put, "/payments/methods/{id}");
const DELETE_METHOD: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Delete, "/payments/methods/{id}");
const SET_DEFAULT_METHOD: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Put, "/payments/methods/{id}/default");
const BALANCE: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/payments/balance");
const HISTORY: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/payments/history");
const MAKE_PAYMENT: OperationDescriptor = OperationDescriptor::json(HttpMethod::Post, "/payments");
const AUTOPAY: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/payments/autopay");
const UPDATE_AUTOPAY: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Put, "/payments/autopay");
const ALL_PAYMENTS: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/payments/all");

/// Payment operations.
pub struct Payments<'a> {
    client: &'a ApiClient,
}

impl<'a> Payments<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Saved payment methods of the current tenant.
    pub async fn list_methods(&self) -> Result<Value, ApiError> {
        self.client.execute(&LIST_METHODS, ApiRequest::new()).await
    }

    /// Save a validated card or bank account.
    pub async fn add_method(
        &self,
        method: &PaymentMethodInput,
        make_default: bool,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::new().body(method.to_payload(make_default));
        self.client.execute(&ADD_METHOD, request).await
    }

    /// Edit a saved method (nickname, billing address).
    pub async fn update_method(&self, id: &str, changes: Value) -> Result<Value, ApiError> {
        let request = ApiRequest::new().param(id).body(changes);
        self.client.execute(&UPDATE_METHOD, request).await
    }

    /// Remove a saved method.
    pub async fn delete_method(&self, id: &str) -> Result<Value, ApiError> {
        self.client
            .execute(&DELETE_METHOD, ApiRequest::new().param(id))
            .await
    }

    /// Make a saved method the default.
    pub async fn set_default_method(&self, id: &str) -> Result<Value, ApiError> {
        self.client
            .execute(&SET_DEFAULT_METHOD, ApiRequest::new().param(id))
            .await
    }

    /// Outstanding balance.
    pub async fn balance(&self) -> Result<Value, ApiError> {
        self.client.execute(&BALANCE, ApiRequest::new()).await
    }

    /// Past payments, filtered by the given query fields.
    pub async fn history(&self, filters: &Value) -> Result<Value, ApiError> {
        self.client
            .execute(&HISTORY, ApiRequest::new().filters(filters))
            .await
    }

    /// Pay `amount` with a saved method.
    pub async fn make_payment(
        &self,
        amount: PaymentAmount,
        method_id: &str,
        description: Option<&str>,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "amount": amount,
            "paymentMethodId": method_id,
            "description": description,
        });
        self.client
            .execute(&MAKE_PAYMENT, ApiRequest::new().body(body))
            .await
    }

    /// Autopay settings.
    pub async fn autopay(&self) -> Result<Value, ApiError> {
        self.client.execute(&AUTOPAY, ApiRequest::new()).await
    }

    /// Replace autopay settings.
    pub async fn update_autopay(&self, settings: Value) -> Result<Value, ApiError> {
        self.client
            .execute(&UPDATE_AUTOPAY, ApiRequest::new().body(settings))
            .await
    }

    /// Every tenant's payments (admin and manager views).
    pub async fn all_payments(&self, filters: &Value) -> Result<Value, ApiError> {
        self.client
            .execute(&ALL_PAYMENTS, ApiRequest::new().filters(filters))
            .await
    }
}
