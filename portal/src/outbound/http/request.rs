//! Per-call request parts: path parameters, query filters, body and files.

use serde_json::Value;

use super::multipart::FilePart;

/// Everything a single call supplies beyond its [`super::OperationDescriptor`].
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub(crate) path_params: Vec<String>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
    pub(crate) files: Vec<FilePart>,
}

impl ApiRequest {
    /// Empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the next `{placeholder}` in the path template.
    #[must_use]
    pub fn param(mut self, value: impl Into<String>) -> Self {
        self.path_params.push(value.into());
        self
    }

    /// Forward a JSON object of filters as query-string pairs.
    ///
    /// Nulls are skipped, arrays repeat the key, and nested objects are sent
    /// as JSON text. Anything other than an object is ignored.
    #[must_use]
    pub fn filters(mut self, filters: &Value) -> Self {
        if let Value::Object(map) = filters {
            for (key, value) in map {
                push_query_value(&mut self.query, key, value);
            }
        }
        self
    }

    /// Add one query-string pair.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// JSON body, or the text fields of a multipart form.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach files; only valid for multipart operations.
    #[must_use]
    pub fn files(mut self, files: impl IntoIterator<Item = FilePart>) -> Self {
        self.files.extend(files);
        self
    }
}

fn push_query_value(query: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                push_query_value(query, key, item);
            }
        }
        other => {
            if let Some(text) = scalar_text(other) {
                query.push((key.to_owned(), text));
            }
        }
    }
}

/// Text form of a JSON value as it appears in a query string or form field.
/// Returns `None` for `null`.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
