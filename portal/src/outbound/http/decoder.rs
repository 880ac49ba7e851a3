//! Centralised response decoding.
//!
//! Every response goes through [`decode_body`], which is the only place that
//! looks inside backend error payloads. The backend reports failures as
//! `{"message": ...}`, `{"error": ...}` or an express-validator style
//! `{"errors": [{"msg": ...}]}`; all three collapse into one optional message.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::ApiError;

#[derive(Debug, Default, Deserialize)]
struct ErrorBodyDto {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    errors: Vec<FieldErrorDto>,
}

#[derive(Debug, Deserialize)]
struct FieldErrorDto {
    #[serde(default, alias = "message")]
    msg: Option<String>,
}

impl ErrorBodyDto {
    fn into_message(self) -> Option<String> {
        let error_text = match self.error {
            Some(Value::String(text)) => Some(text),
            Some(Value::Object(map)) => map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => None,
        };
        self.message
            .into_iter()
            .chain(error_text)
            .chain(self.errors.into_iter().filter_map(|field| field.msg))
            .map(|text| text.trim().to_owned())
            .find(|text| !text.is_empty())
    }
}

/// Turn a status and raw body into the success payload or an [`ApiError`].
///
/// Successful empty bodies decode to `Value::Null`.
pub(crate) fn decode_body(status: StatusCode, body: &[u8]) -> Result<Value, ApiError> {
    if status.is_success() {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        return serde_json::from_slice(body)
            .map_err(|error| ApiError::decode(format!("invalid JSON payload: {error}")));
    }
    Err(ApiError::status(status.as_u16(), error_message(body)))
}

fn error_message(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<ErrorBodyDto>(body) {
        Ok(dto) => dto.into_message(),
        Err(_) => {
            let preview = body_preview(body);
            if !preview.is_empty() {
                debug!(body = %preview, "non-JSON error body");
            }
            None
        }
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Map a reqwest failure that produced no usable response.
pub(crate) fn map_transport_error(error: &reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::network(format!("request timed out: {error}"))
    } else {
        ApiError::network(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::message(
        br#"{"message":"Invalid credentials"}"#.as_slice(),
        Some("Invalid credentials"),
    )]
    #[case::error_string(br#"{"error":"Not found"}"#.as_slice(), Some("Not found"))]
    #[case::error_object(
        br#"{"error":{"message":"Lease expired"}}"#.as_slice(),
        Some("Lease expired"),
    )]
    #[case::validator(
        br#"{"errors":[{"msg":"Email is required","param":"email"}]}"#.as_slice(),
        Some("Email is required"),
    )]
    #[case::blank_message(br#"{"message":"  ","error":"Fallback"}"#.as_slice(), Some("Fallback"))]
    #[case::no_message(br#"{"success":false}"#.as_slice(), None)]
    #[case::html(b"<html><body>Bad Gateway</body></html>".as_slice(), None)]
    #[case::empty(b"".as_slice(), None)]
    fn extracts_backend_messages(#[case] body: &[u8], #[case] expected: Option<&str>) {
        let err = decode_body(StatusCode::BAD_REQUEST, body).expect_err("4xx");
        assert_eq!(err, ApiError::status(400, expected.map(str::to_owned)));
    }

    #[test]
    fn success_bodies_decode_to_json() {
        let value = decode_body(StatusCode::OK, br#"{"count":3}"#).expect("json");
        assert_eq!(value, json!({"count": 3}));
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"  \n".as_slice())]
    fn empty_success_is_null(#[case] body: &[u8]) {
        assert_eq!(decode_body(StatusCode::NO_CONTENT, body).expect("empty"), Value::Null);
    }

    #[test]
    fn malformed_success_is_a_decode_error() {
        let err = decode_body(StatusCode::OK, b"{not json").expect_err("decode");
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn preview_is_compacted_and_truncated() {
        let long = "word ".repeat(100);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
        assert_eq!(body_preview(b"a \n  b"), "a b");
    }
}
