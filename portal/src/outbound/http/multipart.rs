//! Multipart encoding for file-bearing operations.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::request::scalar_text;
use crate::domain::ApiError;

const DEFAULT_MIME: &str = "application/octet-stream";

/// One file to upload under a named form field.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    field: String,
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl FilePart {
    /// File held in memory. The content type is guessed from `file_name`.
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = guess_mime(&file_name).to_owned();
        Self {
            field: field.into(),
            file_name,
            mime,
            bytes,
        }
    }

    /// Read a file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the file cannot be read.
    pub async fn from_path(field: impl Into<String>, path: &Path) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|error| {
            ApiError::invalid_request(format!("cannot read {}: {error}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_owned();
        Ok(Self::new(field, file_name, bytes))
    }

    /// Move the file onto another form field.
    #[must_use]
    pub fn renamed(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Override the guessed content type.
    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }

    /// Form field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// File name sent in the part header.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Content type.
    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn into_part(self) -> Result<(String, Part), ApiError> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)
            .map_err(|error| {
                ApiError::invalid_request(format!("invalid content type {}: {error}", self.mime))
            })?;
        Ok((self.field, part))
    }
}

impl std::fmt::Debug for FilePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn guess_mime(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("txt") => "text/plain",
        _ => DEFAULT_MIME,
    }
}

/// Build a multipart form: each scalar body field becomes a text part, then
/// each file becomes a file part under its own field name.
pub(crate) fn build_form(fields: Option<&Value>, files: Vec<FilePart>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    match fields {
        None | Some(Value::Null) => {}
        Some(Value::Object(map)) => {
            for (key, value) in map {
                if let Some(text) = scalar_text(value) {
                    form = form.text(key.clone(), text);
                }
            }
        }
        Some(_) => {
            return Err(ApiError::invalid_request(
                "multipart fields must be a JSON object",
            ));
        }
    }
    for file in files {
        let (field, part) = file.into_part()?;
        form = form.part(field, part);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("leak.JPG", "image/jpeg")]
    #[case("lease.pdf", "application/pdf")]
    #[case("photo.png", "image/png")]
    #[case("notes", DEFAULT_MIME)]
    fn guesses_content_type(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(FilePart::new("photos", name, vec![1]).mime(), expected);
    }

    #[tokio::test]
    async fn reads_files_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("lease.pdf");
        std::fs::write(&path, b"%PDF-1.7").expect("write");

        let part = FilePart::from_path("document", &path).await.expect("part");

        assert_eq!(part.file_name(), "lease.pdf");
        assert_eq!(part.mime(), "application/pdf");
        assert_eq!(part.len(), 8);
    }

    #[tokio::test]
    async fn missing_file_is_an_invalid_request() {
        let err = FilePart::from_path("document", Path::new("/nonexistent/lease.pdf"))
            .await
            .expect_err("missing");
        assert_eq!(err.kind(), crate::domain::ApiErrorKind::InvalidRequest);
    }

    #[test]
    fn rejects_non_object_fields() {
        let err = build_form(Some(&json!(["a"])), Vec::new()).expect_err("array fields");
        assert_eq!(err.kind(), crate::domain::ApiErrorKind::InvalidRequest);
    }

    #[test]
    fn debug_omits_file_contents() {
        let part = FilePart::new("photos", "a.png", b"secret-bytes".to_vec());
        assert!(!format!("{part:?}").contains("secret"));
    }
}
