//! Declarative operation descriptors.
//!
//! Every backend call is a `const` [`OperationDescriptor`]: method, path
//! template and payload encoding. The client reads the encoding to choose
//! between a JSON body and a multipart form, so call sites never set
//! content types themselves.

use reqwest::{Method, Url};

use crate::domain::ApiError;

/// HTTP verbs used by the portal API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Upper-case verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// Request body encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// `application/json` body (or none).
    Json,
    /// `multipart/form-data` with text fields and file parts.
    Multipart,
}

/// One backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationDescriptor {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path below the API base, with `{name}` placeholders.
    pub path: &'static str,
    /// Body encoding.
    pub encoding: Encoding,
    /// Whether the live credential is attached. Anonymous operations never
    /// send one, so their 401s cannot end a session.
    pub authenticated: bool,
}

impl OperationDescriptor {
    /// Operation with a JSON body.
    #[must_use]
    pub const fn json(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            path,
            encoding: Encoding::Json,
            authenticated: true,
        }
    }

    /// Operation with a multipart body.
    #[must_use]
    pub const fn multipart(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            path,
            encoding: Encoding::Multipart,
            authenticated: true,
        }
    }

    /// The same operation sent without a credential.
    #[must_use]
    pub const fn anonymous(self) -> Self {
        Self {
            authenticated: false,
            ..self
        }
    }

    /// Append the rendered path to `base`.
    ///
    /// Placeholders are filled from `params` in order; each value becomes one
    /// percent-encoded segment, so an id can never inject extra path levels.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the parameter count does not
    /// match the template, a parameter is blank, or `base` cannot carry a path.
    pub fn resolve<S: AsRef<str>>(&self, base: &Url, params: &[S]) -> Result<Url, ApiError> {
        let mut values = params.iter().map(AsRef::as_ref);
        let mut segments = Vec::new();
        for segment in self.path.split('/').filter(|segment| !segment.is_empty()) {
            if segment.starts_with('{') && segment.ends_with('}') {
                let value = values.next().ok_or_else(|| {
                    ApiError::invalid_request(format!("missing {segment} for {}", self.path))
                })?;
                if value.trim().is_empty() {
                    return Err(ApiError::invalid_request(format!(
                        "blank {segment} for {}",
                        self.path
                    )));
                }
                segments.push(value);
            } else {
                segments.push(segment);
            }
        }
        if values.next().is_some() {
            return Err(ApiError::invalid_request(format!(
                "too many path parameters for {}",
                self.path
            )));
        }

        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::invalid_request("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn base() -> Url {
        Url::parse("http://localhost:5000/api").expect("base url")
    }

    #[rstest]
    fn renders_static_paths_below_base(base: Url) {
        let op = OperationDescriptor::json(HttpMethod::Get, "/dashboard/stats");
        let url = op.resolve::<&str>(&base, &[]).expect("url");
        assert_eq!(url.as_str(), "http://localhost:5000/api/dashboard/stats");
    }

    #[rstest]
    fn anonymous_operations_keep_method_path_and_encoding() {
        let op = OperationDescriptor::json(HttpMethod::Post, "/auth/login").anonymous();
        assert!(!op.authenticated);
        assert_eq!(op.method, HttpMethod::Post);
        assert_eq!(op.encoding, Encoding::Json);
        assert!(OperationDescriptor::multipart(HttpMethod::Post, "/messages").authenticated);
    }

    #[rstest]
    fn tolerates_trailing_slash_on_base() {
        let base = Url::parse("https://portal.example/api/").expect("base");
        let op = OperationDescriptor::json(HttpMethod::Get, "/auth/me");
        let url = op.resolve::<&str>(&base, &[]).expect("url");
        assert_eq!(url.as_str(), "https://portal.example/api/auth/me");
    }

    #[rstest]
    fn fills_placeholders_and_encodes_them(base: Url) {
        let op = OperationDescriptor::json(HttpMethod::Put, "/payments/methods/{id}/default");
        let url = op.resolve(&base, &["pm/1 x"]).expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/payments/methods/pm%2F1%20x/default"
        );
    }

    #[rstest]
    #[case::missing(&[][..])]
    #[case::blank(&[" "][..])]
    #[case::extra(&["1", "2"][..])]
    fn rejects_mismatched_parameters(base: Url, #[case] params: &[&str]) {
        let op = OperationDescriptor::json(HttpMethod::Get, "/units/{id}");
        let err = op.resolve(&base, params).expect_err("mismatch");
        assert_eq!(err.kind(), crate::domain::ApiErrorKind::InvalidRequest);
    }

    #[test]
    fn constructors_set_encoding() {
        assert_eq!(
            OperationDescriptor::multipart(HttpMethod::Post, "/maintenance").encoding,
            Encoding::Multipart
        );
        assert_eq!(
            OperationDescriptor::json(HttpMethod::Post, "/auth/login").encoding,
            Encoding::Json
        );
    }
}
