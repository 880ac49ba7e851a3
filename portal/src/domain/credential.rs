//! Opaque bearer credential issued by the portal backend.

use std::fmt;

use zeroize::Zeroizing;

/// Validation errors returned by [`Credential::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    /// Token was empty.
    #[error("credential must not be empty")]
    Empty,
    /// Token contained whitespace, which cannot travel in a bearer header.
    #[error("credential must not contain whitespace")]
    ContainsWhitespace,
}

/// Bearer token identifying an authenticated session.
///
/// ## Invariants
/// - The token is non-empty and contains no whitespace.
/// - The token is wiped from memory on drop and never rendered by `Debug`.
///
/// # Examples
/// ```
/// use portal::domain::Credential;
///
/// let credential = Credential::new("eyJhbGciOi.abc.def").unwrap();
/// assert_eq!(credential.expose(), "eyJhbGciOi.abc.def");
/// assert_eq!(format!("{credential:?}"), "Credential(<redacted>)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    /// Validate and wrap a raw token.
    pub fn new(token: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let token = Zeroizing::new(token.into());
        if token.is_empty() {
            return Err(CredentialValidationError::Empty);
        }
        if token.chars().any(char::is_whitespace) {
            return Err(CredentialValidationError::ContainsWhitespace);
        }
        Ok(Self(token))
    }

    /// Raw token value, for attaching to outgoing requests or persisting.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", CredentialValidationError::Empty)]
    #[case("abc def", CredentialValidationError::ContainsWhitespace)]
    #[case("abc\n", CredentialValidationError::ContainsWhitespace)]
    fn rejects_malformed_tokens(#[case] raw: &str, #[case] expected: CredentialValidationError) {
        let err = Credential::new(raw).expect_err("malformed token must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn debug_output_hides_the_token() {
        let credential = Credential::new("secret-token").expect("valid token");
        assert!(!format!("{credential:?}").contains("secret-token"));
    }
}
