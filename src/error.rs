use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// The error type for credential loading and token refresh operations.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The credential file could not be read at all.
    CredentialFileUnreadable,

    /// Credential content exists but is invalid/malformed.
    CredentialInvalid,

    /// The token endpoint answered with a non-200 status or an empty body.
    ///
    /// Carries the observed status code for diagnostics.
    NoResponse(StatusCode),

    /// The impersonation endpoint returned an expiry timestamp that is not
    /// valid RFC3339.
    ///
    /// Kept separate from [`ErrorKind::Decode`]: the response body had the
    /// documented shape, but the remote service violated the field's
    /// contract.
    InvalidExpiryDate,

    /// A response body could not be decoded into the expected shape.
    ///
    /// The underlying decode diagnostic is preserved as the error source.
    Decode,

    /// A request cannot be built (invalid URL, bad header value, etc.).
    RequestInvalid,

    /// Unexpected errors (network, I/O, etc.).
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error.
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Check if this is a credential load error.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::CredentialFileUnreadable | ErrorKind::CredentialInvalid
        )
    }
}

// Convenience constructors
impl Error {
    /// Create an unreadable credential file error.
    pub fn credential_file_unreadable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialFileUnreadable, message)
    }

    /// Create a credential invalid error.
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a no-response error carrying the observed status.
    pub fn no_response(status: StatusCode) -> Self {
        Self::new(
            ErrorKind::NoResponse(status),
            format!("token endpoint returned no usable response (status {status})"),
        )
    }

    /// Create an invalid expiry date error.
    pub fn invalid_expiry_date(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidExpiryDate, message)
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    /// Create a request invalid error.
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::CredentialFileUnreadable => write!(f, "credential file unreadable"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::NoResponse(status) => write!(f, "no response (status {status})"),
            ErrorKind::InvalidExpiryDate => write!(f, "invalid expiry date"),
            ErrorKind::Decode => write!(f, "undecodable response"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_response_carries_status() {
        let err = Error::no_response(StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.kind(),
            ErrorKind::NoResponse(StatusCode::UNAUTHORIZED)
        );
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_decode_preserves_source() {
        let serde_err =
            serde_json::from_str::<serde_json::Value>("not json").expect_err("must fail");
        let diagnostic = serde_err.to_string();
        let err = Error::decode("failed to parse token response").with_source(serde_err);

        assert_eq!(err.kind(), ErrorKind::Decode);
        let source = std::error::Error::source(&err).expect("source must be kept");
        assert_eq!(source.to_string(), diagnostic);
    }

    #[test]
    fn test_is_load_error() {
        assert!(Error::credential_file_unreadable("gone").is_load_error());
        assert!(Error::credential_invalid("bad json").is_load_error());
        assert!(!Error::no_response(StatusCode::OK).is_load_error());
        assert!(!Error::invalid_expiry_date("not-a-date").is_load_error());
    }
}
