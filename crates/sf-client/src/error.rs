//! Error types for sfkit-client.
//!
//! Every data-plane crate in the workspace reports failures through this one
//! taxonomy, so a caller can match on [`ErrorKind`] without caring whether the
//! call went over REST, Bulk or SOAP.

use serde::Deserialize;
use std::time::Duration;

/// Result type alias for sfkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sfkit operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for a decode failure that keeps the raw status and body.
    pub fn decode(failure: DecodeFailure, status: u16, body: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode {
            failure,
            status,
            body: body.into(),
        })
    }

    /// Shorthand for a status outside the documented success set.
    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnexpectedStatus {
            status,
            body: body.into(),
        })
    }

    /// Returns true if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Returns true if the request never produced an HTTP response.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Timeout | ErrorKind::Connection(_) | ErrorKind::Transport(_)
        )
    }

    /// Returns true if the remote system reported the resource as unknown.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true for a SOAP fault caused by an expired or invalid session.
    pub fn is_invalid_session(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::SoapFault {
                class: SoapFaultClass::InvalidSession,
                ..
            }
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::UnexpectedStatus { status, .. } | ErrorKind::Decode { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Salesforce error records contained in an unexpected-status body.
    ///
    /// REST endpoints answer failures with a JSON array (occasionally a
    /// single object) of `{errorCode, message, fields}`. Returns an empty
    /// vector when the body has another shape.
    pub fn api_errors(&self) -> Vec<ApiError> {
        let ErrorKind::UnexpectedStatus { body, .. } = &self.kind else {
            return Vec::new();
        };
        if let Ok(errors) = serde_json::from_str::<Vec<ApiError>>(body) {
            return errors;
        }
        serde_json::from_str::<ApiError>(body)
            .map(|e| vec![e])
            .unwrap_or_default()
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Access token or instance URL is empty; nothing was sent.
    #[error("Missing credentials: access token and instance URL are required")]
    MissingCredentials,

    /// Request timed out in the transport.
    #[error("Request timeout")]
    Timeout,

    /// Connection could not be established.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other transport-level failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// HTTP status outside the documented success set.
    #[error("Unexpected HTTP status {status}: {}", sanitize_body(.body))]
    UnexpectedStatus { status: u16, body: String },

    /// Success status but the body did not decode.
    #[error("Decode failure on HTTP {status}: {failure}")]
    Decode {
        failure: DecodeFailure,
        status: u16,
        body: String,
    },

    /// SOAP fault returned by the Metadata API.
    #[error("SOAP fault [{fault_code}]: {}", sanitize_body(.fault_string))]
    SoapFault {
        class: SoapFaultClass,
        fault_code: String,
        fault_string: String,
    },

    /// A polled operation reached a terminal failure state.
    #[error("Operation {id} finished as {state}: {message}")]
    RemoteOperationFailed {
        id: String,
        state: String,
        message: String,
    },

    /// A caller-side polling loop gave up before the operation finished.
    #[error("Operation {id} still running after {waited:?}")]
    PollTimeout { id: String, waited: Duration },

    /// Request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ErrorKind {
    /// Returns true if this error kind is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::Timeout | ErrorKind::Connection(_) => true,
            ErrorKind::UnexpectedStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is typically retryable.
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Why a response body could not be turned into a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeFailure {
    /// Body carried no data at all (for CSV: not even a header).
    #[error("empty payload")]
    EmptyPayload,

    /// CSV row whose column count differs from the header.
    #[error("malformed row at line {line}: expected {expected} columns, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("invalid JSON: {0}")]
    Json(String),

    #[error("invalid XML: {0}")]
    Xml(String),

    #[error("invalid CSV: {0}")]
    Csv(String),

    /// Expected element or field was absent.
    #[error("missing element: {0}")]
    MissingElement(String),

    /// A value outside the known vocabulary (e.g. an unknown job state).
    #[error("unrecognized value: {0}")]
    UnknownValue(String),
}

/// Sub-classification of a SOAP fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoapFaultClass {
    /// Session id expired or invalid; re-authenticate and retry.
    InvalidSession,
    /// Any other fault.
    Generic,
}

/// One Salesforce REST error record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub error_code: String,
    pub message: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if err.is_builder() {
            ErrorKind::Config(err.to_string())
        } else {
            ErrorKind::Transport(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Serialization(err.to_string()), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Serialization(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}

/// Redact tokens and session ids from a body before it is displayed.
///
/// The raw body stays untouched in the error value; only the `Display`
/// rendering goes through here.
pub(crate) fn sanitize_body(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    // Salesforce tokens start with the 15/18 char org id followed by '!'
    let mut sanitized = redact(
        r"00[A-Za-z0-9]{13,}[!][A-Za-z0-9_.]+",
        message,
        "[REDACTED_TOKEN]",
    );
    sanitized = redact(r"sid=[A-Za-z0-9]{20,}", &sanitized, "sid=[REDACTED]");
    sanitized = redact(
        r"<([A-Za-z]+:)?sessionId>[^<]*</([A-Za-z]+:)?sessionId>",
        &sanitized,
        "<sessionId>[REDACTED]</sessionId>",
    );

    if sanitized.len() > MAX_LENGTH {
        let mut end = MAX_LENGTH;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized.truncate(end);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}

fn redact(pattern: &str, input: &str, replacement: &str) -> String {
    match regex_lite::Regex::new(pattern) {
        Ok(re) => re.replace_all(input, replacement).into_owned(),
        Err(_) => input.to_string(),
    }
}
