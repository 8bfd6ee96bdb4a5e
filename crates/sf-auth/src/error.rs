//! Failures of credential loading and token grants.
//!
//! Display output never carries token or secret values.

pub type Result<T> = std::result::Result<T, Error>;

/// An authentication failure: what went wrong plus the underlying cause.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// The HTTP status of a rejected token request, if there was one.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Client(err) => err.status(),
            _ => None,
        }
    }
}

/// Classification of an authentication failure.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The token endpoint answered with an OAuth error body.
    #[error("OAuth error: {error} - {description}")]
    OAuth { error: String, description: String },

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The token request never got an HTTP answer.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Unexpected status from the token endpoint, or a failure building a client.
    #[error("Client error: {0}")]
    Client(sfkit_client::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A required variable is unset or blank; carries the `SF_` name.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Token endpoints may echo credentials back in URLs
        let message = err.to_string();
        let sanitized = if message.contains("access_token") || message.contains("token=") {
            "HTTP request failed (details redacted for security)".to_string()
        } else {
            message
        };
        Error::with_source(ErrorKind::Http(sanitized), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Serialization(err.to_string()), err)
    }
}

impl From<sfkit_client::Error> for Error {
    fn from(err: sfkit_client::Error) -> Self {
        Error::new(ErrorKind::Client(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        let err = ErrorKind::OAuth {
            error: "invalid_grant".to_string(),
            description: "authentication failure".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "OAuth error: invalid_grant - authentication failure"
        );
    }

    #[test]
    fn test_client_error_keeps_status() {
        let err: Error = sfkit_client::Error::unexpected_status(503, "maintenance").into();
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().starts_with("Client error"));
    }
}
