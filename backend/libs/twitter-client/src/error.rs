//! Twitter client error types.

use thiserror::Error;

/// Result type for twitter-client operations
pub type TwitterResult<T> = std::result::Result<T, TwitterError>;

#[derive(Debug, Error)]
pub enum TwitterError {
    /// Transport failure (DNS, TLS, connection reset, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the media file from local storage failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OAuth error: {0}")]
    OAuth(String),

    /// The provider answered with a body we could not interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The provider rejected the credentials (401/403)
    #[error("Twitter rejected credentials ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Twitter API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Media processing failed: {0}")]
    MediaProcessing(String),
}

impl TwitterError {
    /// Build an error from a non-success provider status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Unauthorized { status, message },
            _ => Self::Api { status, message },
        }
    }

    /// Whether the provider refused the presented credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Upstream HTTP status, when the provider produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classifies_credential_rejections() {
        assert!(TwitterError::from_status(401, "Unauthorized").is_unauthorized());
        assert!(TwitterError::from_status(403, "Forbidden").is_unauthorized());
        assert!(!TwitterError::from_status(429, "Too Many Requests").is_unauthorized());
        assert!(!TwitterError::from_status(500, "oops").is_unauthorized());
    }

    #[test]
    fn test_status_is_exposed() {
        assert_eq!(TwitterError::from_status(503, "down").status(), Some(503));
        assert_eq!(TwitterError::OAuth("bad key".into()).status(), None);
    }

    #[test]
    fn test_error_display() {
        let err = TwitterError::from_status(401, "Could not authenticate you.");
        assert!(err.to_string().contains("Could not authenticate you."));
        assert!(err.to_string().contains("401"));
    }
}
