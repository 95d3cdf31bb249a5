/// Error types for tweet-service
///
/// Every handler returns `Result<HttpResponse, AppError>`; the
/// `ResponseError` impl below is the single place failures become HTTP
/// responses, so each request produces exactly one response.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;
use twitter_client::TwitterError;

/// Result type for tweet-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Twitter did not confirm the OAuth callback
    #[error("Invalid callback")]
    HandshakeRejected,

    /// Callback arrived without token, verifier or stored request secret
    #[error("Access denied or session expired")]
    MissingHandshakeState,

    /// The session holds no access credentials
    #[error("Not logged in")]
    NotAuthenticated,

    /// Twitter rejected the session credentials
    #[error("Twitter rejected credentials: {0}")]
    Unauthorized(String),

    /// Any other upstream failure (network, rate limit, validation)
    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Body sent to the browser. Upstream and internal details stay in logs.
    fn public_message(&self) -> String {
        match self {
            AppError::HandshakeRejected
            | AppError::MissingHandshakeState
            | AppError::NotAuthenticated => self.to_string(),
            AppError::Unauthorized(_) => "Twitter rejected the session credentials".to_string(),
            AppError::ProviderRequestFailed(_) => "Upstream request failed".to_string(),
            AppError::BadRequest(msg) | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Internal(_) => "Internal Server Error".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::HandshakeRejected
            | AppError::MissingHandshakeState
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotAuthenticated | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ProviderRequestFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(self.public_message())
    }
}

impl From<TwitterError> for AppError {
    fn from(err: TwitterError) -> Self {
        match err {
            TwitterError::Unauthorized { .. } => AppError::Unauthorized(err.to_string()),
            // The local upload could not be read; nothing reached Twitter
            TwitterError::Io(_) => AppError::Internal(err.to_string()),
            _ => AppError::ProviderRequestFailed(err.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Malformed form data: {}", err))
    }
}
