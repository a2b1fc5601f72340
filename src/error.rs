//! Error types for the trackgate application.
//!
//! Every failure a request can run into is a variant of [`GatewayError`]. When one
//! escapes a handler it is rendered as a `400 Bad Request` with the error's display
//! text as a plain-text body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// The main error type for trackgate operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// A required query parameter was not supplied
    #[error("missing required parameter ({param})")]
    MissingParameter { param: String },

    /// The source_id contained a wildcard
    #[error("Invalid source_id")]
    InvalidSourceId,

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// The backend had nothing usable for the query
    #[error("Data not available")]
    DataNotAvailable,

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend transport errors
    #[error("Backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed backend URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Archive assembly errors
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Server errors
    #[error("Server error: {message}")]
    Server { message: String },
}

impl GatewayError {
    /// Shorthand for an [`GatewayError::InvalidParameter`]
    pub fn invalid_parameter(param: &str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Convenience type alias for Results with GatewayError
pub type Result<T> = std::result::Result<T, GatewayError>;
