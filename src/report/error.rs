//! Error types and response handling for the report endpoint.
//!
//! Provides status code mapping and JSON error bodies. Internal failure
//! details are logged by the caller and never put in a response.

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::Response;
use thiserror::Error;

/// Errors that can occur while handling a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Missing or malformed fields in the request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The document store rejected the write
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReportError {
    /// Map error variant to appropriate HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReportError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ReportError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ReportError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error type string for JSON responses
    pub fn error_type(&self) -> &'static str {
        match self {
            ReportError::InvalidRequest(_) => "invalid_request",
            ReportError::Persistence(_) | ReportError::Internal(_) => "internal_error",
        }
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> String {
        match self {
            ReportError::InvalidRequest(message) => message.clone(),
            ReportError::Persistence(_) | ReportError::Internal(_) => {
                "Failed to submit report".to_string()
            }
        }
    }
}

/// Errors from binding or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid bind address '{addr}'")]
    InvalidAddress { addr: String },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server is not bound; call bind() before run()")]
    NotBound,

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builder for standardized error responses
pub struct ErrorResponse;

impl ErrorResponse {
    /// Create a JSON error response from a ReportError
    pub fn from_error(err: &ReportError, request_id: &str) -> Response {
        let body = serde_json::json!({
            "error": {
                "type": err.error_type(),
                "message": err.public_message(),
                "request_id": request_id
            }
        });

        let mut response = Response::new(Body::from(body.to_string()));
        *response.status_mut() = err.status_code();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/json"),
        );
        response
    }
}
