//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Authentication Errors**: Invalid or missing API keys
/// - **Template Errors**: Missing templates, Jinja render failures, MJML compile failures
/// - **Message Errors**: Invalid addresses, missing attachment files
/// - **Delivery Errors**: SMTP submission failures
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// API key is missing or does not match the configured key.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Requested MJML template does not exist in the template directory.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Template variables could not be rendered into the template.
    ///
    /// Returns HTTP 422 Unprocessable Entity with the engine's message.
    #[error("Template render failed: {0}")]
    TemplateRender(String),

    /// Rendered template is not valid MJML.
    ///
    /// Returns HTTP 422 Unprocessable Entity with the compiler's message.
    #[error("MJML compile failed: {0}")]
    MjmlCompile(String),

    /// A recipient, CC, BCC, or sender address could not be parsed.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// A requested attachment file does not exist under the attachment directory.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Attachment not found: {0}")]
    AttachmentNotFound(String),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// Server-side configuration is incomplete (e.g. no sender address).
    ///
    /// Returns HTTP 500; the detail is logged, not exposed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// SMTP submission failed (connection, authentication, or rejection).
    ///
    /// Returns HTTP 500; the transport detail is logged, not exposed.
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// Filesystem operation failed (template or attachment I/O).
    ///
    /// Returns HTTP 500; the detail is logged, not exposed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lettre::transport::smtp::Error> for AppError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        Self::Smtp(err.to_string())
    }
}

impl From<lettre::error::Error> for AppError {
    fn from(err: lettre::error::Error) -> Self {
        Self::Smtp(err.to_string())
    }
}

impl From<lettre::address::AddressError> for AppError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        match err.kind() {
            minijinja::ErrorKind::TemplateNotFound => {
                Self::TemplateNotFound(err.name().unwrap_or("unknown").to_string())
            }
            _ => Self::TemplateRender(err.to_string()),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::InvalidApiKey => (
                StatusCode::UNAUTHORIZED,
                "invalid_api_key",
                self.to_string(),
            ),
            AppError::TemplateNotFound(_) => (
                StatusCode::NOT_FOUND,
                "template_not_found",
                self.to_string(),
            ),
            AppError::TemplateRender(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "template_render_failed",
                self.to_string(),
            ),
            AppError::MjmlCompile(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "mjml_compile_failed",
                self.to_string(),
            ),
            AppError::InvalidAddress(_) => {
                (StatusCode::BAD_REQUEST, "invalid_address", self.to_string())
            }
            AppError::AttachmentNotFound(_) => (
                StatusCode::NOT_FOUND,
                "attachment_not_found",
                self.to_string(),
            ),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Configuration(ref detail) => {
                tracing::error!(error = %detail, "configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Smtp(ref detail) => {
                // Log the transport detail server-side, hide it from the client
                tracing::error!(error = %detail, "SMTP delivery failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "delivery_failed",
                    "Email delivery failed".to_string(),
                )
            }
            AppError::Io(ref err) => {
                tracing::error!(error = %err, "I/O error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}
