//! Email sending HTTP handlers.
//!
//! This module implements the email-related API endpoints:
//! - POST /api/v1/emails/send - Send a single templated email
//! - POST /api/v1/emails/send-bulk - Send personalized emails to many recipients
//! - POST /api/v1/emails/preview - Render a template without sending

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    models::email::{
        BulkSendReport, PreviewRequest, PreviewResponse, SendBulkRequest, SendEmailRequest,
        SendEmailResponse,
    },
    services::email_service,
    state::AppState,
};

/// Send a single templated email.
///
/// # Endpoint
///
/// `POST /api/v1/emails/send`
///
/// # Authentication
///
/// Requires valid API key in Authorization header.
///
/// # Request Body
///
/// ```json
/// {
///   "to": "user@example.com",
///   "subject": "Welcome, {{ name }}",
///   "template": "welcome.mjml",
///   "variables": { "name": "Ada", "activation_code": "ABC123" },
///   "attachments": ["terms.pdf"]
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: Delivery id, recipient, template, timestamp
/// - **Error (400)**: Invalid address in to/cc/bcc
/// - **Error (404)**: Unknown template or attachment
/// - **Error (422)**: Template render or MJML compile failure
/// - **Error (500)**: SMTP submission failure
pub async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, AppError> {
    let response = email_service::send_email(&state, request).await?;
    Ok(Json(response))
}

/// Send personalized emails to many recipients.
///
/// # Endpoint
///
/// `POST /api/v1/emails/send-bulk`
///
/// # Request Body
///
/// ```json
/// {
///   "recipients": [
///     { "email": "ada@example.com", "variables": { "name": "Ada" } },
///     { "email": "grace@example.com", "variables": { "name": "Grace" } }
///   ],
///   "subject": "Statement for {{ name }}",
///   "template": "statement.mjml",
///   "attachments": ["terms.pdf"]
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: Report with `success` and `failed` address lists.
///   Per-recipient failures land in `failed`; an empty recipient list
///   yields an empty report.
pub async fn send_bulk_emails(
    State(state): State<AppState>,
    Json(request): Json<SendBulkRequest>,
) -> Result<Json<BulkSendReport>, AppError> {
    let report = email_service::send_bulk(&state, request).await?;
    Ok(Json(report))
}

/// Render a template to HTML without sending anything.
///
/// # Endpoint
///
/// `POST /api/v1/emails/preview`
///
/// Runs the same render pipeline as a real send (Jinja interpolation,
/// MJML compilation), useful for checking a template before a campaign.
pub async fn preview_template(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let html = state.renderer.render(&request.template, &request.variables)?;

    Ok(Json(PreviewResponse {
        template: request.template,
        html,
    }))
}
