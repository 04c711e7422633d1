//! Email API request/response types.
//!
//! This module defines:
//! - `SendEmailRequest` / `SendEmailResponse`: single templated send
//! - `SendBulkRequest` / `BulkSendReport`: personalized bulk send
//! - `PreviewRequest` / `PreviewResponse`: template dry-run
//! - `TemplateInfo`: template directory listing entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Request body for sending a single templated email.
///
/// # JSON Example
///
/// ```json
/// {
///   "to": "user@example.com",
///   "subject": "Welcome aboard",
///   "template": "welcome.mjml",
///   "variables": { "name": "Ada", "activation_code": "ABC123" },
///   "cc": ["manager@example.com"],
///   "attachments": ["terms.pdf"]
/// }
/// ```
///
/// # Validation
///
/// - `to`: Required, must parse as an email address
/// - `subject`: Required; may contain `{{ variable }}` placeholders
/// - `template`: Required, name of an `.mjml` file in the template directory
/// - `variables`: Optional, arbitrary JSON object interpolated into the template
/// - `cc` / `bcc`: Optional recipient lists
/// - `attachments`: Optional file names resolved under the attachment directory
#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailRequest {
    /// Recipient address
    pub to: String,

    /// Subject line (rendered with the same variables as the body)
    pub subject: String,

    /// Template file name, e.g. "welcome.mjml"
    pub template: String,

    /// Variables interpolated into the template
    #[serde(default)]
    pub variables: Map<String, Value>,

    /// Carbon-copy recipients
    #[serde(default)]
    pub cc: Vec<String>,

    /// Blind-carbon-copy recipients
    #[serde(default)]
    pub bcc: Vec<String>,

    /// Attachment file names, resolved under ATTACHMENT_DIR
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Response body after a successful send.
#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    /// Server-generated delivery identifier (for log correlation)
    pub delivery_id: Uuid,

    /// Recipient the message was submitted for
    pub to: String,

    /// Template that produced the body
    pub template: String,

    /// Submission timestamp
    pub sent_at: DateTime<Utc>,
}

/// One recipient in a bulk send, with their personal template variables.
///
/// # JSON Example
///
/// ```json
/// { "email": "ada@example.com", "variables": { "name": "Ada", "balance": "1,250.00" } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct BulkRecipient {
    /// Recipient address
    pub email: String,

    /// Variables for this recipient (body and subject)
    #[serde(default)]
    pub variables: Map<String, Value>,
}

/// Request body for a personalized bulk send.
///
/// All recipients share the template, subject template, and attachments;
/// each recipient's variables are rendered independently.
#[derive(Debug, Clone, Deserialize)]
pub struct SendBulkRequest {
    /// Recipients with their per-recipient variables
    pub recipients: Vec<BulkRecipient>,

    /// Shared subject line; `{{ variable }}` placeholders are rendered per recipient
    pub subject: String,

    /// Template file name shared by all recipients
    pub template: String,

    /// Attachment file names shared by all recipients
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Outcome of a bulk send, classifying recipients by delivery result.
///
/// # JSON Example
///
/// ```json
/// {
///   "success": ["ada@example.com", "grace@example.com"],
///   "failed": ["bad-address"]
/// }
/// ```
#[derive(Debug, Default, Serialize)]
pub struct BulkSendReport {
    /// Addresses whose messages were submitted to the relay
    pub success: Vec<String>,

    /// Addresses whose messages failed to render or submit
    pub failed: Vec<String>,
}

/// Request body for rendering a template without sending.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    /// Template file name
    pub template: String,

    /// Variables interpolated into the template
    #[serde(default)]
    pub variables: Map<String, Value>,
}

/// Rendered template preview.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    /// Template that was rendered
    pub template: String,

    /// Compiled responsive HTML
    pub html: String,
}

/// One entry in the template directory listing.
#[derive(Debug, Serialize)]
pub struct TemplateInfo {
    /// Template file name, usable in send requests
    pub name: String,

    /// Size of the template source in bytes
    pub size_bytes: u64,
}
