//! Email composition and delivery service.
//!
//! This module turns a send request into a multipart MIME message and
//! submits it over the shared SMTP transport:
//!
//! 1. Render the template (and subject) with the request's variables
//! 2. Load attachments from the attachment directory
//! 3. Assemble the lettre message (From, To, CC, BCC, HTML body, attachments)
//! 4. Submit and return a delivery id for log correlation
//!
//! Bulk sends fan out one task per recipient and classify the results.

use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use lettre::{
    AsyncTransport,
    message::{Attachment, Mailbox, Message, MultiPart, SinglePart, header::ContentType},
};
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::models::email::{BulkSendReport, SendBulkRequest, SendEmailRequest, SendEmailResponse};
use crate::state::AppState;

/// An attachment read from disk, ready to be added to a message.
#[derive(Debug, Clone)]
pub struct LoadedAttachment {
    /// File name presented to the recipient
    pub filename: String,

    /// Content type guessed from the file name
    pub content_type: ContentType,

    /// Raw file bytes
    pub data: Vec<u8>,
}

/// Send a single templated email.
///
/// # Process
///
/// 1. Render subject and body with the request variables
/// 2. Load attachments from ATTACHMENT_DIR
/// 3. Build the multipart message and submit it to the relay
///
/// # Errors
///
/// Rendering, address parsing, attachment lookup, and SMTP submission
/// errors all propagate; see [`AppError`] for the status mapping.
pub async fn send_email(
    state: &AppState,
    request: SendEmailRequest,
) -> Result<SendEmailResponse, AppError> {
    let delivery_id = Uuid::new_v4();

    // Render subject and body
    let subject = state
        .renderer
        .render_subject(&request.subject, &request.variables)?;
    let html = state.renderer.render(&request.template, &request.variables)?;

    // Load attachments from disk
    let attachments = load_attachments(&state.config, &request.attachments).await?;

    // Assemble and submit
    let message = build_message(
        &state.config,
        &request.to,
        &request.cc,
        &request.bcc,
        &subject,
        html,
        &attachments,
    )?;

    state.mailer.send(message).await?;

    tracing::info!(
        delivery_id = %delivery_id,
        to = %request.to,
        template = %request.template,
        "email submitted"
    );

    Ok(SendEmailResponse {
        delivery_id,
        to: request.to,
        template: request.template,
        sent_at: Utc::now(),
    })
}

/// Send personalized emails to many recipients concurrently.
///
/// Each recipient gets the shared template rendered with their own
/// variables; the subject template is rendered per recipient as well.
/// One recipient's failure never aborts the batch: failures are logged
/// and reported in the `failed` list. An empty recipient list yields
/// an empty report.
pub async fn send_bulk(
    state: &AppState,
    request: SendBulkRequest,
) -> Result<BulkSendReport, AppError> {
    let mut tasks = JoinSet::new();

    for recipient in request.recipients {
        let state = state.clone();
        let send_request = SendEmailRequest {
            to: recipient.email.clone(),
            subject: request.subject.clone(),
            template: request.template.clone(),
            variables: recipient.variables,
            cc: Vec::new(),
            bcc: Vec::new(),
            attachments: request.attachments.clone(),
        };

        tasks.spawn(async move {
            let outcome = send_email(&state, send_request).await;
            (recipient.email, outcome)
        });
    }

    // Classify results as tasks finish
    let mut report = BulkSendReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((email, Ok(_))) => report.success.push(email),
            Ok((email, Err(err))) => {
                tracing::warn!(to = %email, error = %err, "bulk recipient failed");
                report.failed.push(email);
            }
            Err(err) => {
                tracing::error!(error = %err, "bulk send task panicked");
            }
        }
    }

    tracing::info!(
        sent = report.success.len(),
        failed = report.failed.len(),
        "bulk send complete"
    );

    Ok(report)
}

/// Build the multipart MIME message.
///
/// The body is a `multipart/mixed` container holding the HTML part and
/// any attachments, matching what mail clients expect for HTML mail
/// with files attached.
pub fn build_message(
    config: &Config,
    to: &str,
    cc: &[String],
    bcc: &[String],
    subject: &str,
    html: String,
    attachments: &[LoadedAttachment],
) -> Result<Message, AppError> {
    let mut builder = Message::builder()
        .from(sender_mailbox(config)?)
        .to(to.parse::<Mailbox>()?)
        .subject(subject);

    for address in cc {
        builder = builder.cc(address.parse::<Mailbox>()?);
    }
    for address in bcc {
        builder = builder.bcc(address.parse::<Mailbox>()?);
    }

    let mut body = MultiPart::mixed().singlepart(SinglePart::html(html));
    for attachment in attachments {
        body = body.singlepart(
            Attachment::new(attachment.filename.clone())
                .body(attachment.data.clone(), attachment.content_type.clone()),
        );
    }

    Ok(builder.multipart(body)?)
}

/// The configured sender as a lettre mailbox.
///
/// Uses `"Name <address>"` form when FROM_NAME is set, the bare address
/// otherwise.
fn sender_mailbox(config: &Config) -> Result<Mailbox, AppError> {
    let address = config
        .sender_email()
        .ok_or_else(|| AppError::Configuration("no sender address configured".to_string()))?;

    Ok(Mailbox::new(
        config.from_name.clone(),
        address.parse::<lettre::Address>()?,
    ))
}

/// Load the named attachment files from the attachment directory.
async fn load_attachments(
    config: &Config,
    names: &[String],
) -> Result<Vec<LoadedAttachment>, AppError> {
    let mut loaded = Vec::with_capacity(names.len());

    for name in names {
        let path = resolve_attachment_path(&config.attachment_dir, name)?;

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::AttachmentNotFound(name.clone()));
            }
            Err(err) => return Err(err.into()),
        };

        let mime = mime_guess::from_path(name).first_or_octet_stream();
        let content_type = ContentType::parse(mime.as_ref()).unwrap_or(ContentType::TEXT_PLAIN);

        loaded.push(LoadedAttachment {
            filename: name.clone(),
            content_type,
            data,
        });
    }

    Ok(loaded)
}

/// Resolve an attachment name inside the attachment directory.
///
/// Names must be plain relative paths. Absolute paths and `..`
/// components are rejected so requests cannot read files outside
/// ATTACHMENT_DIR.
fn resolve_attachment_path(dir: &str, name: &str) -> Result<PathBuf, AppError> {
    let relative = Path::new(name);

    let plain = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if !plain {
        return Err(AppError::InvalidRequest(format!(
            "invalid attachment name: {name}"
        )));
    }

    Ok(Path::new(dir).join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::email::BulkRecipient;
    use crate::services::render_service::RenderService;
    use serde_json::Map;
    use std::sync::Arc;

    fn config() -> Config {
        Config {
            api_key: "secret".into(),
            smtp_host: "smtp.example.com".into(),
            smtp_port: 587,
            smtp_username: Some("mailer@example.com".into()),
            smtp_password: Some("hunter2".into()),
            smtp_use_tls: true,
            from_email: Some("no-reply@example.com".into()),
            from_name: Some("Example Mailer".into()),
            template_dir: "templates".into(),
            attachment_dir: "attachments".into(),
            server_port: 3000,
            app_env: "development".into(),
            logger_middleware: false,
            logger_middleware_show_headers: false,
        }
    }

    #[test]
    fn builds_multipart_message() {
        let attachment = LoadedAttachment {
            filename: "terms.pdf".into(),
            content_type: ContentType::parse("application/pdf").unwrap(),
            data: b"%PDF-1.4".to_vec(),
        };

        let message = build_message(
            &config(),
            "user@example.com",
            &["copy@example.com".into()],
            &[],
            "Welcome aboard",
            "<html><body>Hello</body></html>".into(),
            &[attachment],
        )
        .unwrap();

        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("Subject: Welcome aboard"));
        assert!(raw.contains("user@example.com"));
        assert!(raw.contains("no-reply@example.com"));
        assert!(raw.contains("copy@example.com"));
        assert!(raw.contains("terms.pdf"));
    }

    #[test]
    fn rejects_invalid_recipient() {
        let err = build_message(
            &config(),
            "not an address",
            &[],
            &[],
            "Subject",
            "<html></html>".into(),
            &[],
        )
        .unwrap_err();

        assert!(matches!(err, AppError::InvalidAddress(_)));
    }

    #[test]
    fn sender_uses_display_name() {
        let mailbox = sender_mailbox(&config()).unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("Example Mailer"));
        assert_eq!(mailbox.email.to_string(), "no-reply@example.com");
    }

    const GREETING: &str = "<mjml><mj-body><mj-section><mj-column>\
        <mj-text>Hello {{ name }}!</mj-text>\
        </mj-column></mj-section></mj-body></mjml>";

    /// State with a real renderer and a transport that is never reached:
    /// every test recipient fails before SMTP submission.
    fn test_state(template_dir: &Path) -> AppState {
        let mut config = config();
        config.template_dir = template_dir.to_string_lossy().into_owned();

        AppState {
            mailer: crate::smtp::create_transport(&config).unwrap(),
            renderer: Arc::new(RenderService::new(template_dir)),
            config: Arc::new(config),
        }
    }

    fn template_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mailcourier-bulk-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("greeting.mjml"), GREETING).unwrap();
        dir
    }

    #[tokio::test]
    async fn bulk_send_classifies_failures_without_aborting() {
        let dir = template_dir();
        let state = test_state(&dir);

        // Both recipients fail at message assembly (invalid addresses);
        // the batch must still complete and classify each one
        let request = SendBulkRequest {
            recipients: vec![
                BulkRecipient {
                    email: "not an address".into(),
                    variables: Map::new(),
                },
                BulkRecipient {
                    email: "also not an address".into(),
                    variables: Map::new(),
                },
            ],
            subject: "Hello {{ name }}".into(),
            template: "greeting.mjml".into(),
            attachments: Vec::new(),
        };

        let report = send_bulk(&state, request).await.unwrap();

        assert!(report.success.is_empty());
        assert_eq!(report.failed.len(), 2);
        assert!(report.failed.contains(&"not an address".to_string()));
        assert!(report.failed.contains(&"also not an address".to_string()));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn bulk_send_with_no_recipients_is_an_empty_report() {
        let dir = template_dir();
        let state = test_state(&dir);

        let request = SendBulkRequest {
            recipients: Vec::new(),
            subject: "Hello".into(),
            template: "greeting.mjml".into(),
            attachments: Vec::new(),
        };

        let report = send_bulk(&state, request).await.unwrap();
        assert!(report.success.is_empty());
        assert!(report.failed.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn attachment_names_cannot_escape_directory() {
        assert!(resolve_attachment_path("attachments", "../secrets.txt").is_err());
        assert!(resolve_attachment_path("attachments", "/etc/passwd").is_err());

        let path = resolve_attachment_path("attachments", "invoice.pdf").unwrap();
        assert_eq!(path, Path::new("attachments").join("invoice.pdf"));
    }
}
