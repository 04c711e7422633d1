//! SMTP transport construction and connection checks.
//!
//! This module provides utilities for:
//! - Building a pooled async SMTP transport from configuration
//! - Verifying relay connectivity at startup and from the health endpoint

use lettre::{
    AsyncSmtpTransport, Tokio1Executor,
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};

use crate::config::Config;
use crate::error::AppError;

/// Type alias for the pooled async SMTP transport.
///
/// The transport keeps a pool of relay connections that are reused across
/// HTTP requests, which is much more efficient than opening a new SMTP
/// session for each email.
pub type Mailer = AsyncSmtpTransport<Tokio1Executor>;

/// Build the SMTP transport from configuration.
///
/// # TLS Modes
///
/// - `SMTP_USE_TLS=true` (default): mandatory STARTTLS upgrade, the port 587
///   submission flow
/// - `SMTP_USE_TLS=false`: plaintext connection with opportunistic STARTTLS —
///   the session upgrades only when the relay offers it, so a local test
///   relay without TLS still works
///
/// Credentials are attached only when both username and password are configured,
/// so unauthenticated relays work as well.
///
/// # Errors
///
/// Returns an error if the relay hostname is not valid for TLS setup.
pub fn create_transport(config: &Config) -> Result<Mailer, AppError> {
    let mut builder = if config.smtp_use_tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
    } else {
        let tls = TlsParameters::new(config.smtp_host.clone())?;
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            .tls(Tls::Opportunistic(tls))
    };

    builder = builder.port(config.smtp_port);

    if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
        builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
    }

    Ok(builder.build())
}

/// Verify that the relay accepts a connection (EHLO + optional auth).
///
/// Used by the health endpoint the same way the connection is checked
/// once at startup. A `false` result means the relay is unreachable or
/// rejected the credentials.
pub async fn verify_connection(mailer: &Mailer) -> bool {
    match mailer.test_connection().await {
        Ok(ok) => ok,
        Err(err) => {
            tracing::warn!(error = %err, "SMTP connection check failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(use_tls: bool) -> Config {
        Config {
            api_key: "secret".into(),
            smtp_host: "localhost".into(),
            smtp_port: if use_tls { 587 } else { 1025 },
            smtp_username: None,
            smtp_password: None,
            smtp_use_tls: use_tls,
            from_email: Some("no-reply@example.com".into()),
            from_name: None,
            template_dir: "templates".into(),
            attachment_dir: "attachments".into(),
            server_port: 3000,
            app_env: "development".into(),
            logger_middleware: false,
            logger_middleware_show_headers: false,
        }
    }

    #[tokio::test]
    async fn builds_starttls_transport() {
        assert!(create_transport(&config(true)).is_ok());
    }

    #[tokio::test]
    async fn builds_plaintext_transport_for_local_relays() {
        // use_tls=false must not demand TLS up front; a dev relay on
        // localhost:1025 speaks plaintext until STARTTLS is offered
        assert!(create_transport(&config(false)).is_ok());
    }
}
