//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `API_KEY` (required): key clients must present on `/api/v1` routes
/// - `SMTP_HOST` (required): SMTP relay hostname (e.g. `smtp.gmail.com`)
/// - `SMTP_PORT` (optional): SMTP port, defaults to 587
/// - `SMTP_USERNAME` / `SMTP_PASSWORD` (optional): relay credentials
/// - `SMTP_USE_TLS` (optional): STARTTLS when true (default), implicit TLS when false
/// - `FROM_EMAIL` (optional): sender address, defaults to `SMTP_USERNAME`
/// - `FROM_NAME` (optional): display name for the sender
/// - `TEMPLATE_DIR` (optional): MJML template directory, defaults to `templates`
/// - `ATTACHMENT_DIR` (optional): attachment file directory, defaults to `attachments`
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `APP_ENV` (optional): deployment environment, defaults to "production"
/// - `LOGGER_MIDDLEWARE` (optional): force-enable the request logger outside production
/// - `LOGGER_MIDDLEWARE_SHOW_HEADERS` (optional): include request headers in the log
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_key: String,

    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    pub smtp_username: Option<String>,

    pub smtp_password: Option<String>,

    #[serde(default = "default_true")]
    pub smtp_use_tls: bool,

    pub from_email: Option<String>,

    pub from_name: Option<String>,

    #[serde(default = "default_template_dir")]
    pub template_dir: String,

    #[serde(default = "default_attachment_dir")]
    pub attachment_dir: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_app_env")]
    pub app_env: String,

    #[serde(default)]
    pub logger_middleware: bool,

    #[serde(default)]
    pub logger_middleware_show_headers: bool,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

/// Default submission port (STARTTLS).
fn default_smtp_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

fn default_template_dir() -> String {
    "templates".to_string()
}

fn default_attachment_dir() -> String {
    "attachments".to_string()
}

fn default_app_env() -> String {
    "production".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., SMTP_HOST, API_KEY)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: smtp_host -> SMTP_HOST
        envy::from_env::<Config>()
    }

    /// The sender address used when a request does not override it.
    ///
    /// Falls back to the SMTP username, matching how most relays expect the
    /// envelope sender to match the authenticated user.
    pub fn sender_email(&self) -> Option<&str> {
        self.from_email
            .as_deref()
            .or(self.smtp_username.as_deref())
    }

    /// Whether the request logger middleware should be mounted.
    ///
    /// Always on in production; opt-in elsewhere via LOGGER_MIDDLEWARE.
    pub fn request_logging_enabled(&self) -> bool {
        self.app_env == "production" || self.logger_middleware
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> Config {
        Config {
            api_key: "secret".into(),
            smtp_host: "smtp.example.com".into(),
            smtp_port: 587,
            smtp_username: Some("mailer@example.com".into()),
            smtp_password: Some("hunter2".into()),
            smtp_use_tls: true,
            from_email: None,
            from_name: None,
            template_dir: "templates".into(),
            attachment_dir: "attachments".into(),
            server_port: 3000,
            app_env: "development".into(),
            logger_middleware: false,
            logger_middleware_show_headers: false,
        }
    }

    #[test]
    fn sender_falls_back_to_smtp_username() {
        let config = minimal();
        assert_eq!(config.sender_email(), Some("mailer@example.com"));

        let mut overridden = minimal();
        overridden.from_email = Some("no-reply@example.com".into());
        assert_eq!(overridden.sender_email(), Some("no-reply@example.com"));
    }

    #[test]
    fn request_logging_forced_in_production() {
        let mut config = minimal();
        config.app_env = "production".into();
        assert!(config.request_logging_enabled());

        config.app_env = "development".into();
        assert!(!config.request_logging_enabled());

        config.logger_middleware = true;
        assert!(config.request_logging_enabled());
    }
}
