//! Shared application state.
//!
//! Everything handlers need is bundled here and injected by Axum via
//! `State` extraction. Cloning is cheap: the transport pools internally
//! and the rest is behind `Arc`.

use std::sync::Arc;

use crate::config::Config;
use crate::services::render_service::RenderService;
use crate::smtp::Mailer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded environment configuration
    pub config: Arc<Config>,

    /// Pooled async SMTP transport
    pub mailer: Mailer,

    /// MJML + Jinja template renderer
    pub renderer: Arc<RenderService>,
}
