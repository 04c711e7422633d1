//! Mailcourier - Main Application Entry Point
//!
//! This is a REST API server for sending MJML-templated emails over SMTP. It renders Jinja variables into MJML templates, compiles them to responsive HTML, and submits the result through an async SMTP transport, with support for attachments and personalized bulk sends.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Email**: lettre (pooled async SMTP transport)
//! - **Templating**: minijinja (variables) + mrml (MJML to HTML)
//! - **Authentication**: API key with SHA-256 digest comparison
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Build the SMTP transport and check relay connectivity
//! 3. Set up the template renderer
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;
mod smtp;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::services::render_service::RenderService;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Build the SMTP transport
    let mailer = smtp::create_transport(&config)?;
    tracing::info!(host = %config.smtp_host, port = config.smtp_port, "SMTP transport ready");

    // Check relay connectivity once at startup; a cold relay is worth a
    // warning but should not keep the service from starting
    if smtp::verify_connection(&mailer).await {
        tracing::info!("SMTP relay reachable");
    } else {
        tracing::warn!("SMTP relay not reachable at startup");
    }

    // Set up the template renderer
    let renderer = RenderService::new(&config.template_dir);
    tracing::info!(dir = %config.template_dir, "Template renderer ready");

    let state = AppState {
        config: Arc::new(config),
        mailer,
        renderer: Arc::new(renderer),
    };

    // Create authenticated routes (API endpoints)
    let authenticated_routes = Router::new()
        // Email routes
        .route("/api/v1/emails/send", post(handlers::emails::send_email))
        .route(
            "/api/v1/emails/send-bulk",
            post(handlers::emails::send_bulk_emails),
        )
        .route(
            "/api/v1/emails/preview",
            post(handlers::emails::preview_template),
        )
        // Template routes
        .route("/api/v1/templates", get(handlers::templates::list_templates))
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    // Combine authenticated routes with public routes
    let mut app = Router::new()
        // Public routes (no authentication required)
        .route("/health", get(handlers::health::health_check))
        // Merge authenticated routes
        .merge(authenticated_routes);

    // Request logger: always on in production, opt-in elsewhere
    if state.config.request_logging_enabled() {
        app = app.layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::request_log::request_log_middleware,
        ));
    }

    let app = app
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share state with all handlers via State extraction
        .with_state(state.clone());

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", state.config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio.
    // Connect info gives the request logger the client address.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
