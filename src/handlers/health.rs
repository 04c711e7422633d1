//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{smtp, state::AppState};

/// Health check response.
///
/// Returns service status and SMTP relay connectivity.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// SMTP relay connection status
    pub smtp: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Checks
///
/// - SMTP relay connectivity (opens a session and says EHLO)
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "smtp": "connected",
///   "timestamp": "2026-08-30T19:00:00Z"
/// }
/// ```
///
/// The endpoint always answers 200 so monitors can distinguish "service
/// down" from "relay unreachable"; the latter is reported as "degraded".
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = smtp::verify_connection(&state.mailer).await;

    let (status, smtp) = if connected {
        ("healthy", "connected")
    } else {
        ("degraded", "unreachable")
    };

    Json(HealthResponse {
        status: status.to_string(),
        smtp: smtp.to_string(),
        timestamp: Utc::now(),
    })
}
