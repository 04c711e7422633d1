//! Template listing HTTP handler.

use axum::{Json, extract::State};

use crate::{error::AppError, models::email::TemplateInfo, state::AppState};

/// List the MJML templates available for sending.
///
/// # Endpoint
///
/// `GET /api/v1/templates`
///
/// # Response (200 OK)
///
/// ```json
/// [
///   { "name": "statement.mjml", "size_bytes": 1843 },
///   { "name": "welcome.mjml", "size_bytes": 1210 }
/// ]
/// ```
pub async fn list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<TemplateInfo>>, AppError> {
    Ok(Json(state.renderer.list_templates()?))
}
