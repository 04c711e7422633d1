//! API key authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the API key from the Authorization header
//! 2. Compare it against the configured key
//! 3. Reject unauthorized requests with HTTP 401

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::{error::AppError, state::AppState};

/// API key authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <key>` header from request
/// 2. Hash the presented key and the configured key with SHA-256
/// 3. Compare the digests; on match, call the next handler
/// 4. On mismatch or missing header, return 401 Unauthorized
///
/// # Headers
///
/// Expected header format:
/// ```text
/// Authorization: Bearer abc123xyz
/// ```
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Step 1: Extract Authorization header
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidApiKey)?;

    // Step 2: Extract Bearer token
    // Expected format: "Bearer <api_key>"
    let api_key = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::InvalidApiKey)?;

    // Step 3: Compare fixed-length digests instead of the raw strings,
    // so the comparison does not short-circuit on length
    if digest(api_key) != digest(&state.config.api_key) {
        return Err(AppError::InvalidApiKey);
    }

    // Step 4: Call the next middleware/handler
    Ok(next.run(request).await)
}

/// SHA-256 digest of a key, hex encoded.
fn digest(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digests_differ_per_key() {
        assert_eq!(digest("secret"), digest("secret"));
        assert_ne!(digest("secret"), digest("Secret"));
        // 32 bytes hex encoded
        assert_eq!(digest("secret").len(), 64);
    }
}
