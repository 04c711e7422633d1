//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Authenticate requests
//! - Log requests
//! - Short-circuit requests (reject unauthorized)

/// API key authentication middleware
pub mod auth;

/// Request/response logging middleware
pub mod request_log;
