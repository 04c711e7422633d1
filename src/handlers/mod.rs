//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Performs business logic (rendering, SMTP submission)
//! 3. Returns HTTP response (JSON, status code)

/// Email send, bulk send, and preview endpoints
pub mod emails;
/// Health check endpoint
pub mod health;
/// Template listing endpoint
pub mod templates;
