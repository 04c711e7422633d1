//! Data models for API request and response bodies.

/// Email send, bulk send, and preview types
pub mod email;
