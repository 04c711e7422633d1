//! Business logic services.
//!
//! Services contain core email logic separated from HTTP handlers.
//! They handle template rendering, message assembly, and SMTP submission.

pub mod email_service;
pub mod render_service;
