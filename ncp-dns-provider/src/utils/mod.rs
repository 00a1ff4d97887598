//! Utility modules.

/// Zone and record-name helpers.
pub mod domain;

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;
