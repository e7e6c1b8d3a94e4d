//! # Error Taxonomy
//!
//! Four error families with distinct blast radii: configuration errors abort
//! before any processing, store read errors abort the run, and everything
//! else is counted per record so one bad row never sinks the batch.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0

use thiserror::Error;

/// Fatal configuration problems, detected before any row is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEnvVars(Vec<String>),

    #[error("template for {0} messages not configured")]
    MissingTemplate(&'static str),
}

/// Per-record validation failures. A record carrying any of these is
/// excluded from all passes but left untouched in the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    MissingName,

    #[error("phone is required")]
    MissingPhone,

    #[error("date is missing or unparseable")]
    InvalidDate,
}

/// Message delivery failures. Never retried within a run; the record stays
/// eligible on the next scheduled invocation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("twilio api error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("twilio request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected twilio response: {0}")]
    UnexpectedResponse(String),
}

/// Spreadsheet access failures. A failed read is fatal for the run; a failed
/// write is counted and leaves the documented consistency gap (the message
/// was already delivered, the flags were not persisted).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sheets api error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("sheets request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("column \"{0}\" not found in sheet headers")]
    ColumnNotFound(String),

    #[error("unexpected sheets response: {0}")]
    UnexpectedResponse(String),
}
