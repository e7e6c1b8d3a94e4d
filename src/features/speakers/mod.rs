//! # Speakers Feature
//!
//! Typed, validated view over spreadsheet rows of scheduled speakers.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod record;

pub use record::Speaker;
