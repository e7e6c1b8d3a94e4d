//! # Pipeline Feature
//!
//! The three-pass reminder engine and its run statistics.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod engine;

pub use engine::{ReminderEngine, RunStats};
