//! # Core Module
//!
//! Configuration, error taxonomy, and date arithmetic for the reminder system.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Split error taxonomy out of config into its own module
//! - 1.0.0: Initial creation with config and dates modules

pub mod config;
pub mod dates;
pub mod error;

// Re-export commonly used items
pub use config::{BusinessConfig, Config, SheetsConfig, TwilioConfig};
pub use error::{ConfigError, StoreError, TransportError, ValidationError};
