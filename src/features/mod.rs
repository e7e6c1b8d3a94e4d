//! # Features Module
//!
//! Feature modules for the speaker reminder system. Each submodule owns one
//! concern: the speaker row model, message composition and transport, the
//! Google Sheets store, and the three-pass pipeline that ties them together.

pub mod messaging;
pub mod pipeline;
pub mod sheets;
pub mod speakers;

// Re-export the primary types of each feature
pub use messaging::{
    compose, MessageContent, MessageKind, MessageTransport, OutboundMessage, TwilioClient,
};
pub use pipeline::{ReminderEngine, RunStats};
pub use sheets::{GoogleSheetsClient, SheetRow, SpreadsheetStore};
pub use speakers::Speaker;
