// Core layer - configuration, errors, and date arithmetic
pub mod core;

// Features layer - all feature modules
pub mod features;

// Re-export core config for convenience
pub use core::Config;

// Re-export feature items
pub use features::{
    // Messaging
    compose, MessageContent, MessageKind, MessageTransport, OutboundMessage, TwilioClient,
    // Pipeline
    ReminderEngine, RunStats,
    // Sheets
    GoogleSheetsClient, SheetRow, SpreadsheetStore,
    // Speakers
    Speaker,
};
