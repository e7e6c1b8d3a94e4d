//! # Messaging Feature
//!
//! Message kinds, payload composition, and WhatsApp delivery via Twilio.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Replaced strategy objects with a tagged MessageKind union
//! - 1.0.0: Initial release

pub mod composer;
pub mod twilio;

pub use composer::compose;
pub use twilio::TwilioClient;

use async_trait::async_trait;

use crate::core::error::TransportError;

/// The three kinds of outbound message, each with its own composition rule
/// and write-back semantics (only `Notification` also sets the notified flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// First-contact message confirming the assigned date.
    Notification,
    /// Message sent inside the advance window before the date.
    Reminder,
    /// Message sent the day the speaker preaches.
    DayOf,
}

impl MessageKind {
    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            MessageKind::Notification => "notification",
            MessageKind::Reminder => "reminder",
            MessageKind::DayOf => "day-of",
        }
    }
}

/// Body content: a pre-approved template reference or free text, selected by
/// one global configuration switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Template {
        content_sid: String,
        /// Positional variables as the JSON string the API expects.
        variables: String,
    },
    Text(String),
}

/// A fully composed message ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Channel-prefixed destination, e.g. `whatsapp:+573001234567`.
    pub to: String,
    pub content: MessageContent,
}

/// One-shot message delivery. Implementations report every failure and
/// retry nothing; the pipeline decides what a failure means.
#[async_trait]
pub trait MessageTransport {
    /// Send one message, returning the provider's delivery id.
    async fn send(&self, message: &OutboundMessage) -> Result<String, TransportError>;
}
