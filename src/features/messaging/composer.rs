//! # Feature: Message Composition
//!
//! Builds the outbound payload for a (speaker, kind) pair. Template mode
//! references the pre-approved content SIDs with positional variables;
//! free-text mode interpolates the same fields into hardcoded Spanish
//! bodies. The mode is one global switch, not per-message.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Single exhaustive match over MessageKind
//! - 1.0.0: Initial release

use serde_json::json;

use crate::core::config::TwilioConfig;
use crate::core::error::ConfigError;
use crate::features::messaging::{MessageContent, MessageKind, OutboundMessage};
use crate::features::speakers::Speaker;

/// Compose the payload for one message.
///
/// Failing to find a configured template is a configuration error (the kind
/// of thing `Config::validate` catches at startup), not a runtime condition.
pub fn compose(
    kind: MessageKind,
    speaker: &Speaker,
    twilio: &TwilioConfig,
) -> Result<OutboundMessage, ConfigError> {
    let to = format!("whatsapp:{}", speaker.formatted_phone());

    let content = if twilio.use_templates {
        template_content(kind, speaker, twilio)?
    } else {
        MessageContent::Text(text_body(kind, speaker))
    };

    Ok(OutboundMessage { to, content })
}

fn template_content(
    kind: MessageKind,
    speaker: &Speaker,
    twilio: &TwilioConfig,
) -> Result<MessageContent, ConfigError> {
    // The day-of message reuses the reminder template with "HOY" as the date.
    let (sid, date_var) = match kind {
        MessageKind::Notification => (
            twilio
                .notification_template
                .as_deref()
                .ok_or(ConfigError::MissingTemplate("notification"))?,
            speaker.formatted_date(),
        ),
        MessageKind::Reminder => (
            twilio
                .reminder_template
                .as_deref()
                .ok_or(ConfigError::MissingTemplate("reminder"))?,
            speaker.formatted_date(),
        ),
        MessageKind::DayOf => (
            twilio
                .reminder_template
                .as_deref()
                .ok_or(ConfigError::MissingTemplate("reminder"))?,
            "HOY".to_string(),
        ),
    };

    Ok(MessageContent::Template {
        content_sid: sid.to_string(),
        variables: json!({ "1": speaker.name, "2": date_var }).to_string(),
    })
}

fn text_body(kind: MessageKind, speaker: &Speaker) -> String {
    match kind {
        MessageKind::Notification => format!(
            "Hola {}, te confirmamos que el {} predicarás. \
             ¡Que Dios te bendiga en tu preparación!",
            speaker.name,
            speaker.formatted_date()
        ),
        MessageKind::Reminder => format!(
            "Hola {}, te recordamos que próximamente ({}) predicarás. \
             ¡Prepárate en oración!",
            speaker.name,
            speaker.formatted_date()
        ),
        MessageKind::DayOf => format!(
            "¡Hola {}! 🎤 HOY es tu día de predicación. \
             ¡Que Dios te use poderosamente y bendiga tu mensaje! 🙏",
            speaker.name
        ),
    }
}
