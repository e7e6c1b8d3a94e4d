//! # Configuration
//!
//! Environment-driven configuration split into Twilio, Sheets, and business
//! sections. Built once at startup and passed explicitly to every component
//! that needs it; missing required variables fail fast with the full list.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: GOOGLE_API_TOKEN required (native Sheets REST client)
//! - 1.1.0: Template SIDs validated when template mode is on
//! - 1.0.0: Initial release

use serde::Serialize;

use crate::core::error::ConfigError;

/// WhatsApp sandbox number Twilio assigns to every account.
const TWILIO_SANDBOX_FROM: &str = "whatsapp:+14155238886";

/// Twilio credentials and message-mode settings.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    /// Sandbox accounts must send pre-approved templates; production
    /// accounts may send free text inside the 24h session window.
    pub use_templates: bool,
    pub notification_template: Option<String>,
    pub reminder_template: Option<String>,
}

/// Google Sheets access settings.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub sheet_id: String,
    pub range: String,
    /// OAuth bearer token provisioned by the environment (the deployment
    /// refreshes it outside this process).
    pub api_token: String,
}

/// Business policy constants. Fixed configuration, not CLI-tunable.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessConfig {
    /// Upper bound of the advance-reminder window, in days before the date.
    pub reminder_days_limit: i64,
    /// Minimum days between reminders to the same speaker.
    pub cooldown_days: i64,
    /// Cell value meaning "already notified", compared case-insensitively.
    pub yes_marker: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        BusinessConfig {
            reminder_days_limit: 15,
            cooldown_days: 7,
            yes_marker: "sí".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub twilio: TwilioConfig,
    pub sheets: SheetsConfig,
    pub business: BusinessConfig,
    pub log_level: String,
}

impl Config {
    /// Build configuration from environment variables.
    ///
    /// Collects every missing required variable before failing so a broken
    /// deployment surfaces all problems in one log line.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut missing = Vec::new();

        let account_sid = require_env("TW_SID", &mut missing);
        let auth_token = require_env("TW_TOKEN", &mut missing);
        let sheet_id = require_env("GOOGLE_SHEET_ID", &mut missing);
        let api_token = require_env("GOOGLE_API_TOKEN", &mut missing);

        if !missing.is_empty() {
            return Err(ConfigError::MissingEnvVars(missing));
        }

        let use_templates = std::env::var("USE_TWILIO_TEMPLATES")
            .map(|v| v == "true")
            .unwrap_or(false);

        let config = Config {
            twilio: TwilioConfig {
                account_sid,
                auth_token,
                from_number: TWILIO_SANDBOX_FROM.to_string(),
                use_templates,
                notification_template: std::env::var("TWILIO_TEMPLATE_NOTIFICACION").ok(),
                reminder_template: std::env::var("TWILIO_TEMPLATE_RECORDATORIO").ok(),
            },
            sheets: SheetsConfig {
                sheet_id,
                range: std::env::var("GOOGLE_SHEET_RANGE").unwrap_or_else(|_| "A:E".to_string()),
                api_token,
            },
            business: BusinessConfig::default(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field requirements: template mode needs both template SIDs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.twilio.use_templates {
            if self.twilio.notification_template.is_none() {
                return Err(ConfigError::MissingTemplate("notification"));
            }
            if self.twilio.reminder_template.is_none() {
                return Err(ConfigError::MissingTemplate("reminder"));
            }
        }
        Ok(())
    }
}

fn require_env(name: &str, missing: &mut Vec<String>) -> String {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            missing.push(name.to_string());
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            twilio: TwilioConfig {
                account_sid: "AC_test".to_string(),
                auth_token: "token".to_string(),
                from_number: TWILIO_SANDBOX_FROM.to_string(),
                use_templates: false,
                notification_template: None,
                reminder_template: None,
            },
            sheets: SheetsConfig {
                sheet_id: "sheet".to_string(),
                range: "A:E".to_string(),
                api_token: "bearer".to_string(),
            },
            business: BusinessConfig::default(),
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_business_defaults() {
        let business = BusinessConfig::default();
        assert_eq!(business.reminder_days_limit, 15);
        assert_eq!(business.cooldown_days, 7);
        assert_eq!(business.yes_marker, "sí");
    }

    #[test]
    fn test_free_text_mode_needs_no_templates() {
        let config = test_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_template_mode_requires_both_sids() {
        let mut config = test_config();
        config.twilio.use_templates = true;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingTemplate("notification"))
        ));

        config.twilio.notification_template = Some("HX_notif".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingTemplate("reminder"))
        ));

        config.twilio.reminder_template = Some("HX_rem".to_string());
        assert!(config.validate().is_ok());
    }
}
