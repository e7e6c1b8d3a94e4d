//! # Feature: Twilio Transport
//!
//! WhatsApp delivery over the Twilio Messages REST API. One attempt per
//! message; every failure is reported to the caller and none are retried
//! here.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use async_trait::async_trait;
use log::{debug, error};
use serde::Serialize;

use crate::core::config::TwilioConfig;
use crate::core::error::TransportError;
use crate::features::messaging::{MessageContent, MessageTransport, OutboundMessage};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Result of a connectivity probe against the account endpoint.
#[derive(Debug, Serialize)]
pub struct TwilioProbe {
    pub success: bool,
    pub account_name: Option<String>,
    pub status: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct TwilioClient {
    http: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioClient {
    pub fn new(config: TwilioConfig) -> Self {
        TwilioClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.config.account_sid
        )
    }

    /// Fetch the account resource to verify credentials and reachability.
    pub async fn test_connection(&self) -> TwilioProbe {
        let url = format!(
            "{}/Accounts/{}.json",
            TWILIO_API_BASE, self.config.account_sid
        );

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                let body: serde_json::Value = match resp.json().await {
                    Ok(body) => body,
                    Err(e) => {
                        return TwilioProbe {
                            success: false,
                            account_name: None,
                            status: None,
                            error: Some(e.to_string()),
                        }
                    }
                };
                TwilioProbe {
                    success: true,
                    account_name: body
                        .get("friendly_name")
                        .and_then(|v| v.as_str())
                        .map(String::from),
                    status: body.get("status").and_then(|v| v.as_str()).map(String::from),
                    error: None,
                }
            }
            Ok(resp) => TwilioProbe {
                success: false,
                account_name: None,
                status: None,
                error: Some(format!("account fetch returned {}", resp.status())),
            },
            Err(e) => TwilioProbe {
                success: false,
                account_name: None,
                status: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Non-secret configuration snapshot for the diagnostic mode.
    pub fn diagnostic_info(&self) -> serde_json::Value {
        serde_json::json!({
            "configured": !self.config.account_sid.is_empty() && !self.config.auth_token.is_empty(),
            "use_templates": self.config.use_templates,
            "from_number": self.config.from_number,
            "templates": {
                "notification": self.config.notification_template,
                "reminder": self.config.reminder_template,
            },
            "account_sid": mask_sid(&self.config.account_sid),
        })
    }
}

#[async_trait]
impl MessageTransport for TwilioClient {
    async fn send(&self, message: &OutboundMessage) -> Result<String, TransportError> {
        let mut form: Vec<(&str, &str)> = vec![
            ("From", self.config.from_number.as_str()),
            ("To", message.to.as_str()),
        ];

        match &message.content {
            MessageContent::Text(body) => {
                debug!("sending free-text message to {}", message.to);
                form.push(("Body", body));
            }
            MessageContent::Template {
                content_sid,
                variables,
            } => {
                debug!("sending template {content_sid} to {}", message.to);
                form.push(("ContentSid", content_sid));
                form.push(("ContentVariables", variables));
            }
        }

        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TransportError::UnexpectedResponse(e.to_string()))?;

        if !status.is_success() {
            let api_message = body
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error")
                .to_string();
            error!("twilio rejected message to {}: {api_message}", message.to);
            return Err(TransportError::Api {
                status: status.as_u16(),
                message: api_message,
            });
        }

        body.get("sid")
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| TransportError::UnexpectedResponse("response missing sid".to_string()))
    }
}

fn mask_sid(sid: &str) -> String {
    if sid.is_empty() {
        "not configured".to_string()
    } else {
        format!("{}...", &sid[..sid.len().min(8)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_sid() {
        assert_eq!(mask_sid(""), "not configured");
        assert_eq!(mask_sid("AC12"), "AC12...");
        assert_eq!(mask_sid("AC1234567890"), "AC123456...");
    }

    #[test]
    fn test_diagnostic_info_masks_credentials() {
        let client = TwilioClient::new(TwilioConfig {
            account_sid: "AC1234567890".to_string(),
            auth_token: "secret".to_string(),
            from_number: "whatsapp:+14155238886".to_string(),
            use_templates: false,
            notification_template: None,
            reminder_template: None,
        });
        let info = client.diagnostic_info();
        assert_eq!(info["account_sid"], "AC123456...");
        assert_eq!(info["configured"], true);
        assert!(info.get("auth_token").is_none());
    }
}
