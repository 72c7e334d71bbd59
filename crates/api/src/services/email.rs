//! Email notifications for group invitations.
//!
//! Supported providers:
//! - `console`: Logs emails instead of sending (development)
//! - `sendgrid`: Uses the SendGrid v3 API

use crate::config::EmailConfig;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_text: String,
}

/// Email service for sending transactional notifications.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: reqwest::Client,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Sends a notification about a new group invitation.
    ///
    /// Failure is logged but never surfaced to the caller; the invite is
    /// already persisted and the recipient can still see it in-app.
    pub async fn send_invite_notification(
        &self,
        to_email: &str,
        group_name: &str,
        inviter_name: &str,
        invite_url: &str,
    ) {
        let message = EmailMessage {
            to: to_email.to_string(),
            subject: format!("{} invited you to join {}", inviter_name, group_name),
            body_text: format!(
                r#"Hi,

{inviter} has invited you to join the group "{group}" on SplitLedger.

Open the link below to accept or decline:

{url}

This invitation expires in 7 days.

Best regards,
The SplitLedger Team"#,
                inviter = inviter_name,
                group = group_name,
                url = invite_url
            ),
        };

        if let Err(e) = self.send(message).await {
            error!(to = %to_email, error = %e, "Failed to send invite notification");
        }
    }

    /// Send an email message via the configured provider.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message),
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Console provider - logs the message instead of sending.
    fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            from = %self.config.sender_email,
            from_name = %self.config.sender_name,
            "Email (console provider)"
        );
        info!(body_text = %message.body_text, "Email body");
        Ok(())
    }

    /// SendGrid provider - sends via the v3 mail API.
    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let payload = json!({
            "personalizations": [{
                "to": [{"email": message.to}]
            }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": message.subject,
            "content": [{
                "type": "text/plain",
                "value": message.body_text
            }]
        });

        let response = self
            .client
            .post("https://api.sendgrid.com/v3/mail/send")
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(EmailError::SendFailed(format!(
                "SendGrid returned status {}",
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(enabled: bool, provider: &str) -> EmailConfig {
        EmailConfig {
            enabled,
            provider: provider.to_string(),
            sendgrid_api_key: String::new(),
            sender_email: "test@example.com".to_string(),
            sender_name: "Test".to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_send_disabled_is_noop() {
        let service = EmailService::new(test_config(false, "sendgrid"));
        let result = service
            .send(EmailMessage {
                to: "user@example.com".to_string(),
                subject: "Test".to_string(),
                body_text: "body".to_string(),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_console_succeeds() {
        let service = EmailService::new(test_config(true, "console"));
        let result = service
            .send(EmailMessage {
                to: "user@example.com".to_string(),
                subject: "Test".to_string(),
                body_text: "body".to_string(),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_unknown_provider_fails() {
        let service = EmailService::new(test_config(true, "carrier-pigeon"));
        let result = service
            .send(EmailMessage {
                to: "user@example.com".to_string(),
                subject: "Test".to_string(),
                body_text: "body".to_string(),
            })
            .await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_sendgrid_without_key_fails() {
        let service = EmailService::new(test_config(true, "sendgrid"));
        let result = service
            .send(EmailMessage {
                to: "user@example.com".to_string(),
                subject: "Test".to_string(),
                body_text: "body".to_string(),
            })
            .await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }
}
