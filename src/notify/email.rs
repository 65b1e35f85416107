use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Email service identifiers. All three are required for sends; absence
/// is detected at call time, not at startup.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EmailConfig {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub public_key: String,
}

impl EmailConfig {
    pub fn is_complete(&self) -> bool {
        !self.service_id.is_empty() && !self.template_id.is_empty() && !self.public_key.is_empty()
    }
}

/// A templated email ready for the dispatch service.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub service_id: String,
    pub template_id: String,
    /// The service calls its public key "user_id" on the wire.
    pub user_id: String,
    pub template_params: Value,
}

impl EmailMessage {
    /// Template parameter by name, for logging and assertions.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.template_params.get(name).and_then(Value::as_str)
    }
}

/// Email delivery seam.
#[async_trait::async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// EmailJS-backed sender.
pub struct EmailJsSender {
    http: reqwest::Client,
    endpoint: String,
}

impl EmailJsSender {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: EMAILJS_ENDPOINT.to_string(),
        }
    }
}

impl Default for EmailJsSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailSender for EmailJsSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            "Sending email via service {} template {}",
            message.service_id, message.template_id
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(message)
            .send()
            .await
            .context("Email request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Email service rejected send ({}): {}", status, body);
        }

        info!("Email sent successfully");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_completeness() {
        let mut config = EmailConfig::default();
        assert!(!config.is_complete());

        config.service_id = "service_x".to_string();
        config.template_id = "template_y".to_string();
        assert!(!config.is_complete());

        config.public_key = "key_z".to_string();
        assert!(config.is_complete());
    }

    #[test]
    fn test_message_serializes_for_the_wire() {
        let message = EmailMessage {
            service_id: "service_x".to_string(),
            template_id: "template_y".to_string(),
            user_id: "key_z".to_string(),
            template_params: json!({"to_email": "a@b.c", "message": "hi"}),
        };

        let wire = serde_json::to_value(&message).unwrap();
        assert_eq!(wire["service_id"], "service_x");
        assert_eq!(wire["user_id"], "key_z");
        assert_eq!(wire["template_params"]["to_email"], "a@b.c");
    }

    #[test]
    fn test_param_lookup() {
        let message = EmailMessage {
            service_id: String::new(),
            template_id: String::new(),
            user_id: String::new(),
            template_params: json!({"audio_url": "https://cdn/x.mp4"}),
        };

        assert_eq!(message.param("audio_url"), Some("https://cdn/x.mp4"));
        assert_eq!(message.param("missing"), None);
    }
}
