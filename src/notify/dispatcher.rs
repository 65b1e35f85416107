use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::json;
use tracing::{error, info};

use super::alert::AlertSink;
use super::email::{EmailConfig, EmailMessage, EmailSender};
use super::media_store::{MediaStore, UploadResult};
use crate::audio::VoiceArtifact;

/// Body of the acceptance notification.
pub const ACCEPTANCE_MESSAGE: &str = "Sanjana clicked YES 🥰\n\
    Your Valentine proposal was accepted 💕\n\
    This message was sent automatically when the YES button was clicked.";

/// Body of the voice message notification.
pub const VOICE_MESSAGE_TEXT: &str = "You received a voice message! 🎤";

/// Upload identifiers combine this prefix with the current unix timestamp.
pub const PUBLIC_ID_PREFIX: &str = "voice_msg_";

/// Who gets notified and through which email identity. Explicit
/// configuration, never embedded in the send paths.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub recipient: String,
    pub from_name: String,
    pub email: EmailConfig,
}

/// Notification dispatch over the two external collaborators.
pub struct Dispatcher {
    config: NotifyConfig,
    media: Arc<dyn MediaStore>,
    email: Arc<dyn EmailSender>,
    alerts: Arc<dyn AlertSink>,
}

impl Dispatcher {
    pub fn new(
        config: NotifyConfig,
        media: Arc<dyn MediaStore>,
        email: Arc<dyn EmailSender>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            config,
            media,
            email,
            alerts,
        }
    }

    /// Tell the recipient the proposal was accepted.
    ///
    /// Missing credentials and transport failures interrupt the user via
    /// the alert sink; neither is retried automatically.
    pub async fn notify_acceptance(&self) -> Result<()> {
        let message = self.email_message(json!({
            "to_email": self.config.recipient,
            "from_name": self.config.from_name,
            "message": ACCEPTANCE_MESSAGE,
        }))?;

        if let Err(e) = self.email.send(&message).await {
            error!("Failed to send acceptance email: {:#}", e);
            self.alerts.alert("Failed to send email. See logs for details.");
            return Err(e).context("Failed to send acceptance email");
        }

        info!("Acceptance email sent to {}", self.config.recipient);

        Ok(())
    }

    /// Upload the voice artifact and email its durable URL.
    ///
    /// Upload failure aborts before the email step. Email failure after a
    /// successful upload is surfaced separately; the upload stays put.
    pub async fn notify_voice_message(&self, artifact: &VoiceArtifact) -> Result<UploadResult> {
        let public_id = format!("{}{}", PUBLIC_ID_PREFIX, chrono::Utc::now().timestamp());

        let upload = self
            .media
            .upload(artifact.bytes.clone(), &artifact.mime_type, &public_id)
            .await
            .context("Failed to upload voice message")?;

        let message = self.email_message(json!({
            "to_email": self.config.recipient,
            "from_name": self.config.from_name,
            "message": VOICE_MESSAGE_TEXT,
            "audio_url": upload.remote_url,
            // Fallback markup for templates that ignore audio_url.
            "message_html": format!(
                "You received a voice message! <br/> <a href=\"{}\">Click here to listen 🎤</a>",
                upload.remote_url
            ),
        }))?;

        self.email
            .send(&message)
            .await
            .context("Voice message uploaded, but the notification email failed")?;

        info!(
            "Voice message email sent to {} ({})",
            self.config.recipient, upload.remote_url
        );

        Ok(upload)
    }

    /// Assemble a templated message, failing loudly when the service
    /// credentials are absent.
    fn email_message(&self, template_params: serde_json::Value) -> Result<EmailMessage> {
        if !self.config.email.is_complete() {
            let notice = "Email service keys are missing. Email not sent.";
            error!("{}", notice);
            self.alerts.alert(notice);
            bail!("Email service credentials are not configured");
        }

        Ok(EmailMessage {
            service_id: self.config.email.service_id.clone(),
            template_id: self.config.email.template_id.clone(),
            user_id: self.config.email.public_key.clone(),
            template_params,
        })
    }
}
