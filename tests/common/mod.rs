// Shared test doubles for the collaborator seams.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use tokio::sync::mpsc;

use valentine_card::audio::{AudioBackend, AudioFrame};
use valentine_card::card::SoundPlayer;
use valentine_card::notify::{
    AlertSink, EmailConfig, EmailMessage, EmailSender, MediaStore, NotifyConfig, UploadResult,
};

pub const TEST_RECIPIENT: &str = "sweetheart@example.com";

/// Notify config with complete email credentials.
pub fn notify_config() -> NotifyConfig {
    NotifyConfig {
        recipient: TEST_RECIPIENT.to_string(),
        from_name: "Valentine App".to_string(),
        email: EmailConfig {
            service_id: "service_x".to_string(),
            template_id: "template_y".to_string(),
            public_key: "key_z".to_string(),
        },
    }
}

/// Notify config with the email credentials left unset.
pub fn notify_config_without_email() -> NotifyConfig {
    NotifyConfig {
        email: EmailConfig::default(),
        ..notify_config()
    }
}

/// One second of silence at 16kHz mono.
pub fn silence_frame(timestamp_ms: u64) -> AudioFrame {
    AudioFrame {
        samples: vec![0i16; 16_000],
        sample_rate: 16_000,
        channels: 1,
        timestamp_ms,
    }
}

/// Capture backend that either grants the microphone and feeds
/// pre-scripted frames, or denies access.
pub struct ScriptedBackend {
    frames: Vec<AudioFrame>,
    grant: bool,
    capturing: bool,
    starts: Arc<AtomicUsize>,
}

impl ScriptedBackend {
    pub fn granted(frames: Vec<AudioFrame>) -> Self {
        Self {
            frames,
            grant: true,
            capturing: false,
            starts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn denied() -> Self {
        Self {
            frames: Vec::new(),
            grant: false,
            capturing: false,
            starts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle to observe how often the device was actually acquired.
    pub fn start_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.starts)
    }
}

#[async_trait::async_trait]
impl AudioBackend for ScriptedBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        self.starts.fetch_add(1, Ordering::SeqCst);

        if !self.grant {
            bail!("Could not access microphone. Please allow permissions.");
        }

        let (tx, rx) = mpsc::channel(64);
        let frames = self.frames.clone();
        tokio::spawn(async move {
            for frame in frames {
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
        });

        self.capturing = true;
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Media store double recording every upload.
pub struct MockMediaStore {
    response: std::result::Result<UploadResult, String>,
    pub uploads: Mutex<Vec<(String, String)>>, // (mime_type, public_id)
}

impl MockMediaStore {
    pub fn succeeding(url: &str, duration: Option<f64>) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(UploadResult {
                remote_url: url.to_string(),
                duration_seconds: duration,
            }),
            uploads: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(message.to_string()),
            uploads: Mutex::new(Vec::new()),
        })
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl MediaStore for MockMediaStore {
    async fn upload(
        &self,
        _bytes: Vec<u8>,
        mime_type: &str,
        public_id: &str,
    ) -> Result<UploadResult> {
        self.uploads
            .lock()
            .unwrap()
            .push((mime_type.to_string(), public_id.to_string()));

        match &self.response {
            Ok(result) => Ok(result.clone()),
            Err(message) => bail!("{}", message),
        }
    }
}

/// Email sender double recording every message.
pub struct MockEmailSender {
    failure: Option<String>,
    pub sent: Mutex<Vec<EmailMessage>>,
}

impl MockEmailSender {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            failure: None,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(message.to_string()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        if let Some(failure) = &self.failure {
            bail!("{}", failure);
        }

        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Alert sink double recording every alert.
#[derive(Default)]
pub struct RecordingAlertSink {
    pub alerts: Mutex<Vec<String>>,
}

impl RecordingAlertSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.lock().unwrap().len()
    }
}

impl AlertSink for RecordingAlertSink {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

/// Sound player double recording every cue.
#[derive(Default)]
pub struct RecordingSoundPlayer {
    pub played: Mutex<Vec<String>>,
}

impl RecordingSoundPlayer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn play_count(&self) -> usize {
        self.played.lock().unwrap().len()
    }
}

impl SoundPlayer for RecordingSoundPlayer {
    fn play(&self, asset_url: &str) -> Result<()> {
        self.played.lock().unwrap().push(asset_url.to_string());
        Ok(())
    }
}
