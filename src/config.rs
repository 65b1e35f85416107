use anyhow::Result;
use serde::Deserialize;

use crate::audio::CaptureConfig;
use crate::card::CardLayout;
use crate::notify::{EmailConfig, MediaStoreConfig, NotifyConfig};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub card: CardConfig,
    #[serde(default)]
    pub notify: RecipientConfig,
    #[serde(default)]
    pub media_store: MediaStoreConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "valentine-card".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub buffer_duration_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        let capture = CaptureConfig::default();
        Self {
            sample_rate: capture.sample_rate,
            channels: capture.channels,
            buffer_duration_ms: capture.buffer_duration_ms,
        }
    }
}

impl AudioConfig {
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            sample_rate: self.sample_rate,
            channels: self.channels,
            buffer_duration_ms: self.buffer_duration_ms,
        }
    }
}

/// Card geometry as rendered by the page. The relocation algorithm confines
/// the evasive control to these bounds.
#[derive(Debug, Deserialize)]
pub struct CardConfig {
    pub width: f32,
    pub height: f32,
    pub control_width: f32,
    pub control_height: f32,
    pub padding: f32,
}

impl Default for CardConfig {
    fn default() -> Self {
        let layout = CardLayout::default();
        Self {
            width: layout.container.width,
            height: layout.container.height,
            control_width: layout.control.width,
            control_height: layout.control.height,
            padding: layout.padding,
        }
    }
}

impl CardConfig {
    pub fn layout(&self) -> CardLayout {
        CardLayout {
            container: crate::card::Size {
                width: self.width,
                height: self.height,
            },
            control: crate::card::Size {
                width: self.control_width,
                height: self.control_height,
            },
            padding: self.padding,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecipientConfig {
    pub recipient: String,
    pub from_name: String,
}

impl Default for RecipientConfig {
    fn default() -> Self {
        Self {
            recipient: "arunjs2703@gmail.com".to_string(),
            from_name: "Valentine App".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file plus `VALENTINE__*`
    /// environment variables (e.g. `VALENTINE__EMAIL__SERVICE_ID`).
    ///
    /// Collaborator credentials may be absent here; they are validated at
    /// call time by the components that need them.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("VALENTINE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn notify_config(&self) -> NotifyConfig {
        NotifyConfig {
            recipient: self.notify.recipient.clone(),
            from_name: self.notify.from_name.clone(),
            email: self.email.clone(),
        }
    }
}
