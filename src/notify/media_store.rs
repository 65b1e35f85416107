use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::info;

/// Folder the voice messages land in at the media store.
pub const UPLOAD_FOLDER: &str = "valentine_voice_messages";

/// Uploads are tagged "video" because the store handles audio containers
/// under its video resource kind.
pub const RESOURCE_KIND: &str = "video";

/// Media store credentials. All three are required for uploads; absence
/// is detected at call time, not at startup.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MediaStoreConfig {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
}

impl MediaStoreConfig {
    pub fn is_complete(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

/// Durable reference to an uploaded artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub remote_url: String,
    pub duration_seconds: Option<f64>,
}

/// Remote store hosting the audio artifact.
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload artifact bytes under the given public id; returns the
    /// durable URL and the duration when the store reports one.
    async fn upload(&self, bytes: Vec<u8>, mime_type: &str, public_id: &str)
        -> Result<UploadResult>;
}

#[derive(Debug, Deserialize)]
struct CloudinaryResponse {
    secure_url: String,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CloudinaryError {
    error: CloudinaryErrorBody,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    message: String,
}

/// Cloudinary-backed media store.
pub struct CloudinaryStore {
    http: reqwest::Client,
    config: MediaStoreConfig,
}

impl CloudinaryStore {
    pub fn new(config: MediaStoreConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/{}/upload",
            self.config.cloud_name, RESOURCE_KIND
        )
    }
}

#[async_trait::async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        public_id: &str,
    ) -> Result<UploadResult> {
        if !self.config.is_complete() {
            bail!("Media store credentials are missing; upload not attempted");
        }

        info!(
            "Uploading voice message to media store ({} bytes, {})",
            bytes.len(),
            mime_type
        );

        let file = reqwest::multipart::Part::bytes(bytes)
            .file_name(format!("{}.upload", public_id))
            .mime_str(mime_type)
            .context("Invalid artifact mime type")?;

        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("folder", UPLOAD_FOLDER)
            .text("public_id", public_id.to_string())
            .text("resource_type", RESOURCE_KIND);

        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .context("Media store request failed")?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<CloudinaryError>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            bail!("Media store rejected upload: {}", message);
        }

        let body: CloudinaryResponse = response
            .json()
            .await
            .context("Failed to parse media store response")?;

        info!("Upload complete: {}", body.secure_url);

        Ok(UploadResult {
            remote_url: body.secure_url,
            duration_seconds: body.duration,
        })
    }
}
