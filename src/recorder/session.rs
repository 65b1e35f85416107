use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::status::{format_elapsed, validate_transition, RecorderStatus};
use crate::audio::{AudioBackend, AudioFrame, VoiceArtifact};
use crate::notify::{Dispatcher, UploadResult};

/// A voice message recording session.
///
/// Owns the capture backend, the collected frames, the elapsed-time
/// counter, and the finalized artifact. Exactly one recording can be
/// active per session; all mutation happens through the lifecycle
/// methods, which enforce the legal transition set.
pub struct RecorderSession {
    session_id: String,

    status: RecorderStatus,

    /// Capture backend; held exclusively between start and stop.
    backend: Box<dyn AudioBackend>,

    /// Frames collected while recording.
    frames: Arc<Mutex<Vec<AudioFrame>>>,

    /// Drains the backend channel into `frames`.
    collect_task: Option<JoinHandle<()>>,

    /// Increments `elapsed_seconds` once per second while recording.
    timer_task: Option<JoinHandle<()>>,

    elapsed_seconds: Arc<AtomicU64>,

    /// The finalized audio payload; present in Reviewing, Uploading and
    /// Sent only.
    artifact: Option<VoiceArtifact>,

    /// User-facing error from the last failed operation.
    last_error: Option<String>,
}

impl RecorderSession {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        let session_id = format!("voice-{}", uuid::Uuid::new_v4());
        info!("Creating recorder session: {}", session_id);

        Self {
            session_id,
            status: RecorderStatus::Idle,
            backend,
            frames: Arc::new(Mutex::new(Vec::new())),
            collect_task: None,
            timer_task: None,
            elapsed_seconds: Arc::new(AtomicU64::new(0)),
            artifact: None,
            last_error: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn status(&self) -> RecorderStatus {
        self.status
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds.load(Ordering::SeqCst)
    }

    /// Elapsed time as shown on the card, e.g. "0:03".
    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.elapsed_seconds())
    }

    pub fn artifact(&self) -> Option<&VoiceArtifact> {
        self.artifact.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Request the microphone and start recording.
    ///
    /// Starting while already recording is a no-op. On denial or
    /// unavailability the error is recorded for the UI and the session
    /// stays Idle.
    pub async fn start(&mut self) -> Result<()> {
        if self.status == RecorderStatus::Recording {
            warn!("Recording already started");
            return Ok(());
        }

        validate_transition(self.status, RecorderStatus::Recording)?;

        self.last_error = None;

        let frame_rx = match self.backend.start().await {
            Ok(rx) => rx,
            Err(e) => {
                let message = format!("{:#}", e);
                error!("Microphone acquisition failed: {}", message);
                self.last_error = Some(message);
                return Err(e);
            }
        };

        info!("Recording started: {}", self.session_id);

        self.frames.lock().await.clear();
        self.elapsed_seconds.store(0, Ordering::SeqCst);

        // Drain capture frames as they arrive.
        let frames = Arc::clone(&self.frames);
        let mut frame_rx = frame_rx;
        self.collect_task = Some(tokio::spawn(async move {
            while let Some(frame) = frame_rx.recv().await {
                frames.lock().await.push(frame);
            }
        }));

        // 1 Hz elapsed counter, cleared on stop/retry/drop.
        let elapsed = Arc::clone(&self.elapsed_seconds);
        self.timer_task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.tick().await; // first tick completes immediately
            loop {
                interval.tick().await;
                elapsed.fetch_add(1, Ordering::SeqCst);
            }
        }));

        self.status = RecorderStatus::Recording;

        Ok(())
    }

    /// Stop recording, release the microphone and finalize the captured
    /// audio into a single artifact.
    pub async fn stop(&mut self) -> Result<()> {
        validate_transition(self.status, RecorderStatus::Reviewing)?;

        info!("Stopping recording: {}", self.session_id);

        self.backend
            .stop()
            .await
            .context("Failed to stop audio capture")?;

        if let Some(task) = self.timer_task.take() {
            task.abort();
        }

        // The backend closed the frame channel; wait for the tail frames.
        if let Some(task) = self.collect_task.take() {
            if let Err(e) = task.await {
                error!("Frame collector task panicked: {}", e);
            }
        }

        let frames = {
            let mut guard = self.frames.lock().await;
            std::mem::take(&mut *guard)
        };

        let artifact = VoiceArtifact::from_frames(&frames)?;
        info!(
            "Recording finalized: {} ({}, {:.1}s)",
            self.session_id, artifact.mime_type, artifact.duration_seconds
        );

        self.artifact = Some(artifact);
        self.status = RecorderStatus::Reviewing;

        Ok(())
    }

    /// Discard the artifact and return to Idle for a fresh take.
    pub fn retry(&mut self) -> Result<()> {
        validate_transition(self.status, RecorderStatus::Idle)?;

        info!("Discarding recording: {}", self.session_id);

        self.artifact = None;
        self.last_error = None;
        self.elapsed_seconds.store(0, Ordering::SeqCst);
        self.status = RecorderStatus::Idle;

        Ok(())
    }

    /// Hand the artifact to Notification Dispatch. On failure the session
    /// returns to Reviewing with the artifact intact so the user can
    /// retry without re-recording.
    pub async fn send(&mut self, dispatcher: &Dispatcher) -> Result<UploadResult> {
        validate_transition(self.status, RecorderStatus::Uploading)?;

        let artifact = self
            .artifact
            .clone()
            .context("No artifact available to send")?;

        self.last_error = None;
        self.status = RecorderStatus::Uploading;

        info!("Sending voice message: {}", self.session_id);

        match dispatcher.notify_voice_message(&artifact).await {
            Ok(result) => {
                self.status = RecorderStatus::Sent;
                info!("Voice message sent: {}", result.remote_url);
                Ok(result)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!("Voice message send failed: {}", message);
                self.last_error = Some(message);
                self.status = RecorderStatus::Reviewing;
                Err(e)
            }
        }
    }
}

impl Drop for RecorderSession {
    fn drop(&mut self) {
        // Clear the timer and collector so nothing outlives the session.
        if let Some(task) = self.timer_task.take() {
            task.abort();
        }
        if let Some(task) = self.collect_task.take() {
            task.abort();
        }
    }
}
