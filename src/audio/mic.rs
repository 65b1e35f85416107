// Microphone capture via cpal. The cpal stream is not Send, so a dedicated
// thread owns it for the lifetime of the capture and forwards buffered
// frames over a channel.

use std::sync::mpsc::{RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::backend::{AudioBackend, AudioFrame, CaptureConfig};

const DEVICE_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Default-microphone backend.
pub struct MicBackend {
    config: CaptureConfig,
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
    capturing: bool,
}

impl MicBackend {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            stop_tx: None,
            thread: None,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for MicBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.capturing {
            bail!("Already capturing");
        }

        info!(
            "Starting microphone capture ({}Hz, {} channels)",
            self.config.sample_rate, self.config.channels
        );

        let (frame_tx, frame_rx) = mpsc::channel(64);
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();
        let (stop_tx, stop_rx) = std::sync::mpsc::channel();

        let config = self.config.clone();
        let thread = std::thread::spawn(move || {
            run_capture(config, frame_tx, ready_tx, stop_rx);
        });

        // The thread reports once the device is acquired and the stream is
        // playing; a denial or missing device surfaces here.
        let acquired = tokio::time::timeout(DEVICE_ACQUIRE_TIMEOUT, ready_rx)
            .await
            .context("Timed out waiting for the microphone")?
            .context("Capture thread exited before reporting")?;

        if let Err(e) = acquired {
            let _ = thread.join();
            return Err(e).context("Could not access microphone. Please allow permissions.");
        }

        self.stop_tx = Some(stop_tx);
        self.thread = Some(thread);
        self.capturing = true;

        info!("Microphone capture started");

        Ok(frame_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if !self.capturing {
            return Ok(());
        }

        info!("Stopping microphone capture");

        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(thread) = self.thread.take() {
            tokio::task::spawn_blocking(move || thread.join())
                .await
                .context("Join task failed")?
                .map_err(|_| anyhow!("Capture thread panicked"))?;
        }

        self.capturing = false;

        info!("Microphone released");

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "cpal microphone"
    }
}

impl Drop for MicBackend {
    fn drop(&mut self) {
        // Unblock the capture thread so the device is released even when
        // the session is torn down without an explicit stop.
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}

/// Accumulates callback audio as target-rate mono i16 samples.
struct SampleSink {
    samples: Vec<i16>,
    resample_pos: f64,
    target_rate: u32,
}

impl SampleSink {
    fn new(target_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            resample_pos: 0.0,
            target_rate,
        }
    }

    /// Push mono f32 input at `in_rate`, resampling by linear
    /// interpolation when the rates differ.
    fn push(&mut self, input: &[f32], in_rate: u32) {
        if input.is_empty() {
            return;
        }

        if in_rate == self.target_rate {
            self.samples.extend(input.iter().map(|&s| float_to_i16(s)));
            return;
        }

        let ratio = in_rate as f64 / self.target_rate as f64;
        let mut pos = self.resample_pos;

        while pos + 1.0 < input.len() as f64 {
            let idx = pos.floor() as usize;
            let frac = pos - idx as f64;
            let a = input[idx] as f64;
            let b = input[idx + 1] as f64;
            self.samples.push(float_to_i16((a * (1.0 - frac) + b * frac) as f32));
            pos += ratio;
        }

        self.resample_pos = pos - input.len() as f64;
    }

    fn take(&mut self) -> Vec<i16> {
        std::mem::take(&mut self.samples)
    }
}

fn float_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Capture loop. Owns the cpal stream; exits when the stop channel fires
/// or the frame receiver goes away.
fn run_capture(
    config: CaptureConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
    ready_tx: tokio::sync::oneshot::Sender<Result<()>>,
    stop_rx: std::sync::mpsc::Receiver<()>,
) {
    let sink = Arc::new(Mutex::new(SampleSink::new(config.sample_rate)));

    let stream = match build_stream(Arc::clone(&sink)) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(anyhow!("Failed to start input stream: {}", e)));
        return;
    }

    let _ = ready_tx.send(Ok(()));

    let started = Instant::now();
    let interval = Duration::from_millis(config.buffer_duration_ms);

    loop {
        match stop_rx.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        let samples = lock_sink(&sink).take();
        if samples.is_empty() {
            continue;
        }

        let frame = AudioFrame {
            samples,
            sample_rate: config.sample_rate,
            channels: 1,
            timestamp_ms: started.elapsed().as_millis() as u64,
        };

        if frame_tx.blocking_send(frame).is_err() {
            warn!("Frame receiver dropped, stopping capture");
            break;
        }
    }

    // Flush whatever the callback wrote since the last tick.
    let samples = lock_sink(&sink).take();
    if !samples.is_empty() {
        let _ = frame_tx.blocking_send(AudioFrame {
            samples,
            sample_rate: config.sample_rate,
            channels: 1,
            timestamp_ms: started.elapsed().as_millis() as u64,
        });
    }

    drop(stream);
}

fn build_stream(sink: Arc<Mutex<SampleSink>>) -> Result<cpal::Stream> {
    let host = cpal::default_host();

    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("No microphone available"))?;

    let supported = device
        .default_input_config()
        .context("Failed to query microphone config")?;

    let stream_config: StreamConfig = supported.clone().into();
    let channels = stream_config.channels as usize;
    let in_rate = stream_config.sample_rate.0;

    info!(
        "Microphone acquired ({}Hz, {} channels, {:?})",
        in_rate,
        channels,
        supported.sample_format()
    );

    let err_fn = |err| error!("Audio stream error: {}", err);

    let stream = match supported.sample_format() {
        SampleFormat::F32 => device.build_input_stream(
            &stream_config,
            move |data: &[f32], _| {
                let mono = downmix(data, channels, |s| s);
                lock_sink(&sink).push(&mono, in_rate);
            },
            err_fn,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            &stream_config,
            move |data: &[i16], _| {
                let mono = downmix(data, channels, |s| s as f32 / i16::MAX as f32);
                lock_sink(&sink).push(&mono, in_rate);
            },
            err_fn,
            None,
        ),
        SampleFormat::U16 => device.build_input_stream(
            &stream_config,
            move |data: &[u16], _| {
                let mono = downmix(data, channels, |s| (s as f32 - 32_768.0) / 32_768.0);
                lock_sink(&sink).push(&mono, in_rate);
            },
            err_fn,
            None,
        ),
        other => bail!("Unsupported microphone sample format: {:?}", other),
    }
    .context("Failed to build input stream")?;

    Ok(stream)
}

/// Average interleaved channels down to mono f32.
fn downmix<T: Copy>(data: &[T], channels: usize, to_f32: impl Fn(T) -> f32) -> Vec<f32> {
    let channels = channels.max(1);
    data.chunks(channels)
        .map(|frame| frame.iter().map(|&s| to_f32(s)).sum::<f32>() / channels as f32)
        .collect()
}

fn lock_sink(sink: &Arc<Mutex<SampleSink>>) -> std::sync::MutexGuard<'_, SampleSink> {
    // A poisoned lock only means a callback panicked; the buffer itself
    // is still usable.
    sink.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_stereo_averages_channels() {
        let data = [0.2f32, 0.4, -1.0, 1.0];
        let mono = downmix(&data, 2, |s| s);

        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.3).abs() < 1e-6);
        assert!(mono[1].abs() < 1e-6);
    }

    #[test]
    fn test_sample_sink_passthrough_at_target_rate() {
        let mut sink = SampleSink::new(16_000);
        sink.push(&[0.0, 0.5, -0.5], 16_000);

        let samples = sink.take();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], 0);
        assert!(samples[1] > 16_000);
        assert!(samples[2] < -16_000);
    }

    #[test]
    fn test_sample_sink_downsamples() {
        let mut sink = SampleSink::new(16_000);
        let input: Vec<f32> = vec![0.1; 48_000];
        sink.push(&input, 48_000);

        let samples = sink.take();
        // 1 second of 48kHz input becomes ~1 second at 16kHz.
        assert!((samples.len() as i64 - 16_000).unsigned_abs() < 10);
    }

    #[test]
    fn test_float_to_i16_clamps() {
        assert_eq!(float_to_i16(2.0), i16::MAX);
        assert_eq!(float_to_i16(-2.0), -i16::MAX);
        assert_eq!(float_to_i16(0.0), 0);
    }
}
