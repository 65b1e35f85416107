use std::io::Cursor;

use anyhow::{Context, Result};
use tracing::info;

use super::backend::AudioFrame;

/// Encodings the recorder would rather produce, best first. Mirrors what
/// the page offered its media recorder before settling for a default.
pub const MIME_PREFERENCE: [&str; 4] = [
    "audio/webm;codecs=opus",
    "audio/webm",
    "audio/mp4",
    "audio/ogg;codecs=opus",
];

/// The encoding every build can produce.
pub const MIME_DEFAULT: &str = "audio/wav";

/// Encodings this build actually ships an encoder for.
pub fn native_encodings() -> &'static [&'static str] {
    // hound gives us WAV; the compressed codecs in the preference list
    // have no encoder here and are negotiated away.
    &[MIME_DEFAULT]
}

/// Pick the first preference entry the given encoder set supports,
/// falling back to the default encoding.
pub fn negotiate_mime(supported: &[&str]) -> &'static str {
    MIME_PREFERENCE
        .into_iter()
        .find(|candidate| supported.contains(candidate))
        .unwrap_or(MIME_DEFAULT)
}

/// The finalized audio payload produced by a recording session, ready
/// for transport.
#[derive(Debug, Clone)]
pub struct VoiceArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub duration_seconds: f64,
}

impl VoiceArtifact {
    /// Finalize captured frames into a single artifact using the best
    /// supported encoding.
    pub fn from_frames(frames: &[AudioFrame]) -> Result<Self> {
        let mime = negotiate_mime(native_encodings());

        // The negotiated native encoding is WAV today; a build that grows
        // an opus/aac encoder extends native_encodings() and this match.
        let bytes = match mime {
            MIME_DEFAULT => encode_wav(frames)?,
            other => anyhow::bail!("No encoder available for {}", other),
        };

        let duration_seconds = frames
            .iter()
            .map(|f| f.samples.len() as f64 / (f.sample_rate as f64 * f.channels as f64))
            .sum();

        info!(
            "Finalized voice artifact: {} bytes, {}, {:.1}s",
            bytes.len(),
            mime,
            duration_seconds
        );

        Ok(Self {
            bytes,
            mime_type: mime.to_string(),
            duration_seconds,
        })
    }

    /// File extension matching the artifact encoding.
    pub fn extension(&self) -> &'static str {
        if self.mime_type.contains("mp4") {
            "mp4"
        } else if self.mime_type.contains("webm") {
            "webm"
        } else if self.mime_type.contains("ogg") {
            "ogg"
        } else {
            "wav"
        }
    }
}

/// Encode PCM frames as an in-memory WAV file.
pub fn encode_wav(frames: &[AudioFrame]) -> Result<Vec<u8>> {
    let (sample_rate, channels) = frames
        .first()
        .map(|f| (f.sample_rate, f.channels))
        .unwrap_or((16_000, 1));

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).context("Failed to create WAV writer")?;

        for frame in frames {
            for &sample in &frame.samples {
                writer
                    .write_sample(sample)
                    .context("Failed to write sample to WAV")?;
            }
        }

        writer.finalize().context("Failed to finalize WAV data")?;
    }

    Ok(cursor.into_inner())
}
