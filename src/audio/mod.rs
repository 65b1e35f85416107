pub mod backend;
pub mod encode;
pub mod mic;

pub use backend::{AudioBackend, AudioFrame, CaptureConfig};
pub use encode::{
    encode_wav, native_encodings, negotiate_mime, VoiceArtifact, MIME_DEFAULT, MIME_PREFERENCE,
};
pub use mic::MicBackend;
