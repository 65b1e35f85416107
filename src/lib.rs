pub mod audio;
pub mod card;
pub mod config;
pub mod http;
pub mod notify;
pub mod recorder;

pub use audio::{AudioBackend, AudioFrame, CaptureConfig, MicBackend, VoiceArtifact};
pub use card::{Burst, CardLayout, CardSession, CelebrationPlan, EvasiveButton, Proposal, ProposalState};
pub use config::Config;
pub use http::{create_router, AppState};
pub use notify::{Dispatcher, EmailConfig, MediaStoreConfig, NotifyConfig, UploadResult};
pub use recorder::{RecorderSession, RecorderStatus};
