//! Notification dispatch
//!
//! Sends the acceptance email and the voice-message email through two
//! external collaborators: a media store that hosts the audio artifact
//! and an email service that delivers templated messages. Both are async
//! trait seams with reqwest-backed production implementations.

pub mod alert;
pub mod dispatcher;
pub mod email;
pub mod media_store;

pub use alert::{AlertSink, LogAlertSink};
pub use dispatcher::{Dispatcher, NotifyConfig};
pub use email::{EmailConfig, EmailJsSender, EmailMessage, EmailSender};
pub use media_store::{CloudinaryStore, MediaStore, MediaStoreConfig, UploadResult};
