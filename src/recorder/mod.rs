//! Voice message recording
//!
//! This module provides the `RecorderSession` abstraction that manages:
//! - Microphone acquisition and release
//! - The Idle -> Recording -> Reviewing -> Uploading -> Sent lifecycle
//! - Elapsed-time tracking while recording
//! - Finalizing captured audio into a single voice artifact

mod session;
mod status;

pub use session::RecorderSession;
pub use status::{format_elapsed, validate_transition, RecorderStatus};
