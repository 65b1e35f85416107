//! HTTP API for the card page
//!
//! The page is static; every interaction goes through this API:
//! - GET  /card - Proposal state and "No" control placement
//! - POST /card/no - Relocate the evasive control
//! - POST /card/yes - Accept the proposal
//! - GET  /recorder - Recording session status
//! - POST /recorder/start|stop|retry|send - Recording lifecycle
//! - GET  /recorder/preview - Finalized artifact for playback
//! - POST /api/upload-audio - Multipart audio upload to the media store
//! - GET  /health - Health check

pub mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
