use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{error, info};

use super::state::AppState;
use crate::card::{ButtonPosition, CelebrationPlan, ProposalState};
use crate::notify::dispatcher::PUBLIC_ID_PREFIX;
use crate::recorder::RecorderStatus;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub state: ProposalState,
    pub position: ButtonPosition,
    pub message: Option<String>,
    pub moved: bool,
}

#[derive(Debug, Serialize)]
pub struct RelocateResponse {
    pub position: ButtonPosition,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AcceptResponse {
    pub state: ProposalState,
    /// Present only on the accepting call; repeats change nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celebration: Option<CelebrationPlan>,
}

#[derive(Debug, Serialize)]
pub struct RecorderResponse {
    pub session_id: String,
    pub status: RecorderStatus,
    pub elapsed_seconds: u64,
    /// Elapsed time as rendered on the card, e.g. "0:03".
    pub elapsed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub status: RecorderStatus,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct UploadAudioResponse {
    pub success: bool,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Card Handlers
// ============================================================================

/// GET /card
/// Current proposal state and evasive-control placement
pub async fn get_card(State(state): State<AppState>) -> impl IntoResponse {
    let card = state.card.lock().await;

    Json(CardResponse {
        state: card.proposal().state(),
        position: card.button().position(),
        message: card.button().message().map(str::to_string),
        moved: card.button().has_moved(),
    })
}

/// POST /card/no
/// Pointer-enter or activation of the "No" control: relocate it and pick
/// a teasing message. Never touches the proposal state.
pub async fn tease_no_button(State(state): State<AppState>) -> impl IntoResponse {
    let mut card = state.card.lock().await;
    let (position, message) = card.tease();

    Json(RelocateResponse {
        position,
        message: message.to_string(),
    })
}

/// POST /card/yes
/// Accept the proposal. First call returns the celebration effects and
/// schedules the acceptance notification; repeats are no-ops.
pub async fn accept_proposal(State(state): State<AppState>) -> impl IntoResponse {
    let effects = {
        let mut card = state.card.lock().await;
        card.accept()
    };

    match effects {
        Some(acceptance) => {
            // The chime is best-effort enrichment.
            state.sound.play(acceptance.sound_url).ok();

            // Give the page a moment to repaint before dispatching.
            let dispatcher = state.dispatcher.clone();
            let delay = acceptance.notify_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Err(e) = dispatcher.notify_acceptance().await {
                    error!("Acceptance notification failed: {:#}", e);
                }
            });

            Json(AcceptResponse {
                state: ProposalState::Accepted,
                sound_url: Some(acceptance.sound_url.to_string()),
                celebration: Some(acceptance.celebration),
            })
        }
        None => {
            info!("Accept ignored; proposal already accepted");
            Json(AcceptResponse {
                state: ProposalState::Accepted,
                sound_url: None,
                celebration: None,
            })
        }
    }
}

// ============================================================================
// Recorder Handlers
// ============================================================================

fn recorder_response(recorder: &crate::recorder::RecorderSession) -> RecorderResponse {
    RecorderResponse {
        session_id: recorder.session_id().to_string(),
        status: recorder.status(),
        elapsed_seconds: recorder.elapsed_seconds(),
        elapsed: recorder.elapsed_display(),
        mime_type: recorder.artifact().map(|a| a.mime_type.clone()),
        error: recorder.last_error().map(str::to_string),
    }
}

/// GET /recorder
/// Status of the voice recording session
pub async fn get_recorder(State(state): State<AppState>) -> impl IntoResponse {
    let recorder = state.recorder.lock().await;
    Json(recorder_response(&recorder))
}

/// POST /recorder/start
/// Request the microphone and begin recording
pub async fn start_recording(State(state): State<AppState>) -> Response {
    let mut recorder = state.recorder.lock().await;

    match recorder.start().await {
        Ok(()) => (StatusCode::OK, Json(recorder_response(&recorder))).into_response(),
        Err(e) => {
            error!("Failed to start recording: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("{:#}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /recorder/stop
/// Stop recording and finalize the artifact
pub async fn stop_recording(State(state): State<AppState>) -> Response {
    let mut recorder = state.recorder.lock().await;

    if recorder.status() != RecorderStatus::Recording {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Not recording".to_string(),
            }),
        )
            .into_response();
    }

    match recorder.stop().await {
        Ok(()) => (StatusCode::OK, Json(recorder_response(&recorder))).into_response(),
        Err(e) => {
            error!("Failed to stop recording: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("{:#}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /recorder/retry
/// Discard the current recording and return to Idle
pub async fn retry_recording(State(state): State<AppState>) -> Response {
    let mut recorder = state.recorder.lock().await;

    match recorder.retry() {
        Ok(()) => (StatusCode::OK, Json(recorder_response(&recorder))).into_response(),
        Err(e) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("{:#}", e),
            }),
        )
            .into_response(),
    }
}

/// POST /recorder/send
/// Upload the artifact and dispatch the voice-message email
pub async fn send_recording(State(state): State<AppState>) -> Response {
    let mut recorder = state.recorder.lock().await;

    if recorder.status() != RecorderStatus::Reviewing {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Nothing to send".to_string(),
            }),
        )
            .into_response();
    }

    match recorder.send(&state.dispatcher).await {
        Ok(result) => (
            StatusCode::OK,
            Json(SendResponse {
                status: recorder.status(),
                url: result.remote_url,
                duration: result.duration_seconds,
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("{:#}", e),
            }),
        )
            .into_response(),
    }
}

/// GET /recorder/preview
/// The finalized artifact bytes, for playback while reviewing
pub async fn get_preview(State(state): State<AppState>) -> Response {
    let recorder = state.recorder.lock().await;

    match recorder.artifact() {
        Some(artifact) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, artifact.mime_type.clone())],
            artifact.bytes.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No recording to preview".to_string(),
            }),
        )
            .into_response(),
    }
}

// ============================================================================
// Upload Handler
// ============================================================================

/// POST /api/upload-audio
/// Multipart upload (field "audio") straight to the media store
pub async fn upload_audio(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut audio: Option<(Vec<u8>, String)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Malformed upload: {}", e),
                    }),
                )
                    .into_response();
            }
        };

        if field.name() != Some("audio") {
            continue;
        }

        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        match field.bytes().await {
            Ok(bytes) => {
                audio = Some((bytes.to_vec(), mime));
                break;
            }
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Malformed upload: {}", e),
                    }),
                )
                    .into_response();
            }
        }
    }

    let Some((bytes, mime)) = audio else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No file uploaded".to_string(),
            }),
        )
            .into_response();
    };

    let public_id = format!("{}{}", PUBLIC_ID_PREFIX, chrono::Utc::now().timestamp());

    match state.media.upload(bytes, &mime, &public_id).await {
        Ok(result) => (
            StatusCode::OK,
            Json(UploadAudioResponse {
                success: true,
                url: result.remote_url,
                duration: result.duration_seconds,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Upload failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Upload failed: {:#}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
