//! Speech playback endpoint

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::session::SpeechSnapshot;
use crate::AppState;

/// Playback action
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechAction {
    Play,
    Pause,
    Resume,
    Stop,
}

/// Body for POST /api/speech
#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    pub action: SpeechAction,
    /// Optional rate update, applied (clamped) before the action
    pub rate: Option<f32>,
}

/// POST /api/speech
///
/// Drives the playback state machine for the active chapter. `play` is a
/// no-op when no successfully loaded passage is selected.
pub async fn speech_control(
    State(state): State<AppState>,
    Json(request): Json<SpeechRequest>,
) -> ApiResult<Json<SpeechSnapshot>> {
    if let Some(rate) = request.rate {
        if !rate.is_finite() {
            return Err(ApiError::BadRequest("Rate must be a finite number".to_string()));
        }
        state.session.set_speech_rate(rate).await;
    }

    match request.action {
        SpeechAction::Play => {
            let entry = match state.session.active_key().await {
                Some(key) => state.cache.get(&key).await,
                None => None,
            };
            if let Some(entry) = entry {
                state.session.speech_play(&entry).await;
            }
        }
        SpeechAction::Pause => state.session.speech_pause().await,
        SpeechAction::Resume => state.session.speech_resume().await,
        SpeechAction::Stop => state.session.speech_stop().await,
    }

    Ok(Json(state.session.speech_snapshot().await))
}
