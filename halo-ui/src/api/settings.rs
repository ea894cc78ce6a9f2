//! Session settings endpoints (translation and daily goal)

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use halo_common::api::types::{self, TranslationOption, TRANSLATIONS};

use crate::error::ApiResult;
use crate::session::SpeechSnapshot;
use crate::AppState;

/// Current settings view
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub translation: String,
    pub translation_label: String,
    pub translations: Vec<TranslationOption>,
    pub daily_goal: u32,
    pub speech: SpeechSnapshot,
}

async fn settings_view(state: &AppState) -> SettingsResponse {
    let translation = state.session.translation().await;
    SettingsResponse {
        translation_label: types::translation_label(&translation),
        translation,
        translations: TRANSLATIONS.to_vec(),
        daily_goal: state.store.daily_goal(),
        speech: state.session.speech_snapshot().await,
    }
}

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(settings_view(&state).await)
}

/// Body for PUT /api/settings; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct SettingsUpdate {
    pub translation: Option<String>,
    pub daily_goal: Option<u32>,
}

/// PUT /api/settings
///
/// A translation change while a chapter is open re-keys the active
/// selection and kicks off a fresh load under the new key.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> ApiResult<Json<SettingsResponse>> {
    if let Some(code) = update.translation.as_deref() {
        if let Some(action) = state.session.set_translation(code).await? {
            crate::spawn_chapter_load(&state, action);
        }
    }

    if let Some(goal) = update.daily_goal {
        state.store.set_daily_goal(goal)?;
    }

    Ok(Json(settings_view(&state).await))
}
