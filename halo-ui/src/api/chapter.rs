//! Chapter selection endpoints
//!
//! Opening a chapter updates the session selection and kicks off a cache
//! load; the view endpoint reads whatever the cache currently holds for the
//! active key, so the client polls through loading into success or error.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use halo_common::api::types;
use halo_common::verses::Verse;

use crate::cache::PassageStatus;
use crate::error::ApiResult;
use crate::session::ChapterRef;
use crate::AppState;

/// Body for POST /api/chapter/open
#[derive(Debug, Deserialize)]
pub struct OpenRequest {
    pub book: String,
    pub chapter: u32,
}

/// Acknowledgement of an open request
#[derive(Debug, Serialize)]
pub struct OpenResponse {
    pub key: String,
    pub reference: String,
}

/// POST /api/chapter/open
pub async fn open_chapter(
    State(state): State<AppState>,
    Json(request): Json<OpenRequest>,
) -> ApiResult<(StatusCode, Json<OpenResponse>)> {
    let action = state
        .session
        .open_chapter(&request.book, request.chapter)
        .await?;

    let response = OpenResponse {
        key: action.key.clone(),
        reference: action.reference.clone(),
    };
    crate::spawn_chapter_load(&state, action);

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// POST /api/chapter/close
pub async fn close_chapter(State(state): State<AppState>) -> StatusCode {
    state.session.close_chapter().await;
    StatusCode::NO_CONTENT
}

/// Current reading view
#[derive(Debug, Serialize)]
pub struct ChapterView {
    pub selection: Option<ChapterRef>,
    pub translation: String,
    pub translation_label: String,
    /// Cache entry for the active key; absent when nothing is selected or
    /// the load has not been recorded yet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<PassageStatus>,
    /// Verses to display: provider-split, else parsed from the text blob
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub verses: Vec<Verse>,
}

/// GET /api/chapter
pub async fn get_chapter(State(state): State<AppState>) -> Json<ChapterView> {
    let selection = state.session.selection().await;
    let translation = state.session.translation().await;

    let entry = match state.session.active_key().await {
        Some(key) => state.cache.get(&key).await,
        None => None,
    };

    let verses = match &entry {
        Some(PassageStatus::Success { passage }) => passage.display_verses(),
        _ => Vec::new(),
    };

    Json(ChapterView {
        selection,
        translation_label: types::translation_label(&translation),
        translation,
        entry,
        verses,
    })
}
