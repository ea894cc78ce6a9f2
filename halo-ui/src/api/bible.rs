//! Passage passthrough endpoint
//!
//! Normalizes requests to the two text providers. Free translations are
//! forwarded verbatim (body and status) from bible-api.com; `esv` goes to
//! the credentialed provider and comes back already normalized. Selecting
//! `esv` without a configured key fails before any outbound call.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use halo_common::api::types;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameters for GET /api/bible
#[derive(Debug, Deserialize)]
pub struct BibleQuery {
    /// Free-text scripture reference ("John 3:16", "Genesis 6:9-22")
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    /// Translation code; defaults to the free provider's default
    pub translation: Option<String>,
}

/// GET /api/bible?ref=<string>&translation=<code>
pub async fn get_passage(
    State(state): State<AppState>,
    Query(query): Query<BibleQuery>,
) -> ApiResult<Response> {
    let reference = query
        .reference
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or(ApiError::MissingReference)?;

    let translation = query.translation.as_deref().unwrap_or(types::DEFAULT_TRANSLATION);

    if types::is_credentialed(translation) {
        let esv = state.providers.esv.as_ref().ok_or(ApiError::EsvKeyMissing)?;
        let passage = esv.fetch_passage(reference).await?;
        return Ok(Json(passage).into_response());
    }

    let translation = types::sanitize_free_translation(translation);
    let raw = state
        .providers
        .bible_api
        .fetch_passage(reference, translation)
        .await?;

    // Pass the provider's body and status straight through
    let status = StatusCode::from_u16(raw.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(raw.body)).into_response())
}
