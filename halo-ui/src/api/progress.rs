//! Progress report and toggle endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use halo_common::catalog::{self, Testament};

use crate::error::{ApiError, ApiResult};
use crate::store::ProgressSummary;
use crate::AppState;

/// Query parameters for the progress report
#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    /// Optional case-insensitive book name filter
    pub q: Option<String>,
}

/// Per-book completion line
#[derive(Debug, Serialize)]
pub struct BookProgress {
    pub name: &'static str,
    pub chapters: u32,
    pub testament: Testament,
    pub completed: u32,
}

/// Full progress report
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub summary: ProgressSummary,
    pub books: Vec<BookProgress>,
}

/// GET /api/progress?q=<book filter>
pub async fn get_progress(
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
) -> Json<ProgressResponse> {
    let progress = state.store.progress();
    let books = catalog::search_books(query.q.as_deref().unwrap_or(""))
        .into_iter()
        .map(|book| BookProgress {
            name: book.name,
            chapters: book.chapters,
            testament: book.testament,
            completed: progress.book_completed(book.name),
        })
        .collect();

    Json(ProgressResponse {
        summary: state.store.summary(),
        books,
    })
}

/// Body for POST /api/progress/toggle
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub book: String,
    pub chapter: u32,
}

/// Result of a toggle
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub book: String,
    pub chapter: u32,
    /// Read state after the toggle
    pub read: bool,
    pub summary: ProgressSummary,
}

/// POST /api/progress/toggle
pub async fn toggle_chapter(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> ApiResult<Json<ToggleResponse>> {
    if !catalog::is_valid_chapter(&request.book, request.chapter) {
        return Err(ApiError::BadRequest(format!(
            "Unknown chapter: {} {}",
            request.book, request.chapter
        )));
    }

    let progress = state.store.toggle(&request.book, request.chapter)?;
    let summary = state.store.summary();
    state
        .session
        .notify_progress(summary.completed, summary.percent);

    Ok(Json(ToggleResponse {
        read: progress.is_read(&request.book, request.chapter),
        book: request.book,
        chapter: request.chapter,
        summary,
    }))
}
