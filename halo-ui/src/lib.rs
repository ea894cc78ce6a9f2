//! halo-ui library - reading tracker service
//!
//! Hosts the passage passthrough endpoint and the reading-session API:
//! plan derivation, progress tracking, chapter selection with a passage
//! cache in front of the two text providers, and speech playback control.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cache;
pub mod error;
pub mod providers;
pub mod session;
pub mod speech;
pub mod store;

use cache::PassageCache;
use providers::Providers;
use session::{FetchAction, ReaderSession};
use speech::SpeechEngine;
use store::ProgressStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Progress map and daily goal, write-through persisted
    pub store: Arc<ProgressStore>,
    /// Passage cache (never evicted; keyspace is bounded)
    pub cache: Arc<PassageCache>,
    /// Reader session: translation, selection, speech
    pub session: Arc<ReaderSession>,
    /// Outbound provider clients
    pub providers: Arc<Providers>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        store: ProgressStore,
        providers: Providers,
        engine: Arc<dyn SpeechEngine>,
    ) -> Self {
        Self {
            store: Arc::new(store),
            cache: Arc::new(PassageCache::new()),
            session: Arc::new(ReaderSession::new(engine)),
            providers: Arc::new(providers),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/bible", get(api::get_passage))
        .route("/api/plan", get(api::get_plan))
        .route("/api/plan/complete", post(api::complete_plan))
        .route("/api/progress", get(api::get_progress))
        .route("/api/progress/toggle", post(api::toggle_chapter))
        .route("/api/settings", get(api::get_settings).put(api::update_settings))
        .route("/api/chapter", get(api::get_chapter))
        .route("/api/chapter/open", post(api::open_chapter))
        .route("/api/chapter/close", post(api::close_chapter))
        .route("/api/speech", post(api::speech_control))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run one chapter load to completion: cache `ensure` with the provider
/// loader, then report back to the session (which drops the event if the
/// selection moved on — the cache entry stays either way).
pub async fn load_chapter(state: &AppState, action: FetchAction) {
    let providers = state.providers.clone();
    let reference = action.reference.clone();
    let translation = action.translation.clone();

    let status = state
        .cache
        .ensure(&action.key, || async move {
            providers::fetch_normalized(&providers, &reference, &translation).await
        })
        .await;

    state.session.complete_fetch(&action, &status).await;
}

/// Fire-and-forget a chapter load on the runtime
pub fn spawn_chapter_load(state: &AppState, action: FetchAction) {
    let state = state.clone();
    tokio::spawn(async move {
        load_chapter(&state, action).await;
    });
}
