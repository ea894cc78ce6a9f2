//! Reader session state
//!
//! Explicit application-state struct for the reading view: active
//! translation, selected chapter, and the speech controller, plus a
//! generation counter for stale-result suppression. Selection changes
//! produce a `FetchAction` describing the single cache load to issue;
//! a completion whose generation no longer matches still lands in the
//! cache but emits no event for the now-different selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use halo_common::api::types::{self, TRANSLATIONS};
use halo_common::{catalog, Error, Result};

use crate::cache::{cache_key, PassageStatus};
use crate::speech::{SpeechController, SpeechEngine, SpeechState};

/// One addressable chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRef {
    pub book: String,
    pub chapter: u32,
}

impl ChapterRef {
    /// Human-readable reference string sent to providers ("John 3")
    pub fn reference(&self) -> String {
        format!("{} {}", self.book, self.chapter)
    }
}

/// The one cache load a selection change asks for
#[derive(Debug, Clone)]
pub struct FetchAction {
    pub key: String,
    pub reference: String,
    pub translation: String,
    pub generation: u64,
}

/// Session events, broadcast to any observers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// Active selection key changed (None when the reading pane closed)
    SelectionChanged {
        key: Option<String>,
        timestamp: DateTime<Utc>,
    },
    /// A chapter load finished while its selection was still active
    ChapterLoaded {
        key: String,
        success: bool,
        timestamp: DateTime<Utc>,
    },
    /// Speech playback state changed
    SpeechStateChanged {
        state: SpeechState,
        timestamp: DateTime<Utc>,
    },
    /// Reading progress changed
    ProgressChanged {
        completed: u32,
        percent: u32,
        timestamp: DateTime<Utc>,
    },
}

struct SessionState {
    translation: String,
    selection: Option<ChapterRef>,
    generation: u64,
    speech: SpeechController,
}

impl SessionState {
    fn active_key(&self) -> Option<String> {
        self.selection
            .as_ref()
            .map(|sel| cache_key(&self.translation, &sel.book, sel.chapter))
    }
}

/// Snapshot of session settings for the settings endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SpeechSnapshot {
    pub state: SpeechState,
    pub rate: f32,
    pub supported: bool,
}

/// Shared reader session
pub struct ReaderSession {
    inner: RwLock<SessionState>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl ReaderSession {
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            inner: RwLock::new(SessionState {
                translation: "kjv".to_string(),
                selection: None,
                generation: 0,
                speech: SpeechController::new(engine),
            }),
            event_tx,
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.event_tx.send(event);
    }

    pub async fn translation(&self) -> String {
        self.inner.read().await.translation.clone()
    }

    pub async fn selection(&self) -> Option<ChapterRef> {
        self.inner.read().await.selection.clone()
    }

    /// Cache key of the active selection, if a chapter is open
    pub async fn active_key(&self) -> Option<String> {
        self.inner.read().await.active_key()
    }

    /// Open a chapter. Always returns a `FetchAction` (the cache dedupes
    /// loads); when the active key actually changes, the generation is
    /// bumped and any playing speech is cancelled.
    pub async fn open_chapter(&self, book: &str, chapter: u32) -> Result<FetchAction> {
        if !catalog::is_valid_chapter(book, chapter) {
            return Err(Error::InvalidInput(format!(
                "Unknown chapter: {} {}",
                book, chapter
            )));
        }

        let mut inner = self.inner.write().await;
        let selection = ChapterRef {
            book: book.to_string(),
            chapter,
        };
        let new_key = cache_key(&inner.translation, book, chapter);
        let changed = inner.active_key().as_deref() != Some(new_key.as_str());

        inner.selection = Some(selection.clone());
        if changed {
            inner.generation += 1;
            inner.speech.interrupt();
            self.emit(SessionEvent::SelectionChanged {
                key: Some(new_key.clone()),
                timestamp: Utc::now(),
            });
        }

        Ok(FetchAction {
            key: new_key,
            reference: selection.reference(),
            translation: inner.translation.clone(),
            generation: inner.generation,
        })
    }

    /// Close the reading pane
    pub async fn close_chapter(&self) {
        let mut inner = self.inner.write().await;
        if inner.selection.take().is_some() {
            inner.generation += 1;
            inner.speech.interrupt();
            self.emit(SessionEvent::SelectionChanged {
                key: None,
                timestamp: Utc::now(),
            });
        }
    }

    /// Switch the active translation.
    ///
    /// Re-keys the open selection (forcing a fresh `ensure` under the new
    /// key) without touching other cached entries; cancels speech so stale
    /// audio never plays over the re-fetched passage.
    pub async fn set_translation(&self, code: &str) -> Result<Option<FetchAction>> {
        if !TRANSLATIONS.iter().any(|t| t.id == code) {
            return Err(Error::InvalidInput(format!(
                "Unknown translation: {}",
                code
            )));
        }

        let mut inner = self.inner.write().await;
        if inner.translation == code {
            return Ok(None);
        }

        inner.translation = code.to_string();
        inner.generation += 1;
        inner.speech.interrupt();

        let action = inner.selection.clone().map(|selection| {
            let key = cache_key(&inner.translation, &selection.book, selection.chapter);
            self.emit(SessionEvent::SelectionChanged {
                key: Some(key.clone()),
                timestamp: Utc::now(),
            });
            FetchAction {
                key,
                reference: selection.reference(),
                translation: inner.translation.clone(),
                generation: inner.generation,
            }
        });

        Ok(action)
    }

    /// Record a finished load.
    ///
    /// Emits `ChapterLoaded` only when the action's generation is still
    /// current; a stale completion is logged and suppressed (the cache
    /// entry it wrote stays put for a later re-open). Returns whether the
    /// event was emitted.
    pub async fn complete_fetch(&self, action: &FetchAction, status: &PassageStatus) -> bool {
        let inner = self.inner.read().await;
        if inner.generation != action.generation {
            tracing::debug!(
                key = %action.key,
                generation = action.generation,
                current = inner.generation,
                "Stale chapter load suppressed"
            );
            return false;
        }

        self.emit(SessionEvent::ChapterLoaded {
            key: action.key.clone(),
            success: status.is_success(),
            timestamp: Utc::now(),
        });
        true
    }

    /// Progress changed (toggle or plan completion); fan out to observers
    pub fn notify_progress(&self, completed: u32, percent: u32) {
        self.emit(SessionEvent::ProgressChanged {
            completed,
            percent,
            timestamp: Utc::now(),
        });
    }

    pub async fn speech_snapshot(&self) -> SpeechSnapshot {
        let inner = self.inner.read().await;
        SpeechSnapshot {
            state: inner.speech.state(),
            rate: inner.speech.rate(),
            supported: inner.speech.supported(),
        }
    }

    /// Start speaking the given cache entry (the active chapter's)
    pub async fn speech_play(&self, entry: &PassageStatus) -> bool {
        let mut inner = self.inner.write().await;
        let started = inner.speech.play(entry);
        if started {
            let state = inner.speech.state();
            self.emit(SessionEvent::SpeechStateChanged {
                state,
                timestamp: Utc::now(),
            });
        }
        started
    }

    pub async fn speech_pause(&self) {
        self.speech_transition(SpeechController::pause).await;
    }

    pub async fn speech_resume(&self) {
        self.speech_transition(SpeechController::resume).await;
    }

    pub async fn speech_stop(&self) {
        self.speech_transition(SpeechController::stop).await;
    }

    pub async fn set_speech_rate(&self, rate: f32) -> f32 {
        let mut inner = self.inner.write().await;
        inner.speech.set_rate(rate);
        inner.speech.rate()
    }

    async fn speech_transition(&self, op: fn(&mut SpeechController)) {
        let mut inner = self.inner.write().await;
        let before = inner.speech.state();
        op(&mut inner.speech);
        let after = inner.speech.state();
        if before != after {
            self.emit(SessionEvent::SpeechStateChanged {
                state: after,
                timestamp: Utc::now(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::NullEngine;
    use halo_common::api::types::PassageResponse;

    fn session() -> ReaderSession {
        ReaderSession::new(Arc::new(NullEngine))
    }

    fn success(reference: &str) -> PassageStatus {
        PassageStatus::Success {
            passage: PassageResponse {
                reference: reference.to_string(),
                text: Some("1 Text.".to_string()),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_open_chapter_produces_action() {
        let session = session();
        let action = session.open_chapter("John", 3).await.unwrap();
        assert_eq!(action.key, "kjv:John:3");
        assert_eq!(action.reference, "John 3");
        assert_eq!(session.active_key().await.as_deref(), Some("kjv:John:3"));
    }

    #[tokio::test]
    async fn test_open_invalid_chapter_rejected() {
        let session = session();
        assert!(session.open_chapter("John", 22).await.is_err());
        assert!(session.open_chapter("Hezekiah", 1).await.is_err());
        assert!(session.selection().await.is_none());
    }

    #[tokio::test]
    async fn test_reopening_same_chapter_keeps_generation() {
        let session = session();
        let first = session.open_chapter("John", 3).await.unwrap();
        let second = session.open_chapter("John", 3).await.unwrap();
        assert_eq!(first.generation, second.generation);

        let third = session.open_chapter("John", 4).await.unwrap();
        assert!(third.generation > second.generation);
    }

    #[tokio::test]
    async fn test_translation_switch_rekeys_selection() {
        let session = session();
        session.open_chapter("John", 3).await.unwrap();

        let action = session.set_translation("web").await.unwrap().unwrap();
        assert_eq!(action.key, "web:John:3");
        assert_eq!(session.translation().await, "web");

        // Same code again: no re-fetch
        assert!(session.set_translation("web").await.unwrap().is_none());
        // Unknown code: rejected
        assert!(session.set_translation("klingon").await.is_err());
    }

    #[tokio::test]
    async fn test_translation_switch_without_selection() {
        let session = session();
        let action = session.set_translation("esv").await.unwrap();
        assert!(action.is_none());
    }

    #[tokio::test]
    async fn test_stale_completion_suppressed() {
        let session = session();
        let mut events = session.subscribe();

        let stale = session.open_chapter("John", 3).await.unwrap();
        session.open_chapter("Mark", 1).await.unwrap();

        // The John 3 load finishes after the selection moved on
        assert!(!session.complete_fetch(&stale, &success("John 3")).await);

        let current = session.open_chapter("Mark", 1).await.unwrap();
        assert!(session.complete_fetch(&current, &success("Mark 1")).await);

        // Observed events: two selection changes, then exactly one load
        let mut loaded_keys = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let SessionEvent::ChapterLoaded { key, .. } = event {
                loaded_keys.push(key);
            }
        }
        assert_eq!(loaded_keys, vec!["kjv:Mark:1".to_string()]);
    }

    #[tokio::test]
    async fn test_close_clears_selection() {
        let session = session();
        session.open_chapter("John", 3).await.unwrap();
        session.close_chapter().await;
        assert!(session.selection().await.is_none());
        assert!(session.active_key().await.is_none());
        // Closing again is a no-op
        session.close_chapter().await;
    }

    #[tokio::test]
    async fn test_speech_rate_clamped_through_session() {
        let session = session();
        assert_eq!(session.set_speech_rate(9.0).await, 1.4);
        assert_eq!(session.set_speech_rate(0.0).await, 0.7);
    }
}
