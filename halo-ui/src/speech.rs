//! Speech playback controller
//!
//! Small state machine (`idle -> speaking -> paused -> idle`) over a narrow
//! speech-engine capability interface. The engine itself is a host
//! integration (browser speech synthesis, OS TTS); everything here only
//! assumes it can speak one utterance at a time and report completion.

use std::sync::Arc;

use serde::Serialize;

use crate::cache::PassageStatus;

/// Supported utterance rate range
pub const MIN_RATE: f32 = 0.7;
pub const MAX_RATE: f32 = 1.4;
const DEFAULT_RATE: f32 = 1.0;

/// Voice names tried first, in order, by case-insensitive substring match
const PREFERRED_VOICES: [&str; 7] = [
    "Samantha",
    "Ava",
    "Karen",
    "Moira",
    "Google US English",
    "Google UK English Female",
    "Microsoft Zira",
];

/// One available voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceInfo {
    /// Engine-assigned stable identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// BCP-47 locale tag (e.g. "en-US")
    pub lang: String,
}

/// Narrow capability interface over a text-to-speech engine
pub trait SpeechEngine: Send + Sync {
    /// Voices currently available (may be empty)
    fn voices(&self) -> Vec<VoiceInfo>;
    /// Begin speaking an utterance, replacing any current one
    fn speak(&self, text: &str, rate: f32, voice_id: Option<&str>);
    fn pause(&self);
    fn resume(&self);
    /// Cancel the current utterance, if any
    fn cancel(&self);
}

/// Engine stand-in for hosts without speech synthesis: no voices, all
/// operations no-ops. `SpeechController::supported` reports false over it.
pub struct NullEngine;

impl SpeechEngine for NullEngine {
    fn voices(&self) -> Vec<VoiceInfo> {
        Vec::new()
    }
    fn speak(&self, _text: &str, _rate: f32, _voice_id: Option<&str>) {}
    fn pause(&self) {}
    fn resume(&self) {}
    fn cancel(&self) {}
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechState {
    Idle,
    Speaking,
    Paused,
}

/// Pick the default voice: preference list first, then any English-like
/// locale, then the first voice. None when the list is empty (playback
/// unsupported).
pub fn pick_preferred_voice(voices: &[VoiceInfo]) -> Option<&VoiceInfo> {
    if voices.is_empty() {
        return None;
    }
    for name in PREFERRED_VOICES {
        let needle = name.to_lowercase();
        if let Some(voice) = voices.iter().find(|v| v.name.to_lowercase().contains(&needle)) {
            return Some(voice);
        }
    }
    voices
        .iter()
        .find(|v| v.lang.starts_with("en"))
        .or_else(|| voices.first())
}

/// Speech playback state machine
pub struct SpeechController {
    engine: Arc<dyn SpeechEngine>,
    state: SpeechState,
    rate: f32,
    voice_id: Option<String>,
}

impl SpeechController {
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        let voice_id = pick_preferred_voice(&engine.voices()).map(|v| v.id.clone());
        Self {
            engine,
            state: SpeechState::Idle,
            rate: DEFAULT_RATE,
            voice_id,
        }
    }

    pub fn state(&self) -> SpeechState {
        self.state
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn voice_id(&self) -> Option<&str> {
        self.voice_id.as_deref()
    }

    /// Playback is unsupported when the engine exposes no voices
    pub fn supported(&self) -> bool {
        !self.engine.voices().is_empty()
    }

    /// Clamp and set the utterance rate (applies to the next `play`)
    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate.clamp(MIN_RATE, MAX_RATE);
    }

    /// Select a voice by id; unknown ids are ignored
    pub fn set_voice(&mut self, voice_id: &str) -> bool {
        if self.engine.voices().iter().any(|v| v.id == voice_id) {
            self.voice_id = Some(voice_id.to_string());
            true
        } else {
            false
        }
    }

    /// Start speaking the passage. No-op (returns false) unless the entry is
    /// a loaded success with non-empty derived text and the engine has
    /// voices. Replaces any utterance already in flight.
    pub fn play(&mut self, entry: &PassageStatus) -> bool {
        let PassageStatus::Success { passage } = entry else {
            return false;
        };
        if !self.supported() {
            return false;
        }
        let text = passage.utterance_text();
        if text.is_empty() {
            return false;
        }

        self.engine.cancel();
        self.engine.speak(&text, self.rate, self.voice_id.as_deref());
        self.state = SpeechState::Speaking;
        tracing::debug!(reference = %passage.reference, rate = self.rate, "Speech started");
        true
    }

    pub fn pause(&mut self) {
        if self.state == SpeechState::Speaking {
            self.engine.pause();
            self.state = SpeechState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == SpeechState::Paused {
            self.engine.resume();
            self.state = SpeechState::Speaking;
        }
    }

    pub fn stop(&mut self) {
        if self.state != SpeechState::Idle {
            self.engine.cancel();
            self.state = SpeechState::Idle;
        }
    }

    /// Forced cancellation on selection or translation change: stale audio
    /// must not play over a newly selected passage.
    pub fn interrupt(&mut self) {
        if self.state != SpeechState::Idle {
            tracing::debug!("Speech interrupted by selection change");
        }
        self.engine.cancel();
        self.state = SpeechState::Idle;
    }

    /// Engine reported natural completion of the utterance
    pub fn on_utterance_end(&mut self) {
        self.state = SpeechState::Idle;
    }

    /// Engine reported an utterance error
    pub fn on_utterance_error(&mut self) {
        self.state = SpeechState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_common::api::types::PassageResponse;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubCalls {
        spoken: Vec<(String, String)>, // (text, voice_id or "")
        cancels: u32,
        pauses: u32,
        resumes: u32,
    }

    struct StubEngine {
        voices: Vec<VoiceInfo>,
        calls: Mutex<StubCalls>,
    }

    impl StubEngine {
        fn with_voices(voices: Vec<VoiceInfo>) -> Arc<Self> {
            Arc::new(Self {
                voices,
                calls: Mutex::new(StubCalls::default()),
            })
        }
    }

    impl SpeechEngine for StubEngine {
        fn voices(&self) -> Vec<VoiceInfo> {
            self.voices.clone()
        }
        fn speak(&self, text: &str, _rate: f32, voice_id: Option<&str>) {
            self.calls.lock().unwrap().spoken.push((
                text.to_string(),
                voice_id.unwrap_or("").to_string(),
            ));
        }
        fn pause(&self) {
            self.calls.lock().unwrap().pauses += 1;
        }
        fn resume(&self) {
            self.calls.lock().unwrap().resumes += 1;
        }
        fn cancel(&self) {
            self.calls.lock().unwrap().cancels += 1;
        }
    }

    fn voice(id: &str, name: &str, lang: &str) -> VoiceInfo {
        VoiceInfo {
            id: id.to_string(),
            name: name.to_string(),
            lang: lang.to_string(),
        }
    }

    fn loaded(text: &str) -> PassageStatus {
        PassageStatus::Success {
            passage: PassageResponse {
                reference: "John 3".to_string(),
                text: Some(text.to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_voice_preference_order() {
        let voices = vec![
            voice("v1", "Daniel", "en-GB"),
            voice("v2", "Google US English", "en-US"),
            voice("v3", "Samantha", "en-US"),
        ];
        assert_eq!(pick_preferred_voice(&voices).unwrap().id, "v3");

        let voices = vec![voice("v1", "Daniel", "en-GB"), voice("v2", "Thomas", "fr-FR")];
        assert_eq!(pick_preferred_voice(&voices).unwrap().id, "v1");

        let voices = vec![voice("v1", "Yuna", "ko-KR"), voice("v2", "Thomas", "fr-FR")];
        assert_eq!(pick_preferred_voice(&voices).unwrap().id, "v1");

        assert!(pick_preferred_voice(&[]).is_none());
    }

    #[test]
    fn test_full_playback_walk() {
        let engine = StubEngine::with_voices(vec![voice("v1", "Samantha", "en-US")]);
        let mut controller = SpeechController::new(engine.clone());
        assert!(controller.supported());
        assert_eq!(controller.state(), SpeechState::Idle);

        assert!(controller.play(&loaded("1 In the beginning.\n2 God created.")));
        assert_eq!(controller.state(), SpeechState::Speaking);

        controller.pause();
        assert_eq!(controller.state(), SpeechState::Paused);
        controller.resume();
        assert_eq!(controller.state(), SpeechState::Speaking);
        controller.stop();
        assert_eq!(controller.state(), SpeechState::Idle);

        let calls = engine.calls.lock().unwrap();
        assert_eq!(calls.spoken.len(), 1);
        assert_eq!(calls.spoken[0].0, "In the beginning. God created.");
        assert_eq!(calls.spoken[0].1, "v1");
        assert_eq!(calls.pauses, 1);
        assert_eq!(calls.resumes, 1);
        // One cancel before speak, one on stop
        assert_eq!(calls.cancels, 2);
    }

    #[test]
    fn test_play_requires_loaded_passage_and_text() {
        let engine = StubEngine::with_voices(vec![voice("v1", "Samantha", "en-US")]);
        let mut controller = SpeechController::new(engine.clone());

        assert!(!controller.play(&PassageStatus::Loading));
        assert!(!controller.play(&PassageStatus::Error {
            error: "boom".to_string()
        }));
        assert!(!controller.play(&loaded("   ")));
        assert_eq!(controller.state(), SpeechState::Idle);
        assert!(engine.calls.lock().unwrap().spoken.is_empty());
    }

    #[test]
    fn test_unsupported_without_voices() {
        let mut controller = SpeechController::new(Arc::new(NullEngine));
        assert!(!controller.supported());
        assert!(!controller.play(&loaded("1 Text.")));
    }

    #[test]
    fn test_rate_clamped() {
        let engine = StubEngine::with_voices(vec![voice("v1", "Samantha", "en-US")]);
        let mut controller = SpeechController::new(engine);
        controller.set_rate(3.0);
        assert_eq!(controller.rate(), MAX_RATE);
        controller.set_rate(0.1);
        assert_eq!(controller.rate(), MIN_RATE);
        controller.set_rate(1.05);
        assert_eq!(controller.rate(), 1.05);
    }

    #[test]
    fn test_interrupt_cancels_from_any_state() {
        let engine = StubEngine::with_voices(vec![voice("v1", "Samantha", "en-US")]);
        let mut controller = SpeechController::new(engine.clone());

        controller.play(&loaded("1 Text."));
        controller.pause();
        controller.interrupt();
        assert_eq!(controller.state(), SpeechState::Idle);

        // pause/resume are no-ops from idle
        controller.pause();
        controller.resume();
        assert_eq!(controller.state(), SpeechState::Idle);
    }

    #[test]
    fn test_engine_completion_resets_state() {
        let engine = StubEngine::with_voices(vec![voice("v1", "Samantha", "en-US")]);
        let mut controller = SpeechController::new(engine);

        controller.play(&loaded("1 Text."));
        controller.on_utterance_end();
        assert_eq!(controller.state(), SpeechState::Idle);

        controller.play(&loaded("1 Text."));
        controller.on_utterance_error();
        assert_eq!(controller.state(), SpeechState::Idle);
    }

    #[test]
    fn test_set_voice_rejects_unknown() {
        let engine = StubEngine::with_voices(vec![
            voice("v1", "Samantha", "en-US"),
            voice("v2", "Daniel", "en-GB"),
        ]);
        let mut controller = SpeechController::new(engine);
        assert_eq!(controller.voice_id(), Some("v1"));
        assert!(controller.set_voice("v2"));
        assert_eq!(controller.voice_id(), Some("v2"));
        assert!(!controller.set_voice("v9"));
        assert_eq!(controller.voice_id(), Some("v2"));
    }
}
