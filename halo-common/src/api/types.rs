//! Wire types for the passage API
//!
//! Shared between the HTTP handlers, the provider clients, and the
//! integration tests so both sides agree on the JSON shapes.

use serde::{Deserialize, Serialize};

use crate::verses::Verse;

/// Translation codes accepted by the free provider
pub const FREE_TRANSLATIONS: [&str; 4] = ["kjv", "asv", "web", "bbe"];

/// Fallback translation when an unrecognized code is requested
pub const DEFAULT_TRANSLATION: &str = "web";

/// Translation code routed to the credentialed provider
pub const CREDENTIALED_TRANSLATION: &str = "esv";

/// One selectable translation
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TranslationOption {
    pub id: &'static str,
    pub label: &'static str,
}

/// The selectable translations, in display order
pub const TRANSLATIONS: [TranslationOption; 5] = [
    TranslationOption { id: "kjv", label: "King James Version (KJV)" },
    TranslationOption { id: "esv", label: "English Standard Version (ESV)" },
    TranslationOption { id: "asv", label: "American Standard Version (ASV)" },
    TranslationOption { id: "web", label: "World English Bible (WEB)" },
    TranslationOption { id: "bbe", label: "Bible in Basic English (BBE)" },
];

/// Whether a translation code routes to the credentialed provider
pub fn is_credentialed(code: &str) -> bool {
    code == CREDENTIALED_TRANSLATION
}

/// Map a requested code onto the free provider's whitelist, falling back to
/// the default translation for anything unrecognized.
pub fn sanitize_free_translation(code: &str) -> &str {
    if FREE_TRANSLATIONS.contains(&code) {
        code
    } else {
        DEFAULT_TRANSLATION
    }
}

/// Display label for a translation code (uppercased code when unknown)
pub fn translation_label(code: &str) -> String {
    TRANSLATIONS
        .iter()
        .find(|t| t.id == code)
        .map(|t| t.label.to_string())
        .unwrap_or_else(|| code.to_uppercase())
}

/// Normalized passage payload returned by `/api/bible`
///
/// Either `verses` (already split by the provider) or `text` (a raw blob the
/// caller may run through the verse parser) is present on success; `verses`
/// is preferred when both are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassageResponse {
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verses: Option<Vec<Verse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl PassageResponse {
    /// Verses to display: provider-split verses when present and non-empty,
    /// else the text blob run through the verse parser, else nothing (the
    /// caller falls back to rendering the raw blob).
    pub fn display_verses(&self) -> Vec<Verse> {
        if let Some(verses) = &self.verses {
            if !verses.is_empty() {
                return verses.clone();
            }
        }
        if let Some(text) = &self.text {
            let parsed = crate::verses::parse_verses(text);
            if !parsed.is_empty() {
                return parsed;
            }
        }
        Vec::new()
    }

    /// Flattened utterance text for speech playback: joined verse texts when
    /// verses are available, else the whitespace-collapsed blob. Empty string
    /// when the passage carries no speakable text.
    pub fn utterance_text(&self) -> String {
        let verses = self.display_verses();
        if !verses.is_empty() {
            return verses
                .iter()
                .map(|v| crate::verses::collapse_whitespace(&v.text))
                .collect::<Vec<_>>()
                .join(" ");
        }
        self.text
            .as_deref()
            .map(crate::verses::collapse_whitespace)
            .unwrap_or_default()
    }
}

/// Flat error body emitted by every failing API path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
