//! Outbound passage provider clients
//!
//! Two third-party text providers sit behind this module: the free
//! bible-api.com endpoint (kjv/asv/web/bbe) and the credentialed ESV API.
//! Both are stateless per call; the passage cache above them is what keeps
//! repeat traffic off the network.

mod bible_api;
mod esv;

pub use bible_api::{BibleApiClient, RawPassage};
pub use esv::EsvClient;

use halo_common::api::types::{self, PassageResponse};
use halo_common::verses::Verse;
use thiserror::Error;

/// HTTP client defaults shared by both providers
pub(crate) const USER_AGENT: &str = concat!("Halo/", env!("CARGO_PKG_VERSION"));
pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Provider client errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Provider error {status}: {message}")]
    Upstream { status: u16, message: String },
}

/// The provider clients available to this process
pub struct Providers {
    pub bible_api: BibleApiClient,
    /// Present only when an ESV key is configured
    pub esv: Option<EsvClient>,
}

/// Fetch a passage and normalize it to the common shape, routing by
/// translation code.
///
/// This is the in-process twin of the `/api/bible` endpoint: the free
/// provider's JSON is reduced to `{reference, verses?, text?, copyright?}`,
/// the ESV provider is already normalized by its client. Used by the reader
/// session's cache loader.
pub async fn fetch_normalized(
    providers: &Providers,
    reference: &str,
    translation: &str,
) -> Result<PassageResponse, String> {
    if types::is_credentialed(translation) {
        let Some(esv) = providers.esv.as_ref() else {
            return Err("ESV requires an API key. Set ESV_API_KEY on the server.".to_string());
        };
        return esv.fetch_passage(reference).await.map_err(user_message);
    }

    let translation = types::sanitize_free_translation(translation);
    let raw = providers
        .bible_api
        .fetch_passage(reference, translation)
        .await
        .map_err(user_message)?;

    if !(200..300).contains(&raw.status) {
        let message = raw
            .body
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or("Unable to load this chapter.")
            .to_string();
        return Err(message);
    }

    Ok(normalize_free_body(reference, &raw.body))
}

/// Reduce the free provider's response body to the common passage shape
fn normalize_free_body(requested_ref: &str, body: &serde_json::Value) -> PassageResponse {
    let verses = body.get("verses").and_then(|v| v.as_array()).map(|items| {
        items
            .iter()
            .filter_map(|item| {
                let number = item.get("verse")?.as_u64()? as u32;
                let text = item.get("text")?.as_str()?.trim().to_string();
                Some(Verse {
                    verse: number,
                    text,
                })
            })
            .collect::<Vec<_>>()
    });

    let text = body
        .get("text")
        .and_then(|t| t.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let reference = body
        .get("reference")
        .and_then(|r| r.as_str())
        .unwrap_or(requested_ref)
        .to_string();

    PassageResponse {
        reference,
        verses,
        text,
        copyright: None,
    }
}

fn user_message(err: ProviderError) -> String {
    match err {
        ProviderError::Upstream { message, .. } => message,
        ProviderError::Network(_) | ProviderError::Parse(_) => {
            "Unable to load this chapter right now.".to_string()
        }
    }
}

pub(crate) fn build_http_client() -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| ProviderError::Network(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_free_body_with_verses() {
        let body = json!({
            "reference": "John 3:16",
            "verses": [
                { "verse": 16, "text": "For God so loved the world...\n", "book_id": "JHN" }
            ],
            "text": "For God so loved the world...\n"
        });
        let passage = normalize_free_body("John 3:16", &body);
        assert_eq!(passage.reference, "John 3:16");
        let verses = passage.verses.unwrap();
        assert_eq!(verses.len(), 1);
        assert_eq!(verses[0].verse, 16);
        assert_eq!(verses[0].text, "For God so loved the world...");
        assert_eq!(passage.text.as_deref(), Some("For God so loved the world..."));
    }

    #[test]
    fn test_normalize_free_body_falls_back_to_request_ref() {
        let body = json!({ "text": "  " });
        let passage = normalize_free_body("Jude 1", &body);
        assert_eq!(passage.reference, "Jude 1");
        assert!(passage.verses.is_none());
        // Whitespace-only text is treated as absent
        assert!(passage.text.is_none());
    }
}
