//! ESV API client (credentialed provider)
//!
//! Calls `api.esv.org` with a server-held key and normalizes the response to
//! the common passage shape: passages joined into one text blob, canonical
//! reference, optional copyright line. Verse splitting happens downstream in
//! the verse parser since the ESV text endpoint returns plain text.

use serde::Deserialize;

use halo_common::api::types::PassageResponse;

use super::{build_http_client, ProviderError};

pub const ESV_BASE_URL: &str = "https://api.esv.org/v3/passage/text/";

/// Fixed query flags: inline verse numbers on, everything decorative off,
/// no wrapping so newlines only separate verses.
const ESV_QUERY_FLAGS: [(&str, &str); 8] = [
    ("include-verse-numbers", "true"),
    ("include-footnotes", "false"),
    ("include-headings", "false"),
    ("include-short-copyright", "true"),
    ("include-passage-references", "false"),
    ("indent-poetry", "false"),
    ("indent-paragraphs", "false"),
    ("line-length", "0"),
];

#[derive(Debug, Deserialize)]
struct EsvBody {
    passages: Option<Vec<String>>,
    canonical: Option<String>,
    copyright: Option<String>,
    detail: Option<String>,
    error: Option<String>,
}

/// Credentialed passage provider client
pub struct EsvClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EsvClient {
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        Self::with_base_url(ESV_BASE_URL.to_string(), api_key)
    }

    /// Client against a specific base URL (tests point this at a mock server)
    pub fn with_base_url(base_url: String, api_key: String) -> Result<Self, ProviderError> {
        Ok(Self {
            http_client: build_http_client()?,
            base_url,
            api_key,
        })
    }

    /// Fetch a passage and normalize it to `{reference, text, copyright?}`
    pub async fn fetch_passage(&self, reference: &str) -> Result<PassageResponse, ProviderError> {
        tracing::debug!(reference = %reference, "Querying ESV API");

        let response = self
            .http_client
            .get(&self.base_url)
            .header("Authorization", format!("Token {}", self.api_key))
            .query(&ESV_QUERY_FLAGS)
            .query(&[("q", reference)])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        // The body may be empty or non-JSON on errors; treat that as absent
        let body: Option<EsvBody> = serde_json::from_str(&raw).ok();

        if !status.is_success() {
            let message = body
                .and_then(|b| b.detail.or(b.error))
                .unwrap_or_else(|| "Unable to load this chapter.".to_string());
            tracing::warn!(status_code = status.as_u16(), "ESV API error response");
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = body.ok_or_else(|| ProviderError::Parse("malformed ESV body".to_string()))?;
        Ok(normalize(reference, body))
    }
}

fn normalize(requested_ref: &str, body: EsvBody) -> PassageResponse {
    let text = body
        .passages
        .unwrap_or_default()
        .join("\n\n")
        .trim()
        .to_string();

    PassageResponse {
        reference: body
            .canonical
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| requested_ref.to_string()),
        verses: None,
        text: Some(text),
        copyright: body.copyright,
    }
}
