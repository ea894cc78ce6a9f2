//! bible-api.com client (free provider)
//!
//! Serves the kjv/asv/web/bbe translations. The response body is kept as raw
//! JSON so the passthrough endpoint can forward it together with the
//! provider's status code.

use serde_json::Value;

use super::{build_http_client, ProviderError};

pub const BIBLE_API_BASE_URL: &str = "https://bible-api.com";

/// Raw provider response: status code plus undecoded JSON body
#[derive(Debug, Clone)]
pub struct RawPassage {
    pub status: u16,
    pub body: Value,
}

/// Free passage provider client
pub struct BibleApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl BibleApiClient {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(BIBLE_API_BASE_URL.to_string())
    }

    /// Client against a specific base URL (tests point this at a mock server)
    pub fn with_base_url(base_url: String) -> Result<Self, ProviderError> {
        Ok(Self {
            http_client: build_http_client()?,
            base_url,
        })
    }

    /// Fetch a passage for a whitelisted translation code.
    ///
    /// The caller is responsible for sanitizing the translation first; this
    /// client sends whatever code it is given. The reference goes into the
    /// URL path, percent-encoded.
    pub async fn fetch_passage(
        &self,
        reference: &str,
        translation: &str,
    ) -> Result<RawPassage, ProviderError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Network("invalid provider base URL".to_string()))?
            .push(reference);
        url.query_pairs_mut()
            .append_pair("translation", translation)
            .append_pair("single_chapter_book_matching", "indifferent");

        tracing::debug!(reference = %reference, translation = %translation, url = %url, "Querying bible-api.com");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        tracing::debug!(status_code = status, "bible-api.com response");

        Ok(RawPassage { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(BibleApiClient::new().is_ok());
    }
}
