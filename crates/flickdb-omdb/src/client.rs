//! HTTP client for the OMDb REST API.
//!
//! Wraps `reqwest` with OMDb-specific error handling, API key management,
//! and payload deserialization. OMDb signals application errors in-band
//! with `"Response": "False"`; those surface as [`OmdbError::Api`].

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::OmdbError;
use crate::resolver::{
    ByIdStrategy, ByTitleStrategy, IdConvention, MetadataSource, StrategyCall, TitleConvention,
};
use crate::types::{RawDetail, SearchPayload};

const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Client for the OMDb REST API.
///
/// Manages the HTTP client, API key, and base URL. Use [`OmdbClient::new`]
/// for production or [`OmdbClient::with_base_url`] to point at a mock
/// server in tests.
pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl OmdbClient {
    /// Creates a new client pointed at the production OMDb API.
    ///
    /// # Errors
    ///
    /// Returns [`OmdbError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, OmdbError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`OmdbError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`OmdbError::Api`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, OmdbError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("flickdb/0.1 (movie-catalog)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // query_pairs_mut writes to the root path rather than replacing the
        // last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| OmdbError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Searches for movies by title.
    ///
    /// Calls `?s=<title>&type=movie&page=<n>` and returns the raw
    /// [`SearchPayload`] — envelope unwrapping is the caller's concern.
    ///
    /// # Errors
    ///
    /// - [`OmdbError::Api`] if OMDb answers `"Response": "False"`.
    /// - [`OmdbError::Http`] on network failure or non-2xx HTTP status.
    /// - [`OmdbError::Deserialize`] if the body matches no known shape.
    pub async fn search_movies(&self, title: &str, page: u32) -> Result<SearchPayload, OmdbError> {
        let url = self.build_url(&[("s", title), ("type", "movie"), ("page", &page.to_string())]);
        let body = self.request_json(&url).await?;
        Self::check_api_error(&body)?;

        serde_json::from_value(body).map_err(|e| OmdbError::Deserialize {
            context: format!("search(title={title})"),
            source: e,
        })
    }

    /// Fetches full detail for a movie by IMDb ID (`?i=<id>&plot=full`).
    ///
    /// # Errors
    ///
    /// - [`OmdbError::Api`] unless OMDb answers `"Response": "True"` — a
    ///   payload without an affirmative response is treated as no result.
    /// - [`OmdbError::Http`] on network failure or non-2xx HTTP status.
    /// - [`OmdbError::Deserialize`] if the body is not valid JSON.
    pub async fn get_movie_details(&self, imdb_id: &str) -> Result<RawDetail, OmdbError> {
        let url = self.build_url(&[("i", imdb_id), ("plot", "full")]);
        let body = self.request_json(&url).await?;
        Self::check_detail_response(&body)?;

        serde_json::from_value(body).map_err(|e| OmdbError::Deserialize {
            context: format!("detail(i={imdb_id})"),
            source: e,
        })
    }

    /// Fetches detail for a movie by exact title (`?t=<title>`), with an
    /// optional release-year hint (`&y=<year>`).
    ///
    /// # Errors
    ///
    /// Same contract as [`OmdbClient::get_movie_details`].
    pub async fn get_by_title(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> Result<RawDetail, OmdbError> {
        let mut params = vec![("t", title.to_owned())];
        if let Some(y) = year {
            params.push(("y", y.to_string()));
        }
        let borrowed: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let url = self.build_url(&borrowed);
        let body = self.request_json(&url).await?;
        Self::check_detail_response(&body)?;

        serde_json::from_value(body).map_err(|e| OmdbError::Deserialize {
            context: format!("detail(t={title})"),
            source: e,
        })
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters, appending the API key last.
    fn build_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("apikey", &self.api_key);
        }
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the
    /// response body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, OmdbError> {
        tracing::debug!(path = url.path(), "requesting OMDb");
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| OmdbError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }

    /// Rejects payloads that carry an explicit `"Response": "False"`.
    fn check_api_error(body: &serde_json::Value) -> Result<(), OmdbError> {
        if body.get("Response").and_then(serde_json::Value::as_str) == Some("False") {
            return Err(OmdbError::Api(Self::upstream_message(body)));
        }
        Ok(())
    }

    /// Accepts only payloads with an affirmative `"Response": "True"`; used
    /// for detail lookups, where anything else means no result.
    fn check_detail_response(body: &serde_json::Value) -> Result<(), OmdbError> {
        if body.get("Response").and_then(serde_json::Value::as_str) == Some("True") {
            return Ok(());
        }
        Err(OmdbError::Api(Self::upstream_message(body)))
    }

    fn upstream_message(body: &serde_json::Value) -> String {
        body.get("Error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown error")
            .to_string()
    }
}

/// Direct binding: the interface of this client is known, so exactly one
/// strategy/convention pair answers per ladder and probing degenerates to a
/// single call. An upstream "not found" answer is an empty hit, not a
/// failure.
impl MetadataSource for OmdbClient {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPayload, OmdbError> {
        self.search_movies(query, page).await
    }

    async fn probe_by_id(
        &self,
        strategy: ByIdStrategy,
        convention: IdConvention,
        imdb_id: &str,
    ) -> StrategyCall {
        if strategy != ByIdStrategy::GetByImdbId || convention != IdConvention::Positional {
            return StrategyCall::Unsupported;
        }
        match self.get_movie_details(imdb_id).await {
            Ok(raw) => StrategyCall::Hit(Some(raw)),
            Err(OmdbError::Api(_)) => StrategyCall::Hit(None),
            Err(err) => StrategyCall::Failed(err.to_string()),
        }
    }

    async fn probe_by_title(
        &self,
        strategy: ByTitleStrategy,
        convention: TitleConvention,
        title: &str,
        year: Option<i32>,
    ) -> StrategyCall {
        if strategy != ByTitleStrategy::Get || convention != TitleConvention::KeywordTitle {
            return StrategyCall::Unsupported;
        }
        match self.get_by_title(title, year).await {
            Ok(raw) => StrategyCall::Hit(Some(raw)),
            Err(OmdbError::Api(_)) => StrategyCall::Hit(None),
            Err(err) => StrategyCall::Failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> OmdbClient {
        OmdbClient::with_base_url("test-key", 10, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_constructs_correct_query_string() {
        let client = test_client("https://www.omdbapi.com");
        let url = client.build_url(&[("i", "tt0133093"), ("plot", "full")]);
        assert_eq!(
            url.as_str(),
            "https://www.omdbapi.com/?i=tt0133093&plot=full&apikey=test-key"
        );
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client("https://www.omdbapi.com/");
        let url = client.build_url(&[("s", "matrix"), ("type", "movie"), ("page", "1")]);
        assert_eq!(
            url.as_str(),
            "https://www.omdbapi.com/?s=matrix&type=movie&page=1&apikey=test-key"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://www.omdbapi.com");
        let url = client.build_url(&[("s", "fast & furious")]);
        assert!(
            url.as_str().contains("fast+%26+furious")
                || url.as_str().contains("fast%20%26%20furious"),
            "query param should be percent-encoded: {url}"
        );
    }
}
