//! Raw OMDb payload shapes.
//!
//! Upstream movie data arrives in one of three shapes: a loose key/value
//! mapping (the OMDb wire format), a typed field struct (well-behaved
//! client libraries), or a bare title string. Each shape is resolved into a
//! tagged variant once, at the deserialization boundary; downstream code
//! matches on the variant instead of re-probing individual fields.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One movie-detail payload of unknown provenance.
///
/// Deserialization only ever produces `Map` (JSON objects) or `Text` (JSON
/// strings); the `Fields` variant is constructed directly by clients that
/// already hold typed data.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDetail {
    Map(Map<String, Value>),
    Text(String),
    Fields(DetailFields),
}

/// Typed detail fields from a client that returns structured data.
///
/// `Year`, `runtime`, and `genres` stay as [`Value`] because upstream
/// libraries disagree on whether they are numbers, strings, or lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailFields {
    pub title: Option<String>,
    pub year: Option<Value>,
    /// `imdb_id` takes precedence over the `imdbID` spelling.
    #[serde(alias = "imdbID")]
    pub imdb_id: Option<String>,
    pub plot: Option<String>,
    /// `runtime` takes precedence over `runtime_minutes`.
    pub runtime: Option<Value>,
    pub runtime_minutes: Option<Value>,
    pub genres: Option<Value>,
    #[serde(rename = "type", alias = "Type")]
    pub kind: Option<String>,
}

/// One entry from a search response, same three shapes as [`RawDetail`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSearchItem {
    Map(Map<String, Value>),
    Text(String),
    Fields(SearchFields),
}

/// Typed search-item fields from a client that returns structured data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFields {
    pub title: Option<String>,
    pub year: Option<Value>,
    #[serde(alias = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "type", alias = "Type")]
    pub kind: Option<String>,
}

/// A search response: either the OMDb envelope
/// (`{"Response": "True", "Search": [...]}`) or a bare list of entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchPayload {
    Items(Vec<RawSearchItem>),
    Envelope(Map<String, Value>),
}

/// Envelope keys that may hold the result list, in precedence order.
const RESULT_KEYS: [&str; 3] = ["Search", "search", "results"];

impl SearchPayload {
    /// Unwraps the payload into a flat list of raw entries.
    ///
    /// An envelope lacking every recognized result key counts as zero
    /// results. Entries that match none of the [`RawSearchItem`] shapes are
    /// skipped.
    #[must_use]
    pub fn into_items(self) -> Vec<RawSearchItem> {
        match self {
            SearchPayload::Items(items) => items,
            SearchPayload::Envelope(map) => {
                let Some(inner) = RESULT_KEYS
                    .iter()
                    .find_map(|k| map.get(*k))
                    .and_then(Value::as_array)
                else {
                    tracing::warn!("search envelope has no result array");
                    return Vec::new();
                };
                tracing::debug!(count = inner.len(), "extracted entries from search envelope");
                inner
                    .iter()
                    .filter_map(|v| serde_json::from_value(v.clone()).ok())
                    .collect()
            }
        }
    }
}
