//! Normalization of raw OMDb payload shapes into canonical records.
//!
//! Every normalizer here is total: missing or malformed upstream data
//! degrades the affected field to `None`/empty rather than failing the
//! whole record.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::resolver::{resolve_by_title, MetadataSource};
use crate::types::{RawDetail, RawSearchItem};

static LEADING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}").expect("year pattern is valid"));
static FIRST_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digits pattern is valid"));

/// A movie-detail payload reduced to the canonical internal shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalDetail {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub imdb_id: Option<String>,
    pub plot: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub genres: Vec<String>,
}

/// One search-result entry reduced to the canonical internal shape.
///
/// `kind` carries the wire `Type` field (`"movie"`, `"series"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalSearchItem {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub imdb_id: Option<String>,
    pub kind: Option<String>,
}

/// Normalizes a search query: whitespace runs collapse to single spaces,
/// the whole string is lowercased.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parses a year value into a 4-digit integer.
///
/// Integers pass through, all-digit strings parse directly, and anything
/// else has its leading 4-digit run extracted — which handles open-ended
/// ranges like `"1999–"`. Unparseable input yields `None`.
#[must_use]
pub fn parse_year(raw: Option<&Value>) -> Option<i32> {
    let value = raw?;
    if let Value::Number(n) = value {
        if let Some(v) = n.as_i64() {
            return i32::try_from(v).ok();
        }
    }
    if let Value::String(s) = value {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            return s.parse().ok();
        }
    }
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Null => return None,
        other => other.to_string(),
    };
    LEADING_YEAR
        .find(&text)
        .and_then(|m| m.as_str().parse().ok())
}

/// Parses a runtime value into whole minutes.
///
/// Integers pass through; strings yield their first digit run (so
/// `"136 min"` becomes `136`). Anything else yields `None`.
#[must_use]
pub fn parse_runtime_minutes(raw: Option<&Value>) -> Option<i32> {
    match raw? {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => FIRST_DIGITS.find(s).and_then(|m| m.as_str().parse().ok()),
        _ => None,
    }
}

/// Splits a genre value into a trimmed list of names.
///
/// Comma-separated strings split per entry; lists stringify per element;
/// anything else yields an empty list.
#[must_use]
pub fn split_genres(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_owned(),
                other => other.to_string().trim().to_owned(),
            })
            .filter(|g| !g.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// First non-null value among `keys`, mirroring alias fallback chains.
fn first_value<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| map.get(*k).filter(|v| !v.is_null()))
}

/// First non-empty string value among `keys`.
fn first_str<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| map.get(*k).and_then(Value::as_str).filter(|s| !s.is_empty()))
}

fn str_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

/// Reduces one raw detail payload to a [`CanonicalDetail`].
#[must_use]
pub fn normalize_detail(raw: &RawDetail) -> CanonicalDetail {
    match raw {
        RawDetail::Map(map) => CanonicalDetail {
            title: str_field(map, "Title"),
            year: parse_year(first_value(map, &["Year"])),
            imdb_id: first_str(map, &["imdbID", "imdbId", "imdb_id"]).map(ToOwned::to_owned),
            plot: str_field(map, "Plot"),
            runtime_minutes: parse_runtime_minutes(first_value(map, &["Runtime", "runtime"])),
            genres: split_genres(first_value(map, &["Genre", "genres"])),
        },
        RawDetail::Text(title) => CanonicalDetail {
            title: Some(title.clone()),
            ..CanonicalDetail::default()
        },
        RawDetail::Fields(fields) => CanonicalDetail {
            title: fields.title.clone(),
            year: parse_year(fields.year.as_ref()),
            imdb_id: fields.imdb_id.clone().filter(|s| !s.is_empty()),
            plot: fields.plot.clone(),
            runtime_minutes: parse_runtime_minutes(
                fields.runtime.as_ref().or(fields.runtime_minutes.as_ref()),
            ),
            genres: split_genres(fields.genres.as_ref()),
        },
    }
}

/// Reads the `Type` field directly off a raw detail payload.
#[must_use]
pub fn detail_kind(raw: &RawDetail) -> Option<String> {
    match raw {
        RawDetail::Map(map) => str_field(map, "Type"),
        RawDetail::Fields(fields) => fields.kind.clone(),
        RawDetail::Text(_) => None,
    }
}

/// Reduces one raw search-result entry to a [`CanonicalSearchItem`].
///
/// The bare-string shape carries only a title; it is resolved through the
/// by-title probing ladder on `source`, and on total failure degrades to a
/// title-only item.
pub async fn normalize_search_item<S: MetadataSource>(
    raw: &RawSearchItem,
    source: &S,
) -> CanonicalSearchItem {
    match raw {
        RawSearchItem::Map(map) => CanonicalSearchItem {
            title: str_field(map, "Title"),
            year: parse_year(first_value(map, &["Year"])),
            imdb_id: first_str(map, &["imdbID", "imdb_id", "imdbId"]).map(ToOwned::to_owned),
            kind: str_field(map, "Type"),
        },
        RawSearchItem::Fields(fields) => CanonicalSearchItem {
            title: fields.title.clone(),
            year: parse_year(fields.year.as_ref()),
            imdb_id: fields.imdb_id.clone().filter(|s| !s.is_empty()),
            kind: fields.kind.clone(),
        },
        RawSearchItem::Text(title) => match resolve_by_title(source, title, None).await {
            Some(hit) => {
                let detail = normalize_detail(&hit);
                CanonicalSearchItem {
                    title: detail.title.or_else(|| Some(title.clone())),
                    year: detail.year,
                    imdb_id: detail.imdb_id,
                    kind: detail_kind(&hit),
                }
            }
            None => CanonicalSearchItem {
                title: Some(title.clone()),
                ..CanonicalSearchItem::default()
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::DetailFields;

    fn map_detail(value: Value) -> RawDetail {
        serde_json::from_value(value).expect("detail should deserialize")
    }

    #[test]
    fn parse_year_integer_passes_through() {
        assert_eq!(parse_year(Some(&json!(1999))), Some(1999));
    }

    #[test]
    fn parse_year_numeric_string() {
        assert_eq!(parse_year(Some(&json!("1999"))), Some(1999));
    }

    #[test]
    fn parse_year_open_ended_range() {
        assert_eq!(parse_year(Some(&json!("1999–"))), Some(1999));
    }

    #[test]
    fn parse_year_trailing_text_after_prefix() {
        assert_eq!(parse_year(Some(&json!("2003-2005"))), Some(2003));
    }

    #[test]
    fn parse_year_garbage_is_none() {
        assert_eq!(parse_year(Some(&json!("N/A"))), None);
        assert_eq!(parse_year(Some(&json!("abc1999"))), None);
        assert_eq!(parse_year(Some(&Value::Null)), None);
        assert_eq!(parse_year(None), None);
    }

    #[test]
    fn parse_runtime_from_minutes_string() {
        assert_eq!(parse_runtime_minutes(Some(&json!("136 min"))), Some(136));
    }

    #[test]
    fn parse_runtime_integer_and_garbage() {
        assert_eq!(parse_runtime_minutes(Some(&json!(90))), Some(90));
        assert_eq!(parse_runtime_minutes(Some(&json!("N/A"))), None);
        assert_eq!(parse_runtime_minutes(None), None);
    }

    #[test]
    fn split_genres_comma_string() {
        assert_eq!(
            split_genres(Some(&json!("Action, Drama"))),
            vec!["Action".to_string(), "Drama".to_string()]
        );
    }

    #[test]
    fn split_genres_empty_inputs() {
        assert!(split_genres(Some(&json!([]))).is_empty());
        assert!(split_genres(Some(&Value::Null)).is_empty());
        assert!(split_genres(None).is_empty());
    }

    #[test]
    fn split_genres_list_stringifies_elements() {
        assert_eq!(
            split_genres(Some(&json!([" Action ", "Sci-Fi"]))),
            vec!["Action".to_string(), "Sci-Fi".to_string()]
        );
    }

    #[test]
    fn normalize_detail_from_wire_map() {
        let detail = map_detail(json!({
            "Title": "The Matrix",
            "Year": "1999",
            "imdbID": "tt0133093",
            "Plot": "A hacker learns the truth.",
            "Runtime": "136 min",
            "Genre": "Action, Sci-Fi"
        }));
        let canonical = normalize_detail(&detail);
        assert_eq!(canonical.title.as_deref(), Some("The Matrix"));
        assert_eq!(canonical.year, Some(1999));
        assert_eq!(canonical.imdb_id.as_deref(), Some("tt0133093"));
        assert_eq!(canonical.runtime_minutes, Some(136));
        assert_eq!(canonical.genres, vec!["Action", "Sci-Fi"]);
    }

    #[test]
    fn map_and_fields_shapes_normalize_identically() {
        let map = map_detail(json!({
            "Title": "The Matrix",
            "Year": "1999",
            "imdb_id": "tt0133093",
            "Plot": "A hacker learns the truth.",
            "runtime": "136 min",
            "genres": "Action, Sci-Fi"
        }));
        let fields = RawDetail::Fields(DetailFields {
            title: Some("The Matrix".to_string()),
            year: Some(json!("1999")),
            imdb_id: Some("tt0133093".to_string()),
            plot: Some("A hacker learns the truth.".to_string()),
            runtime: Some(json!("136 min")),
            genres: Some(json!("Action, Sci-Fi")),
            ..DetailFields::default()
        });
        assert_eq!(normalize_detail(&map), normalize_detail(&fields));
    }

    #[test]
    fn normalize_detail_bare_string_is_title_only() {
        let canonical = normalize_detail(&RawDetail::Text("The Matrix".to_string()));
        assert_eq!(canonical.title.as_deref(), Some("The Matrix"));
        assert_eq!(canonical.year, None);
        assert_eq!(canonical.imdb_id, None);
        assert_eq!(canonical.plot, None);
        assert_eq!(canonical.runtime_minutes, None);
        assert!(canonical.genres.is_empty());
    }

    #[test]
    fn normalize_detail_alias_precedence() {
        let detail = map_detail(json!({
            "imdbId": "tt0000001",
            "imdb_id": "tt0000002"
        }));
        // imdbID is absent, imdbId wins over imdb_id.
        assert_eq!(
            normalize_detail(&detail).imdb_id.as_deref(),
            Some("tt0000001")
        );
    }

    #[test]
    fn normalize_detail_runtime_alias_skips_null() {
        let detail = map_detail(json!({
            "Runtime": null,
            "runtime": "90 min"
        }));
        assert_eq!(normalize_detail(&detail).runtime_minutes, Some(90));
    }

    #[test]
    fn normalize_query_collapses_and_lowercases() {
        assert_eq!(normalize_query("  The   MATRIX  "), "the matrix");
    }
}
