//! Integration tests for `OmdbClient` using wiremock HTTP mocks.

use flickdb_omdb::{normalize_detail, OmdbClient, OmdbError, RawSearchItem};
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> OmdbClient {
    OmdbClient::with_base_url("test-key", 10, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn search_unwraps_the_envelope() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "Response": "True",
        "totalResults": "1",
        "Search": [
            {
                "Title": "The Matrix",
                "Year": "1999",
                "imdbID": "tt0133093",
                "Type": "movie"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(query_param("s", "the matrix"))
        .and(query_param("type", "movie"))
        .and(query_param("page", "1"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let items = client
        .search_movies("the matrix", 1)
        .await
        .expect("should parse search payload")
        .into_items();

    assert_eq!(items.len(), 1);
    let RawSearchItem::Map(entry) = &items[0] else {
        panic!("wire entries should deserialize as maps");
    };
    assert_eq!(
        entry.get("imdbID").and_then(serde_json::Value::as_str),
        Some("tt0133093")
    );
}

#[tokio::test]
async fn search_accepts_a_bare_list() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        { "Title": "The Matrix", "imdbID": "tt0133093", "Type": "movie" }
    ]);

    Mock::given(method("GET"))
        .and(query_param("s", "the matrix"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let items = client
        .search_movies("the matrix", 1)
        .await
        .expect("should parse bare-list payload")
        .into_items();

    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn search_error_envelope_is_an_api_error() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "Response": "False",
        "Error": "Invalid API key!"
    });

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.search_movies("the matrix", 1).await;

    match result {
        Err(OmdbError::Api(msg)) => assert!(msg.contains("Invalid API key")),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn get_movie_details_returns_normalizable_payload() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "Response": "True",
        "Title": "The Matrix",
        "Year": "1999",
        "imdbID": "tt0133093",
        "Plot": "A hacker learns the truth about his reality.",
        "Runtime": "136 min",
        "Genre": "Action, Sci-Fi",
        "Type": "movie"
    });

    Mock::given(method("GET"))
        .and(query_param("i", "tt0133093"))
        .and(query_param("plot", "full"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let raw = client
        .get_movie_details("tt0133093")
        .await
        .expect("should parse detail payload");

    let detail = normalize_detail(&raw);
    assert_eq!(detail.title.as_deref(), Some("The Matrix"));
    assert_eq!(detail.year, Some(1999));
    assert_eq!(detail.runtime_minutes, Some(136));
    assert_eq!(detail.genres, vec!["Action", "Sci-Fi"]);
}

#[tokio::test]
async fn detail_without_affirmative_response_is_no_result() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "Response": "False",
        "Error": "Incorrect IMDb ID."
    });

    Mock::given(method("GET"))
        .and(query_param("i", "tt0000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.get_movie_details("tt0000000").await;

    match result {
        Err(OmdbError::Api(msg)) => assert!(msg.contains("Incorrect IMDb ID")),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn get_by_title_passes_year_hint() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "Response": "True",
        "Title": "The Matrix",
        "Year": "1999",
        "imdbID": "tt0133093"
    });

    Mock::given(method("GET"))
        .and(query_param("t", "The Matrix"))
        .and(query_param("y", "1999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let raw = client
        .get_by_title("The Matrix", Some(1999))
        .await
        .expect("should parse by-title payload");

    assert_eq!(
        normalize_detail(&raw).imdb_id.as_deref(),
        Some("tt0133093")
    );
}

#[tokio::test]
async fn non_2xx_status_is_an_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.get_movie_details("tt0133093").await;

    assert!(matches!(result, Err(OmdbError::Http(_))));
}
