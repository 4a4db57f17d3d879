use thiserror::Error;

/// Errors returned by the OMDb API client.
#[derive(Debug, Error)]
pub enum OmdbError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The OMDb API answered with `"Response": "False"` and an error message.
    #[error("OMDb API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
