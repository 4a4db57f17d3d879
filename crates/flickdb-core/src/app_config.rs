/// Application configuration shared across the workspace.
///
/// Built from environment variables by [`crate::config::load_app_config`].
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    /// OMDb API key, resolved from `OMDB_API_KEY` / `OMDB_APIKEY` /
    /// `OMDB_KEY` (first present wins). Absent keys only fail the
    /// direct-HTTP fallback path at call time.
    pub omdb_api_key: Option<String>,
    pub omdb_base_url: String,
    pub omdb_timeout_secs: u64,
    /// General debug flag; also bypasses the search cache guard.
    pub debug: bool,
    /// Explicit cache-guard override, independent of `debug`.
    pub allow_rescrape: bool,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field(
                "omdb_api_key",
                &self.omdb_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("omdb_base_url", &self.omdb_base_url)
            .field("omdb_timeout_secs", &self.omdb_timeout_secs)
            .field("debug", &self.debug)
            .field("allow_rescrape", &self.allow_rescrape)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
