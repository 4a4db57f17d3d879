//! Capability probing against metadata clients of unknown interface.
//!
//! Third-party OMDb client libraries disagree on what the by-ID and
//! by-title lookup calls are named and how they take their arguments. The
//! [`MetadataSource`] trait is the single adapter boundary: a client
//! answers each named strategy/convention pair with a [`StrategyCall`], and
//! the resolvers here walk a fixed ranked ladder of those pairs. A client
//! whose interface is known binds directly by answering exactly one pair
//! and reporting everything else as [`StrategyCall::Unsupported`] — probing
//! then degenerates to a direct call.

use crate::client::OmdbClient;
use crate::error::OmdbError;
use crate::types::{RawDetail, SearchPayload};

/// Candidate by-ID lookup methods, in probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByIdStrategy {
    GetByImdbId,
    ById,
    GetMovie,
    Movie,
    Id,
    Lookup,
    Get,
}

impl ByIdStrategy {
    pub const LADDER: [ByIdStrategy; 7] = [
        ByIdStrategy::GetByImdbId,
        ByIdStrategy::ById,
        ByIdStrategy::GetMovie,
        ByIdStrategy::Movie,
        ByIdStrategy::Id,
        ByIdStrategy::Lookup,
        ByIdStrategy::Get,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ByIdStrategy::GetByImdbId => "get_by_imdb_id",
            ByIdStrategy::ById => "by_id",
            ByIdStrategy::GetMovie => "get_movie",
            ByIdStrategy::Movie => "movie",
            ByIdStrategy::Id => "id",
            ByIdStrategy::Lookup => "lookup",
            ByIdStrategy::Get => "get",
        }
    }
}

/// Argument conventions for a by-ID call, in probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdConvention {
    Positional,
    KeywordImdbId,
    KeywordId,
}

impl IdConvention {
    pub const LADDER: [IdConvention; 3] = [
        IdConvention::Positional,
        IdConvention::KeywordImdbId,
        IdConvention::KeywordId,
    ];
}

/// Candidate by-title lookup methods, in probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByTitleStrategy {
    Get,
    GetByTitle,
    Title,
    ByTitle,
}

impl ByTitleStrategy {
    pub const LADDER: [ByTitleStrategy; 4] = [
        ByTitleStrategy::Get,
        ByTitleStrategy::GetByTitle,
        ByTitleStrategy::Title,
        ByTitleStrategy::ByTitle,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ByTitleStrategy::Get => "get",
            ByTitleStrategy::GetByTitle => "get_by_title",
            ByTitleStrategy::Title => "title",
            ByTitleStrategy::ByTitle => "by_title",
        }
    }
}

/// Argument conventions for a by-title call, in probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleConvention {
    KeywordTitle,
    Positional,
}

impl TitleConvention {
    pub const LADDER: [TitleConvention; 2] =
        [TitleConvention::KeywordTitle, TitleConvention::Positional];
}

/// Outcome of a single probe invocation.
#[derive(Debug, Clone)]
pub enum StrategyCall {
    /// The call succeeded; it may still have produced no payload.
    Hit(Option<RawDetail>),
    /// The client has no such method.
    Unsupported,
    /// Arity/convention mismatch; the next convention may still work.
    WrongConvention,
    /// The call failed for any other reason.
    Failed(String),
}

/// A client of unknown interface, probed through named strategies.
#[allow(async_fn_in_trait)]
pub trait MetadataSource {
    /// Title search, assumed present on every client.
    async fn search(&self, query: &str, page: u32) -> Result<SearchPayload, OmdbError>;

    /// Answers one by-ID strategy/convention pair.
    async fn probe_by_id(
        &self,
        strategy: ByIdStrategy,
        convention: IdConvention,
        imdb_id: &str,
    ) -> StrategyCall;

    /// Answers one by-title strategy/convention pair.
    async fn probe_by_title(
        &self,
        strategy: ByTitleStrategy,
        convention: TitleConvention,
        title: &str,
        year: Option<i32>,
    ) -> StrategyCall;
}

/// Why a by-ID fetch produced no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// No probe matched and no API key is configured for the HTTP fallback.
    MissingApiKey,
    /// The upstream API reported an application-level error.
    Upstream(String),
    /// Network, status, or decode failure.
    Transport(String),
}

/// Result of a by-ID fetch. Never an `Err`: all failure is a value here
/// plus a log line.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Found(RawDetail),
    Empty,
    Failed(FetchFailure),
}

impl FetchOutcome {
    /// Collapses the outcome to the payload, if any.
    #[must_use]
    pub fn into_detail(self) -> Option<RawDetail> {
        match self {
            FetchOutcome::Found(raw) => Some(raw),
            FetchOutcome::Empty | FetchOutcome::Failed(_) => None,
        }
    }
}

/// Fetches full detail for a known IMDb ID from a client of unknown
/// interface.
///
/// Walks the by-ID strategy ladder; per strategy, conventions advance on
/// [`StrategyCall::WrongConvention`] and any other failure moves to the
/// next strategy. The first hit wins immediately — success means the call
/// did not fail, even when it produced no payload. When the whole ladder is
/// exhausted, falls back to a direct HTTP GET through `fallback`; a missing
/// fallback (no API key configured) is a hard failure for this path.
pub async fn resolve_by_id<S: MetadataSource>(
    source: &S,
    fallback: Option<&OmdbClient>,
    imdb_id: &str,
) -> FetchOutcome {
    for strategy in ByIdStrategy::LADDER {
        for convention in IdConvention::LADDER {
            match source.probe_by_id(strategy, convention, imdb_id).await {
                StrategyCall::Hit(Some(raw)) => return FetchOutcome::Found(raw),
                StrategyCall::Hit(None) => return FetchOutcome::Empty,
                StrategyCall::Unsupported => break,
                StrategyCall::WrongConvention => {}
                StrategyCall::Failed(reason) => {
                    tracing::debug!(
                        imdb_id,
                        strategy = strategy.name(),
                        reason,
                        "by-ID probe failed, trying next strategy"
                    );
                    break;
                }
            }
        }
    }

    let Some(client) = fallback else {
        tracing::error!(
            imdb_id,
            "client lacks a by-ID method and no OMDb API key is configured for the HTTP fallback"
        );
        return FetchOutcome::Failed(FetchFailure::MissingApiKey);
    };

    match client.get_movie_details(imdb_id).await {
        Ok(raw) => FetchOutcome::Found(raw),
        Err(OmdbError::Api(message)) => {
            tracing::error!(imdb_id, message, "OMDb responded with an error");
            FetchOutcome::Failed(FetchFailure::Upstream(message))
        }
        Err(err) => {
            tracing::error!(imdb_id, error = %err, "HTTP fallback to OMDb failed");
            FetchOutcome::Failed(FetchFailure::Transport(err.to_string()))
        }
    }
}

/// Resolves a bare title through the by-title strategy ladder.
///
/// Unlike the by-ID ladder, only a non-empty hit wins: an empty hit moves
/// to the next strategy. A hard failure aborts the whole attempt.
pub async fn resolve_by_title<S: MetadataSource>(
    source: &S,
    title: &str,
    year: Option<i32>,
) -> Option<RawDetail> {
    for strategy in ByTitleStrategy::LADDER {
        for convention in TitleConvention::LADDER {
            match source
                .probe_by_title(strategy, convention, title, year)
                .await
            {
                StrategyCall::Hit(Some(raw)) => return Some(raw),
                StrategyCall::Hit(None) | StrategyCall::Unsupported => break,
                StrategyCall::WrongConvention => {}
                StrategyCall::Failed(reason) => {
                    tracing::warn!(title, reason, "title lookup failed");
                    return None;
                }
            }
        }
    }
    None
}
