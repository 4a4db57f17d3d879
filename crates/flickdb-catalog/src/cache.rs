//! Time-based guard against re-running recent searches.

use chrono::{DateTime, Duration, Utc};
use flickdb_core::AppConfig;

/// Flags that allow bypassing the guard.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardPolicy {
    /// Explicit "allow rescrape" override.
    pub allow_rescrape: bool,
    /// General debug mode also bypasses the guard, so development and
    /// tests can re-hit the API without waiting a day.
    pub debug: bool,
}

impl GuardPolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            allow_rescrape: config.allow_rescrape,
            debug: config.debug,
        }
    }

    fn bypasses_guard(self) -> bool {
        self.allow_rescrape || self.debug
    }
}

/// What to do with a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Not recent; search normally.
    Proceed,
    /// Recent, but an override is configured; search anyway.
    ProceedOverride,
    /// Recent and no override; skip the search entirely.
    Skip,
}

/// Decides whether a search term may be re-queried.
///
/// A term is "recent" only if its record existed before this call (a
/// freshly created record never blocks) and `last_search` falls within the
/// last 24 hours.
#[must_use]
pub fn evaluate_guard(
    existed_before: bool,
    last_search: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    policy: GuardPolicy,
) -> GuardDecision {
    let recent = existed_before && last_search.is_some_and(|t| t > now - Duration::hours(24));
    if !recent {
        GuardDecision::Proceed
    } else if policy.bypasses_guard() {
        GuardDecision::ProceedOverride
    } else {
        GuardDecision::Skip
    }
}
