//! Bulk ingestion of search results as partial movie records.

use chrono::Utc;
use flickdb_omdb::{
    normalize_detail, normalize_query, normalize_search_item, ByTitleStrategy,
    CanonicalSearchItem, MetadataSource, StrategyCall, TitleConvention,
};

use crate::cache::{evaluate_guard, GuardDecision, GuardPolicy};
use crate::store::CatalogStore;

/// Observable result of one `search_and_save` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The term was searched within the last 24 hours; nothing was done.
    Skipped,
    /// The search ran; `processed` entries had an identifier, `created` of
    /// them were new.
    Completed { processed: usize, created: usize },
}

/// Searches upstream for `query` and saves each result as a partial record.
///
/// The query is normalized (whitespace collapsed, lowercased) for the
/// search-term cache. Recently searched terms are skipped unless the
/// policy overrides the guard. Upstream failures degrade to zero results;
/// the term's `last_search` is stamped after every non-skipped attempt,
/// successful or not.
///
/// # Errors
///
/// Returns the store's error if a read or write fails. Upstream errors
/// never propagate.
pub async fn search_and_save<S, C>(
    store: &S,
    client: &C,
    query: &str,
    policy: GuardPolicy,
) -> Result<SearchOutcome, S::Error>
where
    S: CatalogStore,
    C: MetadataSource,
{
    let term = normalize_query(query);

    let existing = store.get_search_term(&term).await?;
    let existed_before = existing.is_some();
    let record = match existing {
        Some(record) => record,
        None => store.create_search_term(&term).await?,
    };

    match evaluate_guard(existed_before, record.last_search, Utc::now(), policy) {
        GuardDecision::Skip => {
            tracing::warn!(
                term,
                "search was performed in the past 24 hours, not searching again"
            );
            return Ok(SearchOutcome::Skipped);
        }
        GuardDecision::ProceedOverride => {
            tracing::warn!(
                term,
                "search was performed in the past 24 hours, proceeding due to override"
            );
        }
        GuardDecision::Proceed => {}
    }

    tracing::info!(term, "performing a search");

    let items = match client.search(query, 1).await {
        Ok(payload) => payload.into_items(),
        Err(err) => {
            tracing::warn!(term, error = %err, "upstream search failed");
            Vec::new()
        }
    };
    if items.is_empty() {
        tracing::info!(term, "no results returned");
    }

    let mut processed = 0_usize;
    let mut created = 0_usize;

    for raw in &items {
        let mut item = normalize_search_item(raw, client).await;

        // Only movies; skip series/episodes when the entry says so.
        if item.kind.as_deref().is_some_and(|kind| kind != "movie") {
            continue;
        }

        if item.imdb_id.is_none() && item.title.is_some() {
            resolve_missing_id(client, &mut item).await;
        }

        let Some(imdb_id) = item.imdb_id.clone() else {
            tracing::warn!(?item, "skipping entry without an IMDb ID");
            continue;
        };

        tracing::info!(title = ?item.title, imdb_id, "saving movie");
        processed += 1;
        if store
            .create_movie_if_absent(&imdb_id, item.title.as_deref(), item.year)
            .await?
        {
            tracing::info!(imdb_id, "movie created");
            created += 1;
        }
    }

    // Record that we searched now — deliberately also after failed or
    // empty searches.
    store.touch_search_term(&term, Utc::now()).await?;

    Ok(SearchOutcome::Completed { processed, created })
}

/// One extra by-title attempt through the client's generic `get`, merging
/// any improved title/year/IMDb ID into `item`.
async fn resolve_missing_id<C: MetadataSource>(client: &C, item: &mut CanonicalSearchItem) {
    let Some(title) = item.title.clone() else {
        return;
    };

    for convention in TitleConvention::LADDER {
        match client
            .probe_by_title(ByTitleStrategy::Get, convention, &title, item.year)
            .await
        {
            StrategyCall::Hit(Some(raw)) => {
                let detail = normalize_detail(&raw);
                if detail.imdb_id.is_some() {
                    item.imdb_id = detail.imdb_id;
                }
                if let Some(better) = detail.title.filter(|t| !t.is_empty()) {
                    item.title = Some(better);
                }
                if detail.year.is_some() {
                    item.year = detail.year;
                }
                return;
            }
            StrategyCall::Hit(None) | StrategyCall::Unsupported => return,
            StrategyCall::WrongConvention => {}
            StrategyCall::Failed(reason) => {
                tracing::warn!(title, reason, "failed to resolve IMDb ID by title");
                return;
            }
        }
    }
}
