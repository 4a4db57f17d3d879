//! Promotion of a partial movie record to a full one.

use flickdb_omdb::{normalize_detail, resolve_by_id, MetadataSource, OmdbClient};

use crate::store::CatalogStore;

/// Observable result of one `fill_movie_details` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichOutcome {
    /// No movie with this IMDb ID exists in the catalog.
    NotFound,
    /// The record is already full; nothing was fetched or written.
    AlreadyFull,
    /// The by-ID fetch produced no usable payload; nothing was written.
    NoData,
    /// The record was enriched and marked full.
    Updated,
}

/// Fetches a movie's full details by IMDb ID and persists them.
///
/// Title and year are only overwritten when the fetched value is non-empty;
/// plot and runtime are overwritten unconditionally, clearing stale values.
/// The genre set is replaced entirely. Upstream failure leaves the record
/// untouched.
///
/// # Errors
///
/// Returns the store's error if a read or write fails. Upstream errors
/// never propagate.
pub async fn fill_movie_details<S, C>(
    store: &S,
    source: &C,
    fallback: Option<&OmdbClient>,
    imdb_id: &str,
) -> Result<EnrichOutcome, S::Error>
where
    S: CatalogStore,
    C: MetadataSource,
{
    let Some(mut movie) = store.get_movie(imdb_id).await? else {
        tracing::warn!(imdb_id, "no such movie in the catalog");
        return Ok(EnrichOutcome::NotFound);
    };

    if movie.is_full_record {
        tracing::warn!(title = ?movie.title, "already a full record");
        return Ok(EnrichOutcome::AlreadyFull);
    }

    let Some(raw) = resolve_by_id(source, fallback, imdb_id).await.into_detail() else {
        tracing::error!(imdb_id, "unable to fetch details");
        return Ok(EnrichOutcome::NoData);
    };

    let detail = normalize_detail(&raw);

    if let Some(title) = detail.title.filter(|t| !t.is_empty()) {
        movie.title = Some(title);
    }
    if let Some(year) = detail.year {
        movie.year = Some(year);
    }
    movie.plot = detail.plot;
    movie.runtime_minutes = detail.runtime_minutes;
    movie.is_full_record = true;

    store.save_full_record(&movie, &detail.genres).await?;
    tracing::info!(title = ?movie.title, imdb_id, "movie updated with full details");

    Ok(EnrichOutcome::Updated)
}
