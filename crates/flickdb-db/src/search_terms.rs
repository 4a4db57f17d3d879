//! Database operations for the `search_terms` cache table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `search_terms` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SearchTermRow {
    pub id: i64,
    pub term: String,
    pub last_search: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Returns the search-term row for `term`, or `None` if never searched.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_search_term(pool: &PgPool, term: &str) -> Result<Option<SearchTermRow>, DbError> {
    let row = sqlx::query_as::<_, SearchTermRow>(
        "SELECT id, term, last_search, created_at FROM search_terms WHERE term = $1",
    )
    .bind(term)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Creates a search-term row with no `last_search` yet.
///
/// Concurrent creation of the same term is tolerated: on conflict the
/// existing row is returned unchanged.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_search_term(pool: &PgPool, term: &str) -> Result<SearchTermRow, DbError> {
    let row = sqlx::query_as::<_, SearchTermRow>(
        "INSERT INTO search_terms (term) VALUES ($1) \
         ON CONFLICT (term) DO UPDATE SET term = EXCLUDED.term \
         RETURNING id, term, last_search, created_at",
    )
    .bind(term)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Stamps a term's `last_search`, creating the row if needed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn touch_search_term(
    pool: &PgPool,
    term: &str,
    at: DateTime<Utc>,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO search_terms (term, last_search) VALUES ($1, $2) \
         ON CONFLICT (term) DO UPDATE SET last_search = EXCLUDED.last_search",
    )
    .bind(term)
    .bind(at)
    .execute(pool)
    .await?;

    Ok(())
}
