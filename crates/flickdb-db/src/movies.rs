//! Database operations for the `movies` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `movies` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovieRow {
    pub id: i64,
    pub imdb_id: String,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub plot: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub is_full_record: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returns a single movie by IMDb ID, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_movie_by_imdb_id(
    pool: &PgPool,
    imdb_id: &str,
) -> Result<Option<MovieRow>, DbError> {
    let row = sqlx::query_as::<_, MovieRow>(
        "SELECT id, imdb_id, title, year, plot, runtime_minutes, is_full_record, \
                created_at, updated_at \
         FROM movies \
         WHERE imdb_id = $1",
    )
    .bind(imdb_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts a partial movie record, leaving an existing row untouched.
///
/// Title and year are creation defaults only: a later search hit never
/// overwrites what an earlier one (or an enrichment pass) stored.
///
/// Returns `true` if a row was created.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_movie_if_absent(
    pool: &PgPool,
    imdb_id: &str,
    title: Option<&str>,
    year: Option<i32>,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "INSERT INTO movies (imdb_id, title, year) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (imdb_id) DO NOTHING",
    )
    .bind(imdb_id)
    .bind(title)
    .bind(year)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Overwrites a movie with full-record detail and marks it full.
///
/// Plot and runtime are written as given, including `NULL` — enrichment
/// clears stale values rather than preserving them.
///
/// Returns the internal `id` of the updated row.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has this IMDb ID, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn save_full_record(
    pool: &PgPool,
    imdb_id: &str,
    title: Option<&str>,
    year: Option<i32>,
    plot: Option<&str>,
    runtime_minutes: Option<i32>,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "UPDATE movies SET \
             title           = $2, \
             year            = $3, \
             plot            = $4, \
             runtime_minutes = $5, \
             is_full_record  = TRUE, \
             updated_at      = NOW() \
         WHERE imdb_id = $1 \
         RETURNING id",
    )
    .bind(imdb_id)
    .bind(title)
    .bind(year)
    .bind(plot)
    .bind(runtime_minutes)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(id)
}
