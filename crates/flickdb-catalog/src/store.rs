//! The persistence seam used by orchestration.
//!
//! Orchestration only needs a handful of key-unique upsert operations, so
//! it talks to this trait instead of the database crate directly; tests
//! supply an in-memory implementation and assert on observable state.

use chrono::{DateTime, Utc};
use flickdb_db::DbError;
use sqlx::PgPool;

/// A search term and when it was last queried upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTermRecord {
    pub term: String,
    pub last_search: Option<DateTime<Utc>>,
}

/// A movie as orchestration sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRecord {
    pub imdb_id: String,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub plot: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub is_full_record: bool,
}

/// Key-unique upsert store for movies, genres, and search terms.
#[allow(async_fn_in_trait)]
pub trait CatalogStore {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn get_search_term(&self, term: &str)
        -> Result<Option<SearchTermRecord>, Self::Error>;

    async fn create_search_term(&self, term: &str) -> Result<SearchTermRecord, Self::Error>;

    async fn touch_search_term(&self, term: &str, at: DateTime<Utc>)
        -> Result<(), Self::Error>;

    async fn get_movie(&self, imdb_id: &str) -> Result<Option<MovieRecord>, Self::Error>;

    /// Creates a partial record; an existing row keeps its title and year.
    /// Returns `true` if a row was created.
    async fn create_movie_if_absent(
        &self,
        imdb_id: &str,
        title: Option<&str>,
        year: Option<i32>,
    ) -> Result<bool, Self::Error>;

    /// Persists a full record and replaces its genre set entirely; genres
    /// are created lazily on first reference.
    async fn save_full_record(
        &self,
        movie: &MovieRecord,
        genres: &[String],
    ) -> Result<(), Self::Error>;
}

/// Postgres-backed [`CatalogStore`] over the flickdb-db free functions.
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CatalogStore for PgCatalog {
    type Error = DbError;

    async fn get_search_term(&self, term: &str) -> Result<Option<SearchTermRecord>, DbError> {
        let row = flickdb_db::get_search_term(&self.pool, term).await?;
        Ok(row.map(|r| SearchTermRecord {
            term: r.term,
            last_search: r.last_search,
        }))
    }

    async fn create_search_term(&self, term: &str) -> Result<SearchTermRecord, DbError> {
        let row = flickdb_db::create_search_term(&self.pool, term).await?;
        Ok(SearchTermRecord {
            term: row.term,
            last_search: row.last_search,
        })
    }

    async fn touch_search_term(&self, term: &str, at: DateTime<Utc>) -> Result<(), DbError> {
        flickdb_db::touch_search_term(&self.pool, term, at).await
    }

    async fn get_movie(&self, imdb_id: &str) -> Result<Option<MovieRecord>, DbError> {
        let row = flickdb_db::get_movie_by_imdb_id(&self.pool, imdb_id).await?;
        Ok(row.map(|r| MovieRecord {
            imdb_id: r.imdb_id,
            title: r.title,
            year: r.year,
            plot: r.plot,
            runtime_minutes: r.runtime_minutes,
            is_full_record: r.is_full_record,
        }))
    }

    async fn create_movie_if_absent(
        &self,
        imdb_id: &str,
        title: Option<&str>,
        year: Option<i32>,
    ) -> Result<bool, DbError> {
        flickdb_db::create_movie_if_absent(&self.pool, imdb_id, title, year).await
    }

    async fn save_full_record(
        &self,
        movie: &MovieRecord,
        genres: &[String],
    ) -> Result<(), DbError> {
        let movie_id = flickdb_db::save_full_record(
            &self.pool,
            &movie.imdb_id,
            movie.title.as_deref(),
            movie.year,
            movie.plot.as_deref(),
            movie.runtime_minutes,
        )
        .await?;

        let mut genre_ids = Vec::with_capacity(genres.len());
        for name in genres {
            genre_ids.push(flickdb_db::get_or_create_genre(&self.pool, name).await?);
        }
        flickdb_db::replace_movie_genres(&self.pool, movie_id, &genre_ids).await
    }
}
