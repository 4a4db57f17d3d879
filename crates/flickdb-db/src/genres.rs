//! Database operations for `genres` and the `movie_genres` association.

use sqlx::PgPool;

use crate::DbError;

/// A row from the `genres` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GenreRow {
    pub id: i64,
    pub name: String,
}

/// Gets or lazily creates a genre by name, returning its `id`.
///
/// The no-op `DO UPDATE` makes `RETURNING` yield the existing row's id on
/// conflict; a plain `DO NOTHING` would return no row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn get_or_create_genre(pool: &PgPool, name: &str) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO genres (name) VALUES ($1) \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
         RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Replaces a movie's genre set entirely with `genre_ids`.
///
/// Runs as a single transaction so a failure cannot leave the movie with a
/// half-replaced set.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails.
pub async fn replace_movie_genres(
    pool: &PgPool,
    movie_id: i64,
    genre_ids: &[i64],
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
        .bind(movie_id)
        .execute(&mut *tx)
        .await?;

    for genre_id in genre_ids {
        sqlx::query(
            "INSERT INTO movie_genres (movie_id, genre_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(movie_id)
        .bind(genre_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Returns the genre names associated with a movie, alphabetically.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_movie_genres(pool: &PgPool, movie_id: i64) -> Result<Vec<String>, DbError> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT g.name \
         FROM genres g \
         JOIN movie_genres mg ON mg.genre_id = g.id \
         WHERE mg.movie_id = $1 \
         ORDER BY g.name",
    )
    .bind(movie_id)
    .fetch_all(pool)
    .await?;

    Ok(names)
}
