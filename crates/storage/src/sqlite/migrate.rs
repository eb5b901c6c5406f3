use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs a single, consolidated migration for the current schema.
///
/// Creates the full schema: words with their memory state, per-date study
/// counters, and the decay coordination marker.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        // score is nullable on purpose: rows imported from before scoring
        // existed carry NULL and read back as the starting default
        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS words (
                    id INTEGER PRIMARY KEY,
                    term TEXT NOT NULL,
                    translations TEXT NOT NULL,
                    score REAL CHECK (score IS NULL OR (score >= 0 AND score <= 100)),
                    last_studied_date TEXT,
                    created_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS daily_stats (
                    date TEXT PRIMARY KEY,
                    study_count INTEGER NOT NULL CHECK (study_count >= 0),
                    created_at TEXT NOT NULL,
                    last_updated TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        // single-row table; the claim compare-and-set lives on this row
        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS decay_marker (
                    id INTEGER PRIMARY KEY CHECK (id = 0),
                    last_processed_date TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_words_term
                    ON words (term COLLATE NOCASE, id);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
