use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Row;

use tango_core::model::{Word, WordId};
use tango_core::scoring::{ScoreChange, ScoreUpdateStrategy};

use super::SqliteStore;
use super::mapping::{map_word_row, ser, translations_to_json, word_id_to_i64};
use crate::repository::{StorageError, WordRepository, read_score};
use crate::retry::{MAX_TXN_ATTEMPTS, with_conflict_retry};

const SELECT_WORD: &str =
    "SELECT id, term, translations, score, last_studied_date, created_at FROM words";

#[async_trait]
impl WordRepository for SqliteStore {
    async fn upsert_word(&self, word: &Word) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO words (id, term, translations, score, last_studied_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                term = excluded.term,
                translations = excluded.translations,
                score = excluded.score,
                last_studied_date = excluded.last_studied_date
            ",
        )
        .bind(word_id_to_i64(word.id())?)
        .bind(word.term())
        .bind(translations_to_json(word.translations())?)
        .bind(word.score().value())
        .bind(word.last_studied())
        .bind(word.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn get_word(&self, id: WordId) -> Result<Word, StorageError> {
        let sql = format!("{SELECT_WORD} WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(word_id_to_i64(id)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .ok_or(StorageError::NotFound)?;
        map_word_row(&row)?.into_word()
    }

    async fn list_words(&self) -> Result<Vec<Word>, StorageError> {
        let sql = format!("{SELECT_WORD} ORDER BY term COLLATE NOCASE ASC, id ASC");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut words = Vec::with_capacity(rows.len());
        for row in &rows {
            words.push(map_word_row(row)?.into_word()?);
        }
        Ok(words)
    }

    async fn word_count(&self) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM words")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let n: i64 = row.try_get("n").map_err(ser)?;
        u64::try_from(n).map_err(|_| StorageError::Serialization(format!("invalid count: {n}")))
    }

    async fn update_word_score(
        &self,
        id: WordId,
        today: NaiveDate,
        update: &dyn ScoreUpdateStrategy,
    ) -> Result<ScoreChange, StorageError> {
        let id_i64 = word_id_to_i64(id)?;
        let pool = &self.pool;
        with_conflict_retry(MAX_TXN_ATTEMPTS, move || async move {
            let row = sqlx::query("SELECT score, last_studied_date FROM words WHERE id = ?1")
                .bind(id_i64)
                .fetch_optional(pool)
                .await
                .map_err(|e| StorageError::Connection(e.to_string()))?
                .ok_or(StorageError::NotFound)?;
            let raw_score: Option<f64> = row.try_get("score").map_err(ser)?;
            let last_studied: Option<NaiveDate> = row.try_get("last_studied_date").map_err(ser)?;

            let previous = read_score(raw_score)?;
            let next = update.next_score(previous, last_studied == Some(today));

            // null-safe compare-and-set: the write only lands if the row
            // still matches what this attempt read
            let result = sqlx::query(
                r"
                UPDATE words SET score = ?2, last_studied_date = ?3
                WHERE id = ?1 AND score IS ?4 AND last_studied_date IS ?5
                ",
            )
            .bind(id_i64)
            .bind(next.value())
            .bind(today)
            .bind(raw_score)
            .bind(last_studied)
            .execute(pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

            if result.rows_affected() == 0 {
                return Err(StorageError::Conflict);
            }

            log::debug!("{} update for word {id}: {previous} -> {next}", update.mode());
            Ok(ScoreChange {
                word_id: id,
                previous,
                new_score: next,
                last_studied: today,
            })
        })
        .await
    }
}
