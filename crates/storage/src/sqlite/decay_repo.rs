use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Row;

use tango_core::decay::DecayUpdate;

use super::SqliteStore;
use super::mapping::{ser, word_id_to_i64};
use crate::repository::{DecayPersistence, StorageError};

#[async_trait]
impl DecayPersistence for SqliteStore {
    async fn commit_decay(
        &self,
        today: NaiveDate,
        updates: &[DecayUpdate],
    ) -> Result<bool, StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        // claim compare-and-set on the singleton marker row; the update arm
        // only fires when the stored date differs from today
        let claimed = sqlx::query(
            r"
            INSERT INTO decay_marker (id, last_processed_date)
            VALUES (0, ?1)
            ON CONFLICT(id) DO UPDATE SET
                last_processed_date = excluded.last_processed_date
            WHERE decay_marker.last_processed_date <> excluded.last_processed_date
            ",
        )
        .bind(today)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .rows_affected()
            == 1;

        if !claimed {
            tx.rollback()
                .await
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            return Ok(false);
        }

        // last_studied_date is deliberately untouched: fading is not studying
        for update in updates {
            let result = sqlx::query("UPDATE words SET score = ?2 WHERE id = ?1")
                .bind(word_id_to_i64(update.word_id)?)
                .bind(update.score.value())
                .execute(&mut *tx)
                .await
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            if result.rows_affected() == 0 {
                // the word vanished between planning and commit; drop the
                // whole pass so the claim rolls back with it
                tx.rollback()
                    .await
                    .map_err(|e| StorageError::Connection(e.to_string()))?;
                return Err(StorageError::NotFound);
            }
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        log::info!("decay pass for {today}: {} word scores written", updates.len());
        Ok(true)
    }

    async fn last_processed(&self) -> Result<Option<NaiveDate>, StorageError> {
        let row = sqlx::query("SELECT last_processed_date FROM decay_marker WHERE id = 0")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        row.map(|row| row.try_get("last_processed_date").map_err(ser))
            .transpose()
    }
}
