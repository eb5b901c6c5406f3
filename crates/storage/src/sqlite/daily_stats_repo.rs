use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;

use tango_core::model::DailyStats;

use super::SqliteStore;
use super::mapping::{map_daily_stats_row, map_study_count, ser};
use crate::repository::{DailyStatsRepository, StorageError};

#[async_trait]
impl DailyStatsRepository for SqliteStore {
    async fn increment_study_count(
        &self,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<u32, StorageError> {
        // single-statement upsert keeps create-at-1 and increment atomic
        // under concurrent learners
        let row = sqlx::query(
            r"
            INSERT INTO daily_stats (date, study_count, created_at, last_updated)
            VALUES (?1, 1, ?2, ?2)
            ON CONFLICT(date) DO UPDATE SET
                study_count = daily_stats.study_count + 1,
                last_updated = excluded.last_updated
            RETURNING study_count
            ",
        )
        .bind(date)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        let count: i64 = row.try_get("study_count").map_err(ser)?;
        map_study_count(count)
    }

    async fn study_count(&self, date: NaiveDate) -> Result<u32, StorageError> {
        let row = sqlx::query("SELECT study_count FROM daily_stats WHERE date = ?1")
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match row {
            Some(row) => {
                let count: i64 = row.try_get("study_count").map_err(ser)?;
                map_study_count(count)
            }
            None => Ok(0),
        }
    }

    async fn history(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<DailyStats>, StorageError> {
        let mut sql =
            String::from("SELECT date, study_count, created_at, last_updated FROM daily_stats");
        match (from, to) {
            (Some(_), Some(_)) => sql.push_str(" WHERE date >= ?1 AND date <= ?2"),
            (Some(_), None) => sql.push_str(" WHERE date >= ?1"),
            (None, Some(_)) => sql.push_str(" WHERE date <= ?1"),
            (None, None) => {}
        }
        sql.push_str(" ORDER BY date DESC");

        let mut query = sqlx::query(&sql);
        if let Some(from) = from {
            query = query.bind(from);
        }
        if let Some(to) = to {
            query = query.bind(to);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut stats = Vec::with_capacity(rows.len());
        for row in &rows {
            stats.push(map_daily_stats_row(row)?);
        }
        Ok(stats)
    }
}
