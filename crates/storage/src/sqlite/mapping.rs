use sqlx::Row;
use tango_core::model::{DailyStats, WordId};

use crate::repository::{StorageError, WordRecord};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn word_id_from_i64(v: i64) -> Result<WordId, StorageError> {
    u64::try_from(v)
        .map(WordId::new)
        .map_err(|_| StorageError::Serialization("word_id sign overflow".into()))
}

pub(crate) fn word_id_to_i64(id: WordId) -> Result<i64, StorageError> {
    i64::try_from(id.value())
        .map_err(|_| StorageError::Serialization("word_id overflow".into()))
}

/// Translations travel as a JSON array in a single TEXT column.
pub(crate) fn translations_to_json(translations: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(translations).map_err(ser)
}

pub(crate) fn translations_from_json(raw: &str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_word_row(row: &sqlx::sqlite::SqliteRow) -> Result<WordRecord, StorageError> {
    let raw_translations: String = row.try_get("translations").map_err(ser)?;
    Ok(WordRecord {
        id: word_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        term: row.try_get("term").map_err(ser)?,
        translations: translations_from_json(&raw_translations)?,
        score: row.try_get("score").map_err(ser)?,
        last_studied_date: row.try_get("last_studied_date").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_study_count(raw: i64) -> Result<u32, StorageError> {
    u32::try_from(raw)
        .map_err(|_| StorageError::Serialization(format!("invalid study_count: {raw}")))
}

pub(crate) fn map_daily_stats_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<DailyStats, StorageError> {
    let count_i64: i64 = row.try_get("study_count").map_err(ser)?;
    Ok(DailyStats {
        date: row.try_get("date").map_err(ser)?,
        study_count: map_study_count(count_i64)?,
        created_at: row.try_get("created_at").map_err(ser)?,
        last_updated: row.try_get("last_updated").map_err(ser)?,
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
