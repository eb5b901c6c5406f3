use chrono::{DateTime, NaiveDate, Utc};

/// Shared study counter for one calendar date.
///
/// Created lazily by the first study event of the day with a count of 1;
/// every later event increments. All learners share the record, so the
/// increment has to be atomic at the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyStats {
    /// Calendar date in the study zone.
    pub date: NaiveDate,
    /// Number of study events recorded for `date`.
    pub study_count: u32,
    /// When the record was first created.
    pub created_at: DateTime<Utc>,
    /// When the counter last moved.
    pub last_updated: DateTime<Utc>,
}

/// Singleton coordination record for the daily decay pass.
///
/// `last_processed` names the most recent date whose pass has been
/// claimed. Claiming is a compare-and-set: exactly one caller per date
/// wins, and the batch of decayed scores commits in the same unit as the
/// claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecayMarker {
    /// Date of the last claimed pass, if any pass ever ran.
    pub last_processed: Option<NaiveDate>,
}
