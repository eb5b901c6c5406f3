use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Fixed-offset calendar that decides where a study day begins and ends.
///
/// Same-day repeats score differently, decay runs once per calendar date,
/// and the daily counter is keyed by date, so every component has to agree
/// on what "today" means. The offset is injected here once instead of each
/// call site reaching for local time. Defaults to UTC+9 (Japan Standard
/// Time, the study zone the word data is written for).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyCalendar {
    offset: FixedOffset,
}

impl StudyCalendar {
    const DEFAULT_OFFSET_SECS: i32 = 9 * 3600;

    /// Calendar with an explicit UTC offset.
    #[must_use]
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Calendar pinned to UTC.
    #[must_use]
    pub fn utc() -> Self {
        Self {
            offset: FixedOffset::east_opt(0).expect("zero offset should be valid"),
        }
    }

    /// The calendar date of the instant `at`, in the study zone.
    #[must_use]
    pub fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// Whole days elapsed from `base` to `today` (negative when backdated).
    #[must_use]
    pub fn days_between(base: NaiveDate, today: NaiveDate) -> i64 {
        today.signed_duration_since(base).num_days()
    }
}

impl Default for StudyCalendar {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(Self::DEFAULT_OFFSET_SECS)
                .expect("UTC+9 should be a valid offset"),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
