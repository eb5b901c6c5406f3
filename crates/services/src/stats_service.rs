use chrono::NaiveDate;
use serde::Serialize;

use storage::repository::Storage;
use tango_core::model::DailyStats;
use tango_core::{Clock, StudyCalendar};

use crate::error::StatsServiceError;

/// Word-count and today's-activity snapshot for a home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StudyOverview {
    pub total_words: u64,
    pub studied_today: u32,
}

/// Read-side queries over the study ledger.
#[derive(Clone)]
pub struct StatsService {
    storage: Storage,
    clock: Clock,
    calendar: StudyCalendar,
}

impl StatsService {
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            clock: Clock::default(),
            calendar: StudyCalendar::default(),
        }
    }

    /// Replaces the clock, usually with a fixed one for tests.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the study calendar.
    #[must_use]
    pub fn with_calendar(mut self, calendar: StudyCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Today's date in the study zone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.calendar.date_of(self.clock.now())
    }

    /// Total stored words plus today's study count.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn overview(&self) -> Result<StudyOverview, StatsServiceError> {
        let total_words = self.storage.words.word_count().await?;
        let studied_today = self.storage.daily_stats.study_count(self.today()).await?;
        Ok(StudyOverview {
            total_words,
            studied_today,
        })
    }

    /// Daily study counts between the bounds (inclusive), newest first.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn history(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<DailyStats>, StatsServiceError> {
        Ok(self.storage.daily_stats.history(from, to).await?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
