use chrono::NaiveDate;

use storage::repository::Storage;
use tango_core::decay;
use tango_core::{Clock, StudyCalendar};

use crate::error::DecayServiceError;

/// Result of one decay attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayOutcome {
    /// False when today's pass had already run (here or elsewhere).
    pub processed: bool,
    /// Number of word scores this call wrote.
    pub words_updated: usize,
}

/// Runs the once-per-day score fade over the whole word list.
///
/// Every caller may invoke [`run_if_needed`](DecayService::run_if_needed)
/// on startup; the storage claim guarantees exactly one pass per calendar
/// date lands, no matter how many clients race for it.
#[derive(Clone)]
pub struct DecayService {
    storage: Storage,
    clock: Clock,
    calendar: StudyCalendar,
}

impl DecayService {
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

    /// Fades every word for the days elapsed since it was last studied,
    /// at most once per calendar date across all callers.
    ///
    /// # Errors
    ///
    /// Propagates storage failures. A failed attempt leaves the claim free,
    /// so the next caller retries the whole pass.
    pub async fn run_if_needed(&self) -> Result<DecayOutcome, DecayServiceError> {
        self.run_for_date(self.today()).await
    }

    /// Same as [`run_if_needed`](Self::run_if_needed) for an explicit date.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn run_for_date(&self, today: NaiveDate) -> Result<DecayOutcome, DecayServiceError> {
        let words = self.storage.words.list_words().await?;
        let updates = decay::plan_decay(&words, today, &self.calendar);
        let processed = self.storage.decay.commit_decay(today, &updates).await?;
        if processed {
            log::info!(
                "daily decay for {today}: faded {} of {} words",
                updates.len(),
                words.len()
            );
        } else {
            log::debug!("daily decay for {today} already claimed");
        }
        Ok(DecayOutcome {
            processed,
            words_updated: if processed { updates.len() } else { 0 },
        })
    }
}
