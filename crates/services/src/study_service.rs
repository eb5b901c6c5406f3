use chrono::NaiveDate;

use storage::repository::Storage;
use tango_core::model::{Rating, WordId};
use tango_core::scoring::{RatingUpdate, ScoreChange, TestAnswerUpdate};
use tango_core::{Clock, StudyCalendar};

use crate::error::StudyServiceError;

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// Outcome of one study action: the committed score change plus the day's
/// running study count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudyUpdate {
    pub change: ScoreChange,
    pub today_count: u32,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Applies study outcomes to the shared store.
///
/// A study action is two store writes composed in order: the atomic score
/// update stamped with today's date, then the daily-counter bump. If the
/// score update fails nothing is counted.
#[derive(Clone)]
pub struct StudyService {
    storage: Storage,
    clock: Clock,
    calendar: StudyCalendar,
}

impl StudyService {
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

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Applies a flashcard rating to one word and counts the study event.
    ///
    /// # Errors
    ///
    /// Propagates storage failures; `StorageError::NotFound` means the word
    /// does not exist. The word record is unchanged on any failure.
    pub async fn rate_word(
        &self,
        id: WordId,
        rating: Rating,
    ) -> Result<StudyUpdate, StudyServiceError> {
        self.apply(id, &RatingUpdate::new(rating)).await
    }

    /// Same as [`rate_word`](Self::rate_word) for the raw `1..=4` value a
    /// study screen submits.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError::Rating` for values outside `1..=4`.
    pub async fn rate_word_value(
        &self,
        id: WordId,
        rating: u8,
    ) -> Result<StudyUpdate, StudyServiceError> {
        let rating = Rating::from_u8(rating)?;
        self.rate_word(id, rating).await
    }

    /// Applies a typing-test answer to one word and counts the study event.
    ///
    /// # Errors
    ///
    /// Propagates storage failures, as for [`rate_word`](Self::rate_word).
    pub async fn grade_test_answer(
        &self,
        id: WordId,
        correct: bool,
    ) -> Result<StudyUpdate, StudyServiceError> {
        self.apply(id, &TestAnswerUpdate::new(correct)).await
    }

    async fn apply(
        &self,
        id: WordId,
        update: &dyn tango_core::scoring::ScoreUpdateStrategy,
    ) -> Result<StudyUpdate, StudyServiceError> {
        let today = self.today();
        let change = self.storage.words.update_word_score(id, today, update).await?;
        let today_count = self
            .storage
            .daily_stats
            .increment_study_count(today, self.clock.now())
            .await?;
        log::debug!(
            "{} event for word {id}: {} -> {} ({today_count} studied today)",
            update.mode(),
            change.previous,
            change.new_score
        );
        Ok(StudyUpdate {
            change,
            today_count,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use tango_core::model::Word;
    use tango_core::time::{fixed_clock, fixed_now};

    fn service() -> StudyService {
        StudyService::new(Storage::in_memory()).with_clock(fixed_clock())
    }

    async fn seed(service: &StudyService, id: u64) {
        let word = Word::new(
            WordId::new(id),
            format!("word-{id}"),
            vec![],
            fixed_now(),
        );
        service.storage().words.upsert_word(&word).await.unwrap();
    }

    #[tokio::test]
    async fn test_rate_word_updates_score_and_counter() {
        let service = service();
        seed(&service, 1).await;

        let update = service.rate_word(WordId::new(1), Rating::Good).await.unwrap();
        assert_eq!(update.change.new_score.value(), 62.5);
        assert_eq!(update.today_count, 1);

        let word = service.storage().words.get_word(WordId::new(1)).await.unwrap();
        assert_eq!(word.last_studied(), Some(service.today()));
    }

    #[tokio::test]
    async fn test_rate_word_value_validates_range() {
        let service = service();
        seed(&service, 1).await;

        let err = service.rate_word_value(WordId::new(1), 5).await.unwrap_err();
        assert!(matches!(err, StudyServiceError::Rating(_)));
        // nothing was counted for the rejected rating
        assert_eq!(
            service
                .storage()
                .daily_stats
                .study_count(service.today())
                .await
                .unwrap(),
            0
        );

        let update = service.rate_word_value(WordId::new(1), 4).await.unwrap();
        assert_eq!(update.change.new_score.value(), 75.0);
    }

    #[tokio::test]
    async fn test_failed_update_counts_nothing() {
        let service = service();
        let err = service
            .grade_test_answer(WordId::new(9), true)
            .await
            .unwrap_err();
        assert!(matches!(err, StudyServiceError::Storage(_)));
        assert_eq!(
            service
                .storage()
                .daily_stats
                .study_count(service.today())
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_both_study_paths_share_the_counter() {
        let service = service();
        seed(&service, 1).await;
        seed(&service, 2).await;

        let rated = service.rate_word(WordId::new(1), Rating::Easy).await.unwrap();
        assert_eq!(rated.today_count, 1);
        let graded = service.grade_test_answer(WordId::new(2), false).await.unwrap();
        assert_eq!(graded.today_count, 2);
        assert_eq!(graded.change.new_score.value(), 25.0);
    }
}
