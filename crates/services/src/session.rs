use rand::rng;

use storage::repository::Storage;
use tango_core::model::{Rating, Word, WordId};
use tango_core::sampler;
use tango_core::{Clock, StudyCalendar};

use crate::decay_service::DecayService;
use crate::error::SessionError;
use crate::study_service::{StudyService, StudyUpdate};

/// How the next word is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudyMode {
    /// Every word is equally likely.
    #[default]
    Random,
    /// Weak words come up quadratically more often.
    WeakFocus,
}

/// One learner's study loop over the shared store.
///
/// Mirrors the flow a study screen drives: run the daily decay pass once,
/// load the word list, then alternate between picking a word and
/// submitting an outcome. The list is reloaded after every submission so
/// updates from concurrent learners become visible.
pub struct StudySession {
    mode: StudyMode,
    study: StudyService,
    words: Vec<Word>,
    current: Option<WordId>,
}

impl StudySession {
    /// Opens a session: runs the decay pass (at most once per date
    /// system-wide) and loads the word list.
    ///
    /// # Errors
    ///
    /// Propagates storage failures from the decay pass or the initial load.
    pub async fn begin(
        storage: Storage,
        mode: StudyMode,
        clock: Clock,
        calendar: StudyCalendar,
    ) -> Result<Self, SessionError> {
        let decay = DecayService::new(storage.clone())
            .with_clock(clock)
            .with_calendar(calendar);
        decay.run_if_needed().await?;

        let words = storage.words.list_words().await?;
        let study = StudyService::new(storage)
            .with_clock(clock)
            .with_calendar(calendar);
        Ok(Self {
            mode,
            study,
            words,
            current: None,
        })
    }

    /// Words currently loaded in this session, term-ordered.
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Picks the next word to present and remembers it as current.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when no words are loaded.
    pub fn next_word(&mut self) -> Result<Word, SessionError> {
        let mut rng = rng();
        let picked = match self.mode {
            StudyMode::Random => sampler::pick_uniform(&self.words, &mut rng),
            StudyMode::WeakFocus => sampler::pick_weighted(&self.words, &mut rng),
        }
        .ok_or(SessionError::Empty)?
        .clone();
        self.current = Some(picked.id());
        Ok(picked)
    }

    /// Submits a flashcard rating for the current word.
    ///
    /// Applies the score update, counts the study event, then reloads the
    /// list. The current word is kept on failure so the submission can be
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoCurrentWord` when no word is presented,
    /// otherwise propagates study and storage failures.
    pub async fn submit_rating(&mut self, rating: Rating) -> Result<StudyUpdate, SessionError> {
        let id = self.current.ok_or(SessionError::NoCurrentWord)?;
        let update = self.study.rate_word(id, rating).await?;
        self.current = None;
        self.reload().await?;
        Ok(update)
    }

    /// Submits a typing-test answer for the current word.
    ///
    /// # Errors
    ///
    /// Same contract as [`submit_rating`](Self::submit_rating).
    pub async fn submit_test_answer(&mut self, correct: bool) -> Result<StudyUpdate, SessionError> {
        let id = self.current.ok_or(SessionError::NoCurrentWord)?;
        let update = self.study.grade_test_answer(id, correct).await?;
        self.current = None;
        self.reload().await?;
        Ok(update)
    }

    /// Draws up to `n` distinct words for a typing test round.
    #[must_use]
    pub fn draw_test_words(&self, n: usize) -> Vec<Word> {
        let mut rng = rng();
        sampler::draw_test_words(&self.words, n, &mut rng)
    }

    async fn reload(&mut self) -> Result<(), SessionError> {
        self.words = self.study.storage().words.list_words().await?;
        Ok(())
    }
}
