use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use tango_core::decay::DecayUpdate;
use tango_core::model::{DailyStats, MemoryScore, Word, WordId};
use tango_core::scoring::{ScoreChange, ScoreUpdateStrategy};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The addressed record does not exist.
    #[error("not found")]
    NotFound,

    /// An optimistic read-modify-write lost its race. Adapters retry this
    /// internally; callers only see it once retries are exhausted.
    #[error("conflict")]
    Conflict,

    /// The backing store could not be reached or rejected the operation.
    #[error("connection error: {0}")]
    Connection(String),

    /// A stored value could not be decoded into the domain model.
    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Persisted shape of a word.
///
/// `score` stays optional at this layer: records written before scoring
/// existed have none, and the starting default is applied when reading into
/// the domain type. A read never writes the default back.
#[derive(Debug, Clone, PartialEq)]
pub struct WordRecord {
    pub id: WordId,
    pub term: String,
    pub translations: Vec<String>,
    pub score: Option<f64>,
    pub last_studied_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl WordRecord {
    #[must_use]
    pub fn from_word(word: &Word) -> Self {
        Self {
            id: word.id(),
            term: word.term().to_owned(),
            translations: word.translations().to_vec(),
            score: Some(word.score().value()),
            last_studied_date: word.last_studied(),
            created_at: word.created_at(),
        }
    }

    /// Converts the record into a domain `Word`, applying the read-time
    /// score default.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` when a stored score is not a
    /// finite value in `[0, 100]`.
    pub fn into_word(self) -> Result<Word, StorageError> {
        let score = read_score(self.score)?;
        Ok(Word::from_persisted(
            self.id,
            self.term,
            self.translations,
            score,
            self.last_studied_date,
            self.created_at,
        ))
    }
}

/// Validates an optional raw score, falling back to the starting default.
pub(crate) fn read_score(raw: Option<f64>) -> Result<MemoryScore, StorageError> {
    match raw {
        Some(value) => {
            MemoryScore::new(value).map_err(|e| StorageError::Serialization(e.to_string()))
        }
        None => Ok(MemoryScore::default()),
    }
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Repository contract for the shared word store.
#[async_trait]
pub trait WordRepository: Send + Sync {
    /// Inserts or replaces the record for `word.id()`.
    async fn upsert_word(&self, word: &Word) -> Result<(), StorageError>;

    /// Fetches one word.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when the id has no record.
    async fn get_word(&self, id: WordId) -> Result<Word, StorageError>;

    /// Fetches every word, ordered by term (case-insensitive).
    async fn list_words(&self) -> Result<Vec<Word>, StorageError>;

    /// Number of stored words.
    async fn word_count(&self) -> Result<u64, StorageError>;

    /// Atomically applies a score-update strategy to one word.
    ///
    /// Reads the current score and last-studied date, computes the next
    /// score, and commits the new score together with `today` as the
    /// last-studied date in one unit. Concurrent updates to the same word
    /// serialize; none may be lost. On failure the record is unchanged.
    async fn update_word_score(
        &self,
        id: WordId,
        today: NaiveDate,
        update: &dyn ScoreUpdateStrategy,
    ) -> Result<ScoreChange, StorageError>;
}

/// Repository contract for the shared per-date study counters.
#[async_trait]
pub trait DailyStatsRepository: Send + Sync {
    /// Atomically adds one study event to `date`'s counter, creating the
    /// record with a count of 1 when absent. Returns the new count.
    async fn increment_study_count(
        &self,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<u32, StorageError>;

    /// The count recorded for `date`, 0 when no record exists.
    async fn study_count(&self, date: NaiveDate) -> Result<u32, StorageError>;

    /// Stats between the bounds (inclusive), newest first. A `None` bound
    /// leaves that side open.
    async fn history(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<DailyStats>, StorageError>;
}

/// Atomic commit surface for the once-per-day decay pass.
///
/// The claim (compare-and-set on the marker date) and the batch of score
/// writes commit as one unit: either the marker advances and every planned
/// score lands, or nothing does.
#[async_trait]
pub trait DecayPersistence: Send + Sync {
    /// Attempts to claim `today` and commit the planned scores.
    ///
    /// Returns `false` and writes nothing when `today` is already claimed.
    /// Score writes must not touch `last_studied_date`.
    async fn commit_decay(
        &self,
        today: NaiveDate,
        updates: &[DecayUpdate],
    ) -> Result<bool, StorageError>;

    /// Date of the last claimed pass, if any.
    async fn last_processed(&self) -> Result<Option<NaiveDate>, StorageError>;
}

//
// ─── IN-MEMORY STORE ───────────────────────────────────────────────────────────
//

#[derive(Debug, Default)]
struct StoreInner {
    words: HashMap<WordId, WordRecord>,
    daily: BTreeMap<NaiveDate, DailyStats>,
    decay_marker: Option<NaiveDate>,
}

/// In-memory store for tests and prototyping.
///
/// One mutex guards all three record families, so every mutation path is
/// atomic under it, including the decay claim-plus-batch.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreInner>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl WordRepository for InMemoryStore {
    async fn upsert_word(&self, word: &Word) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.words.insert(word.id(), WordRecord::from_word(word));
        Ok(())
    }

    async fn get_word(&self, id: WordId) -> Result<Word, StorageError> {
        let guard = self.lock()?;
        let record = guard.words.get(&id).ok_or(StorageError::NotFound)?;
        record.clone().into_word()
    }

    async fn list_words(&self) -> Result<Vec<Word>, StorageError> {
        let guard = self.lock()?;
        let mut words = Vec::with_capacity(guard.words.len());
        for record in guard.words.values() {
            words.push(record.clone().into_word()?);
        }
        words.sort_by_key(|word| (word.term().to_lowercase(), word.id()));
        Ok(words)
    }

    async fn word_count(&self) -> Result<u64, StorageError> {
        let guard = self.lock()?;
        Ok(guard.words.len() as u64)
    }

    async fn update_word_score(
        &self,
        id: WordId,
        today: NaiveDate,
        update: &dyn ScoreUpdateStrategy,
    ) -> Result<ScoreChange, StorageError> {
        let mut guard = self.lock()?;
        let record = guard.words.get_mut(&id).ok_or(StorageError::NotFound)?;
        let previous = read_score(record.score)?;
        let studied_today = record.last_studied_date == Some(today);
        let next = update.next_score(previous, studied_today);
        record.score = Some(next.value());
        record.last_studied_date = Some(today);
        log::debug!("{} update for word {id}: {previous} -> {next}", update.mode());
        Ok(ScoreChange {
            word_id: id,
            previous,
            new_score: next,
            last_studied: today,
        })
    }
}

#[async_trait]
impl DailyStatsRepository for InMemoryStore {
    async fn increment_study_count(
        &self,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<u32, StorageError> {
        let mut guard = self.lock()?;
        let entry = guard.daily.entry(date).or_insert(DailyStats {
            date,
            study_count: 0,
            created_at: now,
            last_updated: now,
        });
        entry.study_count += 1;
        entry.last_updated = now;
        Ok(entry.study_count)
    }

    async fn study_count(&self, date: NaiveDate) -> Result<u32, StorageError> {
        let guard = self.lock()?;
        Ok(guard.daily.get(&date).map_or(0, |stats| stats.study_count))
    }

    async fn history(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<DailyStats>, StorageError> {
        let guard = self.lock()?;
        let mut stats: Vec<DailyStats> = guard
            .daily
            .values()
            .filter(|entry| {
                from.is_none_or(|f| entry.date >= f) && to.is_none_or(|t| entry.date <= t)
            })
            .copied()
            .collect();
        // BTreeMap iterates oldest first; history reads newest first
        stats.reverse();
        Ok(stats)
    }
}

#[async_trait]
impl DecayPersistence for InMemoryStore {
    async fn commit_decay(
        &self,
        today: NaiveDate,
        updates: &[DecayUpdate],
    ) -> Result<bool, StorageError> {
        let mut guard = self.lock()?;
        if guard.decay_marker == Some(today) {
            return Ok(false);
        }
        // validate every id first so a stale plan cannot half-apply
        for update in updates {
            if !guard.words.contains_key(&update.word_id) {
                return Err(StorageError::NotFound);
            }
        }
        guard.decay_marker = Some(today);
        for update in updates {
            if let Some(record) = guard.words.get_mut(&update.word_id) {
                record.score = Some(update.score.value());
            }
        }
        Ok(true)
    }

    async fn last_processed(&self) -> Result<Option<NaiveDate>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.decay_marker)
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates the three store contracts behind trait objects.
#[derive(Clone)]
pub struct Storage {
    pub words: Arc<dyn WordRepository>,
    pub daily_stats: Arc<dyn DailyStatsRepository>,
    pub decay: Arc<dyn DecayPersistence>,
}

impl Storage {
    /// Storage backed by a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        let words: Arc<dyn WordRepository> = Arc::new(store.clone());
        let daily_stats: Arc<dyn DailyStatsRepository> = Arc::new(store.clone());
        let decay: Arc<dyn DecayPersistence> = Arc::new(store);
        Self {
            words,
            daily_stats,
            decay,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
