use chrono::{DateTime, NaiveDate, Utc};

use crate::model::ids::WordId;
use crate::model::score::MemoryScore;

/// One vocabulary entry together with its tracked memory state.
///
/// The word text and translations are owned by an external editing
/// surface; this crate only reads them. The memory fields (`score`,
/// `last_studied`) are the part this engine mutates, always through the
/// storage layer so concurrent learners cannot lose each other's updates.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    id: WordId,
    term: String,
    translations: Vec<String>,
    score: MemoryScore,
    last_studied: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl Word {
    /// Creates a brand-new word with the default starting score and no
    /// study history.
    #[must_use]
    pub fn new(
        id: WordId,
        term: impl Into<String>,
        translations: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            term: term.into(),
            translations,
            score: MemoryScore::default(),
            last_studied: None,
            created_at,
        }
    }

    /// Rebuilds a word from persisted fields.
    #[must_use]
    pub fn from_persisted(
        id: WordId,
        term: String,
        translations: Vec<String>,
        score: MemoryScore,
        last_studied: Option<NaiveDate>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            term,
            translations,
            score,
            last_studied,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> WordId {
        self.id
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn translations(&self) -> &[String] {
        &self.translations
    }

    #[must_use]
    pub fn score(&self) -> MemoryScore {
        self.score
    }

    /// Calendar date of the last study event, in the study zone.
    #[must_use]
    pub fn last_studied(&self) -> Option<NaiveDate> {
        self.last_studied
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True when the word was last studied on `date`.
    #[must_use]
    pub fn studied_on(&self, date: NaiveDate) -> bool {
        self.last_studied == Some(date)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
