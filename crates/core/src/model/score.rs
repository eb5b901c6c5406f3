use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors for memory score validation.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScoreError {
    /// The raw value is not a finite number in `[0, 100]`.
    #[error("memory score must be a finite value in [0, 100], got {0}")]
    OutOfRange(f64),
}

/// Retention estimate for one vocabulary word, always in `[0, 100]`.
///
/// New words start at the midpoint. Every update path (ratings, test
/// answers, daily decay) goes through [`MemoryScore::offset`] or
/// [`MemoryScore::clamped`], so a score can never leave the range no
/// matter what sequence of events is applied.
///
/// # Examples
///
/// ```
/// use tango_core::model::MemoryScore;
///
/// let score = MemoryScore::default();
/// assert_eq!(score.value(), 50.0);
/// assert_eq!(score.offset(75.0).value(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryScore(f64);

impl MemoryScore {
    /// Lowest representable score.
    pub const MIN: f64 = 0.0;
    /// Highest representable score.
    pub const MAX: f64 = 100.0;
    /// Score assigned at creation, and assumed for records persisted
    /// before scoring existed.
    pub const DEFAULT: f64 = 50.0;

    /// Validates a raw value read from storage or an API boundary.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::OutOfRange` when the value is not finite or
    /// falls outside `[0, 100]`.
    pub fn new(value: f64) -> Result<Self, ScoreError> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ScoreError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Builds a score from arbitrary finite arithmetic, clamping into range.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Returns the underlying value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Adds a signed delta and clamps the result into `[0, 100]`.
    #[must_use]
    pub fn offset(self, delta: f64) -> Self {
        Self::clamped(self.0 + delta)
    }

    /// Display bucket for word lists and per-word stats.
    #[must_use]
    pub fn band(self) -> ScoreBand {
        if self.0 < 30.0 {
            ScoreBand::Weak
        } else if self.0 < 60.0 {
            ScoreBand::Shaky
        } else if self.0 < 80.0 {
            ScoreBand::Solid
        } else {
            ScoreBand::Strong
        }
    }
}

impl Default for MemoryScore {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for MemoryScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Display bucket for a score, matching the word-list colour thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreBand {
    /// Below 30.
    Weak,
    /// 30 up to 60.
    Shaky,
    /// 60 up to 80.
    Solid,
    /// 80 and above.
    Strong,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
