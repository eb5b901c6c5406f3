use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for rating conversion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RatingError {
    /// The raw value is outside the accepted `1..=4` range.
    #[error("invalid rating value: {0} (expected 1-4)")]
    InvalidRating(u8),
}

/// Self-assessment a learner gives after revealing a flashcard answer.
///
/// The four levels map to fixed score deltas; positives shrink on a
/// same-day repeat once the word is already strong (see
/// [`diminished_delta`](Rating::diminished_delta)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    /// Did not remember at all.
    Again,
    /// Remembered with difficulty.
    Hard,
    /// Remembered after some thought.
    Good,
    /// Remembered instantly.
    Easy,
}

impl Rating {
    /// Parses the `1..=4` wire value used by study screens.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::InvalidRating` for anything outside `1..=4`.
    pub fn from_u8(value: u8) -> Result<Self, RatingError> {
        match value {
            1 => Ok(Rating::Again),
            2 => Ok(Rating::Hard),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::Easy),
            other => Err(RatingError::InvalidRating(other)),
        }
    }

    /// The `1..=4` wire value.
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Rating::Again => 1,
            Rating::Hard => 2,
            Rating::Good => 3,
            Rating::Easy => 4,
        }
    }

    /// Score delta for the first study of the day (also used for same-day
    /// repeats while the word is still below the strength threshold).
    #[must_use]
    pub fn full_delta(self) -> f64 {
        match self {
            Rating::Again => -25.0,
            Rating::Hard => -12.5,
            Rating::Good => 12.5,
            Rating::Easy => 25.0,
        }
    }

    /// Score delta for a same-day repeat on an already-strong word.
    ///
    /// Positive deltas shrink to a tenth; penalties keep their full size.
    #[must_use]
    pub fn diminished_delta(self) -> f64 {
        match self {
            Rating::Again => -25.0,
            Rating::Hard => -12.5,
            Rating::Good => 1.25,
            Rating::Easy => 2.5,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
