//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use tango_core::model::RatingError;

/// Errors emitted by `StudyService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudyServiceError {
    #[error(transparent)]
    Rating(#[from] RatingError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DecayService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecayServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StatsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by study sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no words available to study")]
    Empty,
    #[error("no word is currently presented")]
    NoCurrentWord,
    #[error(transparent)]
    Study(#[from] StudyServiceError),
    #[error(transparent)]
    Decay(#[from] DecayServiceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
