#![forbid(unsafe_code)]

pub mod repository;
mod retry;
pub mod sqlite;

pub use repository::{
    DailyStatsRepository, DecayPersistence, InMemoryStore, Storage, StorageError, WordRecord,
    WordRepository,
};
pub use sqlite::{SqliteInitError, SqliteStore};
