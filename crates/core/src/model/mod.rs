mod ids;
mod rating;
mod score;
mod stats;
mod word;

pub use ids::{ParseIdError, WordId};
pub use rating::{Rating, RatingError};
pub use score::{MemoryScore, ScoreBand, ScoreError};
pub use stats::{DailyStats, DecayMarker};
pub use word::Word;
