#![forbid(unsafe_code)]

pub mod decay_service;
pub mod error;
pub mod session;
pub mod stats_service;
pub mod study_service;

pub use tango_core::{Clock, StudyCalendar};

pub use decay_service::{DecayOutcome, DecayService};
pub use error::{DecayServiceError, SessionError, StatsServiceError, StudyServiceError};
pub use session::{StudyMode, StudySession};
pub use stats_service::{StatsService, StudyOverview};
pub use study_service::{StudyService, StudyUpdate};
