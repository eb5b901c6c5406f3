#![forbid(unsafe_code)]

pub mod calendar;
pub mod decay;
pub mod model;
pub mod sampler;
pub mod scoring;
pub mod time;

pub use calendar::StudyCalendar;
pub use time::Clock;
