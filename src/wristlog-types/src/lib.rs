#[macro_use]
extern crate serde;

pub mod samples;
pub use samples::{ActivityKind, ActivitySample, HeartRateRange, Timestamp};

pub mod sessions;
pub use sessions::{SessionType, SleepSession, StepSession, StepSessionSummary};

pub mod amounts;
pub use amounts::{ActivityAmount, ActivityAmounts};

pub mod streaks;
pub use streaks::{DailyTotal, StreakSummary};

pub mod series;
pub use series::{SeriesKind, SeriesPoint};
