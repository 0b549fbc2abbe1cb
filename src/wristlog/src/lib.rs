#[macro_use]
extern crate log;

mod source;
pub use source::{JsonSampleSource, SampleSource, SourceError, TimestampUnit};

mod settings;
pub use settings::ThresholdArgs;

mod worker;
pub use worker::{StreakState, StreakWorker};

pub mod report;
