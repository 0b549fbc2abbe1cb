#[macro_use]
extern crate log;

pub mod config;
pub use config::{
    ConfigError, ConfigurationProvider, Gender, SegmentationConfig, StreakConfig, minutes,
};

pub(crate) mod sleep;
pub use sleep::{SleepSessionSegmenter, SleepTotals};

pub(crate) mod steps;
pub use steps::StepSessionSegmenter;

pub(crate) mod amounts;
pub use amounts::ActivityAmountAggregator;

pub(crate) mod streak;
pub use streak::{DailyStepSource, DailyTotals, StreakCalculator};

pub(crate) mod series;
pub use series::{ChartSeries, SeriesOptions};

pub(crate) mod cache;
pub use cache::{AmountCache, DayKey};

pub(crate) mod padding;
pub use padding::ensure_start_and_end_samples;

pub mod helpers;
