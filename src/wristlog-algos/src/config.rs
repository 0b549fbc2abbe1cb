use chrono::TimeDelta;
use strum::{Display, EnumString};
use thiserror::Error;
use wristlog_types::HeartRateRange;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{0}` must be greater than zero")]
    NotPositive(&'static str),
    #[error("`{0}` must be a finite, non-negative number")]
    InvalidNumber(&'static str),
    #[error("`{0}` is out of range")]
    OutOfRange(&'static str),
    #[error("heart rate range {min}..={max} is empty")]
    EmptyHeartRateRange { min: i32, max: i32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    /// Fraction of body height covered by one step.
    pub fn step_length_multiplier(self) -> f64 {
        match self {
            Gender::Male => 0.46,
            Gender::Female => 0.44,
            Gender::Other => 0.45,
        }
    }
}

/// Thresholds shared by the sleep and step segmenters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentationConfig {
    /// Light plus deep sleep a sleep session must exceed.
    pub min_sleep_session_length: TimeDelta,
    /// Non-sleep time after which an open sleep session is closed.
    pub max_wake_gap: TimeDelta,
    pub min_step_session_length: TimeDelta,
    pub max_idle_phase_length: TimeDelta,
    /// Compared against the step count of a single sample, not a real rate.
    pub min_steps_per_minute_sample: u32,
    pub min_session_intensity: f32,
    pub min_steps_per_minute_for_run: u32,
    pub gender: Gender,
    pub height_cm: u32,
    /// Measured step length; takes precedence over the height estimate when set.
    pub step_length_cm: Option<u32>,
    pub heart_rate_range: HeartRateRange,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_sleep_session_length: TimeDelta::minutes(5),
            max_wake_gap: TimeDelta::hours(2),
            min_step_session_length: TimeDelta::minutes(5),
            max_idle_phase_length: TimeDelta::minutes(5),
            min_steps_per_minute_sample: 40,
            min_session_intensity: 0.4,
            min_steps_per_minute_for_run: 120,
            gender: Gender::Other,
            height_cm: 175,
            step_length_cm: None,
            heart_rate_range: HeartRateRange::default(),
        }
    }
}

impl SegmentationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("min_sleep_session_length", self.min_sleep_session_length),
            ("max_wake_gap", self.max_wake_gap),
            ("min_step_session_length", self.min_step_session_length),
            ("max_idle_phase_length", self.max_idle_phase_length),
        ];
        for (name, value) in durations {
            if value <= TimeDelta::zero() {
                return Err(ConfigError::NotPositive(name));
            }
        }

        if self.min_steps_per_minute_for_run == 0 {
            return Err(ConfigError::NotPositive("min_steps_per_minute_for_run"));
        }

        if !self.min_session_intensity.is_finite() || self.min_session_intensity < 0.0 {
            return Err(ConfigError::InvalidNumber("min_session_intensity"));
        }

        match self.step_length_cm {
            Some(0) => return Err(ConfigError::NotPositive("step_length_cm")),
            None if self.height_cm == 0 => return Err(ConfigError::NotPositive("height_cm")),
            _ => {}
        }

        let HeartRateRange { min, max } = self.heart_rate_range;
        if min > max {
            return Err(ConfigError::EmptyHeartRateRange { min, max });
        }

        Ok(())
    }

    pub fn step_length_meters(&self) -> f64 {
        match self.step_length_cm {
            Some(cm) => f64::from(cm) / 100.0,
            None => f64::from(self.height_cm) * self.gender.step_length_multiplier() / 100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreakConfig {
    pub daily_step_goal: u64,
    /// Oldest year the backward scan is allowed to reach.
    pub floor_year: i32,
}

impl StreakConfig {
    pub const MIN_YEAR: i32 = 2015;

    pub fn new(daily_step_goal: u64) -> Self {
        Self {
            daily_step_goal,
            floor_year: Self::MIN_YEAR,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.daily_step_goal == 0 {
            return Err(ConfigError::NotPositive("daily_step_goal"));
        }
        Ok(())
    }
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self::new(8000)
    }
}

/// Minutes as a duration, failing instead of overflowing.
pub fn minutes(name: &'static str, value: i64) -> Result<TimeDelta, ConfigError> {
    TimeDelta::try_minutes(value).ok_or(ConfigError::OutOfRange(name))
}

/// Supplies the tunable thresholds as plain values.
pub trait ConfigurationProvider {
    /// Fails when a raw value cannot be represented.
    fn segmentation_config(&self) -> Result<SegmentationConfig, ConfigError>;

    fn daily_step_goal(&self) -> u64;

    fn validated_segmentation_config(&self) -> Result<SegmentationConfig, ConfigError> {
        let config = self.segmentation_config()?;
        config.validate()?;
        Ok(config)
    }

    fn streak_config(&self) -> Result<StreakConfig, ConfigError> {
        let config = StreakConfig::new(self.daily_step_goal());
        config.validate()?;
        Ok(config)
    }
}
