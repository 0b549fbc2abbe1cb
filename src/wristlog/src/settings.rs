use clap::Args;
use wristlog_algos::{ConfigError, ConfigurationProvider, Gender, SegmentationConfig, minutes};
use wristlog_types::HeartRateRange;

/// Segmentation thresholds, settable from flags, the environment or `.env`.
#[derive(Args, Clone, Debug)]
pub struct ThresholdArgs {
    /// Light plus deep sleep (minutes) a sleep session must exceed
    #[arg(env, long, default_value_t = 5)]
    pub min_sleep_minutes: i64,
    /// Minutes without sleep that close an open sleep session
    #[arg(env, long, default_value_t = 120)]
    pub max_wake_gap_minutes: i64,
    #[arg(env, long, default_value_t = 5)]
    pub min_step_session_minutes: i64,
    #[arg(env, long, default_value_t = 5)]
    pub max_idle_minutes: i64,
    /// Steps a single sample needs to count as active on its own
    #[arg(env, long, default_value_t = 40)]
    pub min_sample_steps: u32,
    #[arg(env, long, default_value_t = 0.4)]
    pub min_session_intensity: f32,
    #[arg(env, long, default_value_t = 120)]
    pub run_steps_per_minute: u32,
    #[arg(env, long, default_value_t = Gender::Other)]
    pub gender: Gender,
    #[arg(env, long, default_value_t = 175)]
    pub height_cm: u32,
    /// Measured step length, overrides the estimate from height
    #[arg(env, long)]
    pub step_length_cm: Option<u32>,
    #[arg(env, long, default_value_t = 1)]
    pub min_heart_rate: i32,
    #[arg(env, long, default_value_t = 254)]
    pub max_heart_rate: i32,
    #[arg(env, long, default_value_t = 8000)]
    pub daily_step_goal: u64,
}

impl ConfigurationProvider for ThresholdArgs {
    fn segmentation_config(&self) -> Result<SegmentationConfig, ConfigError> {
        Ok(SegmentationConfig {
            min_sleep_session_length: minutes("min_sleep_session_length", self.min_sleep_minutes)?,
            max_wake_gap: minutes("max_wake_gap", self.max_wake_gap_minutes)?,
            min_step_session_length: minutes(
                "min_step_session_length",
                self.min_step_session_minutes,
            )?,
            max_idle_phase_length: minutes("max_idle_phase_length", self.max_idle_minutes)?,
            min_steps_per_minute_sample: self.min_sample_steps,
            min_session_intensity: self.min_session_intensity,
            min_steps_per_minute_for_run: self.run_steps_per_minute,
            gender: self.gender,
            height_cm: self.height_cm,
            step_length_cm: self.step_length_cm,
            heart_rate_range: HeartRateRange {
                min: self.min_heart_rate,
                max: self.max_heart_rate,
            },
        })
    }

    fn daily_step_goal(&self) -> u64 {
        self.daily_step_goal
    }
}
