use chrono::NaiveDate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub steps: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current_streak_days: u32,
    pub current_streak_steps: u64,
    pub current_streak_start_day: Option<NaiveDate>,
    pub max_streak_days: u32,
    pub max_streak_steps: u64,
    pub max_streak_start_day: Option<NaiveDate>,
    /// Days with any steps recorded.
    pub lifetime_active_days: u32,
    pub lifetime_steps: u64,
    /// Days where the goal was met.
    pub lifetime_qualifying_days: u32,
    pub first_active_day: Option<NaiveDate>,
}

impl StreakSummary {
    pub fn current_average_steps(&self) -> u64 {
        average(self.current_streak_steps, self.current_streak_days)
    }

    pub fn max_average_steps(&self) -> u64 {
        average(self.max_streak_steps, self.max_streak_days)
    }

    pub fn lifetime_average_steps(&self) -> u64 {
        average(self.lifetime_steps, self.lifetime_active_days)
    }

    /// Percentage of active days on which the goal was met.
    pub fn achievement_rate(&self) -> f64 {
        if self.lifetime_active_days == 0 {
            0.0
        } else {
            f64::from(self.lifetime_qualifying_days) / f64::from(self.lifetime_active_days) * 100.0
        }
    }
}

fn average(steps: u64, days: u32) -> u64 {
    if days == 0 { 0 } else { steps / u64::from(days) }
}
