use chrono::TimeDelta;

use crate::{ActivityKind, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepSession {
    pub start: Timestamp,
    pub end: Timestamp,
    pub light_seconds: i64,
    pub deep_seconds: i64,
    pub rem_seconds: i64,
    pub awake_seconds: i64,
}

impl SleepSession {
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds(self.end - self.start)
    }

    /// Light, deep and REM time; awake time is not sleep.
    pub fn asleep_seconds(&self) -> i64 {
        self.light_seconds + self.deep_seconds + self.rem_seconds
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    #[default]
    Complete,
    /// Flushed at the end of the sample stream; more activity may still follow.
    Ongoing,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepSession {
    pub start: Timestamp,
    pub end: Timestamp,
    pub active_steps: u64,
    pub heart_rate_average: i32,
    pub intensity_total: f32,
    pub distance_meters: f64,
    pub activity_kind: ActivityKind,
    pub session_type: SessionType,
}

impl StepSession {
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds(self.end - self.start)
    }

    pub fn is_ongoing(&self) -> bool {
        self.session_type == SessionType::Ongoing
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepSessionSummary {
    pub total_duration_seconds: i64,
    pub session_count: usize,
    pub active_steps: u64,
    pub heart_rate_average: i32,
    pub intensity_total: f32,
    pub distance_meters: f64,
    /// Every counted step of the range, inside sessions or not.
    pub total_day_steps: u64,
    pub is_empty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_duration_and_asleep_time() {
        let session = SleepSession {
            start: 0,
            end: 3600,
            light_seconds: 1200,
            deep_seconds: 1500,
            rem_seconds: 300,
            awake_seconds: 600,
        };
        assert_eq!(session.duration(), TimeDelta::hours(1));
        assert_eq!(session.asleep_seconds(), 3000);
    }

    #[test]
    fn step_session_serializes_kind_as_snake_case() {
        let session = StepSession {
            start: 0,
            end: 600,
            active_steps: 1100,
            heart_rate_average: 0,
            intensity_total: 0.0,
            distance_meters: 0.0,
            activity_kind: ActivityKind::Walking,
            session_type: SessionType::Ongoing,
        };
        let json = serde_json::to_value(session).unwrap();
        assert_eq!(json["activity_kind"], "walking");
        assert_eq!(json["session_type"], "ongoing");
        assert!(session.is_ongoing());
    }
}
