//! Plain-text renderings used by the CLI.

use std::fmt::{self, Display};

use chrono::{DateTime, FixedOffset};
use wristlog_algos::{SleepTotals, helpers::format_hm::FormatHM};
use wristlog_types::{
    ActivityAmounts, SleepSession, StepSession, StepSessionSummary, StreakSummary, Timestamp,
};

fn local_time(timestamp: Timestamp, offset: FixedOffset) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|t| t.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

pub struct SleepReport<'a> {
    pub sessions: &'a [SleepSession],
    pub offset: FixedOffset,
}

impl Display for SleepReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for session in self.sessions {
            writeln!(
                f,
                "{} - {}  light {}  deep {}  rem {}  awake {}",
                local_time(session.start, self.offset),
                local_time(session.end, self.offset),
                session.light_seconds.format_hm(),
                session.deep_seconds.format_hm(),
                session.rem_seconds.format_hm(),
                session.awake_seconds.format_hm(),
            )?;
        }

        let totals = SleepTotals::new(self.sessions);
        write!(
            f,
            "Sessions: {}\nAsleep: {} (light {}, deep {}, rem {})",
            self.sessions.len(),
            totals.asleep_seconds().format_hm(),
            totals.light_seconds.format_hm(),
            totals.deep_seconds.format_hm(),
            totals.rem_seconds.format_hm(),
        )
    }
}

pub struct StepReport<'a> {
    pub sessions: &'a [StepSession],
    pub summary: &'a StepSessionSummary,
    pub offset: FixedOffset,
}

impl Display for StepReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for session in self.sessions {
            writeln!(
                f,
                "{} - {}  {:<8} {:>6} steps  {:>8.0} m  hr {:>3}{}",
                local_time(session.start, self.offset),
                local_time(session.end, self.offset),
                session.activity_kind,
                session.active_steps,
                session.distance_meters,
                session.heart_rate_average,
                if session.is_ongoing() { "  (ongoing)" } else { "" },
            )?;
        }

        let summary = self.summary;
        if summary.is_empty {
            return write!(f, "No step sessions, {} steps total", summary.total_day_steps);
        }

        write!(
            f,
            "Sessions: {}\nDuration: {}\nActive steps: {} of {}\nDistance: {:.2} km\nAverage heart rate: {}",
            summary.session_count,
            summary.total_duration_seconds.format_hm(),
            summary.active_steps,
            summary.total_day_steps,
            summary.distance_meters / 1000.0,
            summary.heart_rate_average,
        )
    }
}

pub struct AmountsReport<'a>(pub &'a ActivityAmounts);

impl Display for AmountsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No recorded activity");
        }

        for amount in self.0.amounts() {
            writeln!(
                f,
                "{:<12} {}  {:>5.1}%  {} steps",
                amount.kind.to_string(),
                amount.total_seconds.format_hm(),
                amount.percentage,
                amount.total_steps,
            )?;
        }
        write!(f, "Total: {}", self.0.total_seconds().format_hm())
    }
}

pub struct StreakReport<'a>(pub &'a StreakSummary);

impl Display for StreakReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        let day = |d: Option<chrono::NaiveDate>| {
            d.map_or_else(|| "-".to_owned(), |d| d.to_string())
        };

        write!(
            f,
            "Current streak: {} days from {} ({} steps/day)\n\
             Longest streak: {} days from {} ({} steps/day)\n\
             Goal reached: {} of {} active days ({:.0}%)\n\
             Lifetime steps: {} since {}",
            s.current_streak_days,
            day(s.current_streak_start_day),
            s.current_average_steps(),
            s.max_streak_days,
            day(s.max_streak_start_day),
            s.max_average_steps(),
            s.lifetime_qualifying_days,
            s.lifetime_active_days,
            s.achievement_rate(),
            s.lifetime_steps,
            day(s.first_active_day),
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use wristlog_types::{ActivityAmount, ActivityKind};

    use super::*;

    #[test]
    fn amounts_report() {
        let mut light = ActivityAmount::new(ActivityKind::LightSleep);
        light.add_seconds(5400);
        let mut activity = ActivityAmount::new(ActivityKind::Activity);
        activity.add_seconds(1800);
        activity.add_steps(2500);
        let amounts = ActivityAmounts::from_amounts([light, activity]);

        let text = AmountsReport(&amounts).to_string();
        assert!(text.contains("light_sleep  01:30   75.0%"));
        assert!(text.ends_with("Total: 02:00"));
        assert_eq!(
            AmountsReport(&ActivityAmounts::default()).to_string(),
            "No recorded activity"
        );
    }

    #[test]
    fn streak_report() {
        let summary = StreakSummary {
            current_streak_days: 2,
            current_streak_steps: 17000,
            current_streak_start_day: NaiveDate::from_ymd_opt(2024, 3, 4),
            lifetime_active_days: 5,
            lifetime_qualifying_days: 4,
            ..Default::default()
        };
        let text = StreakReport(&summary).to_string();
        assert!(text.starts_with("Current streak: 2 days from 2024-03-04 (8500 steps/day)"));
        assert!(text.contains("Goal reached: 4 of 5 active days (80%)"));
        assert!(text.contains("Longest streak: 0 days from -"));
    }

    #[test]
    fn sleep_report_uses_offset() {
        let sessions = [SleepSession {
            start: 1_700_000_000,
            end: 1_700_003_600,
            light_seconds: 1800,
            deep_seconds: 1200,
            rem_seconds: 600,
            awake_seconds: 0,
        }];
        let offset = FixedOffset::east_opt(3600).unwrap();
        let text = SleepReport {
            sessions: &sessions,
            offset,
        }
        .to_string();
        assert!(text.starts_with("2023-11-14 23:13 - 2023-11-15 00:13"));
        assert!(text.ends_with("Asleep: 01:00 (light 00:30, deep 00:20, rem 00:10)"));
    }
}
