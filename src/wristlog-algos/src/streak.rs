use std::collections::BTreeMap;

use chrono::{Datelike, FixedOffset, NaiveDate};
use tokio_util::sync::CancellationToken;
use wristlog_types::{ActivitySample, DailyTotal, StreakSummary};

use crate::{
    ConfigError, StreakConfig,
    helpers::time_math::{day_of, shift_days},
};

/// Per-day step totals for one device.
pub trait DailyStepSource {
    /// Day of the first sample ever recorded, if there is any history.
    fn first_sample_day(&self) -> Option<NaiveDate>;

    fn steps_for_day(&self, day: NaiveDate) -> u64;
}

/// In-memory daily totals.
#[derive(Clone, Debug, Default)]
pub struct DailyTotals(BTreeMap<NaiveDate, u64>);

impl DailyTotals {
    pub fn new<I>(totals: I) -> Self
    where
        I: IntoIterator<Item = DailyTotal>,
    {
        let mut days = BTreeMap::new();
        for total in totals {
            *days.entry(total.day).or_insert(0) += total.steps;
        }
        Self(days)
    }

    /// Buckets sample steps into calendar days of the given offset.
    pub fn from_samples(samples: &[ActivitySample], offset: FixedOffset) -> Self {
        Self::new(samples.iter().filter_map(|s| {
            Some(DailyTotal {
                day: day_of(s.timestamp, offset)?,
                steps: u64::from(s.steps),
            })
        }))
    }
}

impl DailyStepSource for DailyTotals {
    fn first_sample_day(&self) -> Option<NaiveDate> {
        self.0.keys().next().copied()
    }

    fn steps_for_day(&self, day: NaiveDate) -> u64 {
        self.0.get(&day).copied().unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Streak {
    days: u32,
    steps: u64,
    start: Option<NaiveDate>,
}

impl Streak {
    fn extend(&mut self, day: NaiveDate, steps: u64) {
        self.days += 1;
        self.steps += steps;
        // walking backwards, so the latest day added is the first of the streak
        self.start = Some(day);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct StreakCalculator {
    goal: u64,
    floor_year: i32,
}

impl StreakCalculator {
    pub fn new(config: StreakConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            goal: config.daily_step_goal,
            floor_year: config.floor_year,
        })
    }

    /// Walks backwards one day at a time from `today`. Returns `None` when
    /// cancelled before the walk finished.
    pub fn scan<S>(
        &self,
        source: &S,
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> Option<StreakSummary>
    where
        S: DailyStepSource + ?Sized,
    {
        let Some(first_day) = source.first_sample_day() else {
            info!("no step history, nothing to scan");
            return Some(StreakSummary::default());
        };
        // one day before the first sample so the first day itself is counted
        let stop_day = shift_days(first_day, -1).unwrap_or(first_day);

        let mut summary = StreakSummary::default();
        let mut current: Option<Streak> = None;
        let mut max = Streak::default();
        let mut running = Streak::default();
        let mut day = today;

        loop {
            if cancel.is_cancelled() {
                debug!("streak scan cancelled at {}", day);
                return None;
            }

            if day < stop_day || day.year() < self.floor_year {
                break;
            }

            let steps = source.steps_for_day(day);
            if steps > 0 {
                summary.lifetime_active_days += 1;
                summary.lifetime_steps += steps;
                summary.first_active_day = Some(day);
            }

            if steps >= self.goal {
                running.extend(day, steps);
                summary.lifetime_qualifying_days += 1;
            } else if day != today {
                // today is still in progress and cannot break the streak
                current.get_or_insert(running);
                if running.days > 0 && running.days >= max.days {
                    max = running;
                }
                running = Streak::default();
            }

            match shift_days(day, -1) {
                Some(previous) => day = previous,
                None => break,
            }
        }

        let current = current.unwrap_or(running);
        if running.days > 0 && running.days >= max.days {
            max = running;
        }

        summary.current_streak_days = current.days;
        summary.current_streak_steps = current.steps;
        summary.current_streak_start_day = current.start;
        summary.max_streak_days = max.days;
        summary.max_streak_steps = max.steps;
        summary.max_streak_start_day = max.start;

        debug!(
            "streak scan done: current {} days, max {} days, {} qualifying of {} active",
            summary.current_streak_days,
            summary.max_streak_days,
            summary.lifetime_qualifying_days,
            summary.lifetime_active_days
        );
        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn totals(steps: &[u64]) -> DailyTotals {
        DailyTotals::new(steps.iter().enumerate().map(|(i, &steps)| DailyTotal {
            day: day(1 + i as u32),
            steps,
        }))
    }

    fn calculator(goal: u64) -> StreakCalculator {
        StreakCalculator::new(StreakConfig::new(goal)).unwrap()
    }

    #[test]
    fn example_history() {
        let source = totals(&[9000, 8200, 7000, 8500, 8500]);
        let summary = calculator(8000)
            .scan(&source, day(5), &CancellationToken::new())
            .unwrap();

        assert_eq!(summary.current_streak_days, 2);
        assert_eq!(summary.current_streak_steps, 17_000);
        assert_eq!(summary.current_streak_start_day, Some(day(4)));
        assert_eq!(summary.max_streak_days, 2);
        assert_eq!(summary.max_streak_steps, 17_200);
        assert_eq!(summary.max_streak_start_day, Some(day(1)));
        assert_eq!(summary.lifetime_qualifying_days, 4);
        assert_eq!(summary.lifetime_active_days, 5);
        assert_eq!(summary.lifetime_steps, 41_200);
        assert_eq!(summary.first_active_day, Some(day(1)));
    }

    #[test]
    fn today_below_goal_does_not_break_streak() {
        let source = totals(&[9000, 9000, 9000, 1200]);
        let summary = calculator(8000)
            .scan(&source, day(4), &CancellationToken::new())
            .unwrap();

        assert_eq!(summary.current_streak_days, 3);
        assert_eq!(summary.current_streak_start_day, Some(day(1)));
        assert_eq!(summary.max_streak_days, 3);
        assert_eq!(summary.lifetime_qualifying_days, 3);
        assert_eq!(summary.lifetime_active_days, 4);
    }

    #[test]
    fn missed_yesterday_means_no_current_streak() {
        let source = totals(&[9000, 9000, 9000, 100, 500]);
        let summary = calculator(8000)
            .scan(&source, day(5), &CancellationToken::new())
            .unwrap();

        assert_eq!(summary.current_streak_days, 0);
        assert_eq!(summary.current_streak_start_day, None);
        assert_eq!(summary.max_streak_days, 3);
    }

    #[test]
    fn longer_older_streak_wins() {
        let source = totals(&[8000, 8000, 8000, 0, 8000]);
        let summary = calculator(8000)
            .scan(&source, day(5), &CancellationToken::new())
            .unwrap();

        assert_eq!(summary.current_streak_days, 1);
        assert_eq!(summary.max_streak_days, 3);
        assert_eq!(summary.max_streak_start_day, Some(day(1)));
        assert_eq!(summary.lifetime_active_days, 4);
    }

    #[test]
    fn no_history_is_zeroed() {
        let summary = calculator(8000)
            .scan(&DailyTotals::default(), day(5), &CancellationToken::new())
            .unwrap();
        assert_eq!(summary, StreakSummary::default());
    }

    #[test]
    fn stops_at_floor_year() {
        // data stamped far in the past must not make the walk unbounded
        let source = DailyTotals::new([DailyTotal {
            day: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            steps: 10_000,
        }]);
        let summary = calculator(8000)
            .scan(&source, day(5), &CancellationToken::new())
            .unwrap();
        assert_eq!(summary.lifetime_active_days, 0);
    }

    #[test]
    fn cancelled_scan_has_no_answer() {
        let token = CancellationToken::new();
        token.cancel();
        let source = totals(&[9000, 9000]);
        assert!(calculator(8000).scan(&source, day(2), &token).is_none());
    }

    #[test]
    fn zero_goal_is_rejected() {
        assert!(StreakCalculator::new(StreakConfig::new(0)).is_err());
    }

    #[test]
    fn totals_from_samples() {
        use wristlog_types::ActivityKind;

        let utc = FixedOffset::east_opt(0).unwrap();
        let samples = [
            ActivitySample::new(10, ActivityKind::Walking).with_steps(100),
            ActivitySample::new(86_399, ActivityKind::Walking).with_steps(50),
            ActivitySample::new(86_400, ActivityKind::Running).with_steps(70),
            ActivitySample::new(86_460, ActivityKind::LightSleep),
        ];
        let totals = DailyTotals::from_samples(&samples, utc);
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(totals.first_sample_day(), Some(epoch));
        assert_eq!(totals.steps_for_day(epoch), 150);
        assert_eq!(totals.steps_for_day(epoch.succ_opt().unwrap()), 70);
    }

    #[test]
    fn duplicate_days_are_summed() {
        let source = DailyTotals::new([
            DailyTotal { day: day(1), steps: 4000 },
            DailyTotal { day: day(1), steps: 4500 },
        ]);
        assert_eq!(source.steps_for_day(day(1)), 8500);
        assert_eq!(source.first_sample_day(), Some(day(1)));
    }
}
