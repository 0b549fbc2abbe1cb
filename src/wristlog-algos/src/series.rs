use chrono::TimeDelta;
use wristlog_types::{ActivityKind, ActivitySample, HeartRateRange, SeriesKind, SeriesPoint};

#[derive(Clone, Copy, Debug)]
pub struct SeriesOptions {
    pub heart_rate_range: HeartRateRange,
    /// Heart rate readings further apart than this are not joined by a line.
    pub max_heart_rate_gap: TimeDelta,
    /// Lifts deep sleep above light sleep, and gives not-worn stretches something to draw.
    pub deep_sleep_offset: f32,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            heart_rate_range: HeartRateRange::default(),
            max_heart_rate_gap: TimeDelta::minutes(10),
            deep_sleep_offset: 0.01,
        }
    }
}

/// Line series for a day chart, one per kind plus heart rate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartSeries {
    pub activity: Vec<SeriesPoint>,
    pub deep_sleep: Vec<SeriesPoint>,
    pub light_sleep: Vec<SeriesPoint>,
    pub rem_sleep: Vec<SeriesPoint>,
    pub not_worn: Vec<SeriesPoint>,
    pub heart_rate: Vec<SeriesPoint>,
}

impl ChartSeries {
    pub fn build(samples: &[ActivitySample], options: &SeriesOptions) -> Self {
        let mut series = Self::default();
        if samples.len() < 2 {
            return series;
        }

        let max_gap = options.max_heart_rate_gap.num_seconds();
        let mut last_kind: Option<SeriesKind> = None;
        let mut last_heart_rate: Option<i64> = None;

        for sample in samples {
            let kind = SeriesKind::from(sample.kind);
            let ts = sample.timestamp;

            // drop every other series to zero so the fills do not bleed into each other
            if last_kind != Some(kind) {
                series.line_mut(kind).push(SeriesPoint::zero(ts - 1));
                for other in SeriesKind::ALL.into_iter().filter(|&k| k != kind) {
                    series.line_mut(other).push(SeriesPoint::zero(ts));
                }
            }

            let value = match kind {
                SeriesKind::DeepSleep => sample.intensity + options.deep_sleep_offset,
                SeriesKind::NotWorn => options.deep_sleep_offset,
                _ => sample.intensity,
            };
            series.line_mut(kind).push(SeriesPoint::new(ts, value));

            if sample.kind != ActivityKind::NotWorn
                && options.heart_rate_range.contains(sample.heart_rate)
            {
                if let Some(last) = last_heart_rate.filter(|&last| ts - last > max_gap) {
                    series.heart_rate.push(SeriesPoint::zero(last + 1));
                    series.heart_rate.push(SeriesPoint::zero(ts - 1));
                }
                series
                    .heart_rate
                    .push(SeriesPoint::new(ts, sample.heart_rate as f32));
                last_heart_rate = Some(ts);
            }

            last_kind = Some(kind);
        }

        trace!(
            "built chart series from {} samples ({} heart rate points)",
            samples.len(),
            series.heart_rate.len()
        );
        series
    }

    pub fn line(&self, kind: SeriesKind) -> &[SeriesPoint] {
        match kind {
            SeriesKind::Activity => &self.activity,
            SeriesKind::DeepSleep => &self.deep_sleep,
            SeriesKind::LightSleep => &self.light_sleep,
            SeriesKind::RemSleep => &self.rem_sleep,
            SeriesKind::NotWorn => &self.not_worn,
        }
    }

    fn line_mut(&mut self, kind: SeriesKind) -> &mut Vec<SeriesPoint> {
        match kind {
            SeriesKind::Activity => &mut self.activity,
            SeriesKind::DeepSleep => &mut self.deep_sleep,
            SeriesKind::LightSleep => &mut self.light_sleep,
            SeriesKind::RemSleep => &mut self.rem_sleep,
            SeriesKind::NotWorn => &mut self.not_worn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sample_has_no_series() {
        let samples = [ActivitySample::new(0, ActivityKind::Activity)];
        assert_eq!(
            ChartSeries::build(&samples, &SeriesOptions::default()),
            ChartSeries::default()
        );
    }

    #[test]
    fn transition_drops_other_series() {
        let samples = [
            ActivitySample::new(100, ActivityKind::Walking).with_intensity(0.5),
            ActivitySample::new(160, ActivityKind::Running).with_intensity(0.7),
            ActivitySample::new(220, ActivityKind::DeepSleep).with_intensity(0.1),
        ];
        let series = ChartSeries::build(&samples, &SeriesOptions::default());

        // walking and running share the activity series, no transition between them
        assert_eq!(
            series.line(SeriesKind::Activity),
            &[
                SeriesPoint::zero(99),
                SeriesPoint::new(100, 0.5),
                SeriesPoint::new(160, 0.7),
                SeriesPoint::zero(220),
            ]
        );
        assert_eq!(series.deep_sleep[0], SeriesPoint::zero(100));
        assert_eq!(series.deep_sleep[1], SeriesPoint::zero(219));
        assert!((series.deep_sleep[2].value - 0.11).abs() < 1e-6);
        assert_eq!(series.not_worn, vec![SeriesPoint::zero(100), SeriesPoint::zero(220)]);
    }

    #[test]
    fn heart_rate_gaps_are_broken() {
        let samples = [
            ActivitySample::new(0, ActivityKind::Activity).with_heart_rate(70),
            ActivitySample::new(60, ActivityKind::Activity).with_heart_rate(72),
            ActivitySample::new(60 + 3600, ActivityKind::Activity).with_heart_rate(80),
        ];
        let series = ChartSeries::build(&samples, &SeriesOptions::default());
        assert_eq!(
            series.heart_rate,
            vec![
                SeriesPoint::new(0, 70.0),
                SeriesPoint::new(60, 72.0),
                SeriesPoint::zero(61),
                SeriesPoint::zero(3659),
                SeriesPoint::new(3660, 80.0),
            ]
        );
    }

    #[test]
    fn not_worn_and_sentinel_heart_rates_are_skipped() {
        let samples = [
            ActivitySample::new(0, ActivityKind::NotWorn).with_heart_rate(60),
            ActivitySample::new(60, ActivityKind::Activity).with_heart_rate(255),
            ActivitySample::new(120, ActivityKind::Activity).with_heart_rate(-1),
        ];
        let series = ChartSeries::build(&samples, &SeriesOptions::default());
        assert!(series.heart_rate.is_empty());
        assert_eq!(series.not_worn[1], SeriesPoint::new(0, 0.01));
    }
}
