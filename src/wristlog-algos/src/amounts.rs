use wristlog_types::{ActivityAmount, ActivityAmounts, ActivityKind, ActivitySample};

/// Time and steps per kind over a range of samples.
pub struct ActivityAmountAggregator;

impl ActivityAmountAggregator {
    const BUCKETS: [ActivityKind; 5] = [
        ActivityKind::DeepSleep,
        ActivityKind::LightSleep,
        ActivityKind::RemSleep,
        ActivityKind::NotWorn,
        ActivityKind::Activity,
    ];

    fn bucket(kind: ActivityKind) -> usize {
        match kind {
            ActivityKind::DeepSleep => 0,
            ActivityKind::LightSleep => 1,
            ActivityKind::RemSleep => 2,
            ActivityKind::NotWorn => 3,
            _ => 4,
        }
    }

    /// A gap between two samples of different raw kinds is split in half
    /// between the bucket before and the bucket after it.
    pub fn calculate_activity_amounts(samples: &[ActivitySample]) -> ActivityAmounts {
        let mut amounts = Self::BUCKETS.map(ActivityAmount::new);
        let mut previous: Option<(&ActivitySample, usize)> = None;

        for sample in samples {
            let current = Self::bucket(sample.kind);
            amounts[current].add_steps(u64::from(sample.steps));

            if let Some((previous_sample, previous_bucket)) = previous {
                let elapsed = sample.timestamp - previous_sample.timestamp;
                if previous_sample.raw_kind == sample.raw_kind {
                    amounts[current].add_seconds(elapsed);
                } else {
                    let half = elapsed / 2;
                    amounts[previous_bucket].add_seconds(half);
                    amounts[current].add_seconds(elapsed - half);
                }
            }

            amounts[current].touch(sample.timestamp);
            previous = Some((sample, current));
        }

        ActivityAmounts::from_amounts(amounts)
    }

    pub fn calculate_total_steps(samples: &[ActivitySample]) -> u64 {
        samples.iter().map(|s| u64::from(s.steps)).sum()
    }
}
