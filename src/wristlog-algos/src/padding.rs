use wristlog_types::{ActivitySample, Timestamp};

/// Returns the samples anchored to `[ts_from, ts_to]`: a synthetic sample is
/// added at each edge the real data does not already reach.
pub fn ensure_start_and_end_samples(
    samples: &[ActivitySample],
    ts_from: Timestamp,
    ts_to: Timestamp,
) -> Vec<ActivitySample> {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Vec::new();
    };

    let mut padded = Vec::with_capacity(samples.len() + 2);
    if first.timestamp > ts_from {
        padded.push(ActivitySample::synthetic(first, ts_from));
    }
    padded.extend_from_slice(samples);
    if last.timestamp < ts_to {
        padded.push(ActivitySample::synthetic(last, ts_to));
    }

    padded
}
