use wristlog_types::{ActivityKind, ActivitySample, SleepSession, Timestamp};

use crate::{ConfigError, SegmentationConfig};

#[derive(Clone, Copy, Debug)]
pub struct SleepSessionSegmenter {
    min_session_length: i64,
    max_wake_gap: i64,
}

#[derive(Clone, Copy, Debug)]
struct OpenSleep {
    start: Timestamp,
    end: Timestamp,
    light: i64,
    deep: i64,
    rem: i64,
    awake: i64,
}

impl OpenSleep {
    fn new(timestamp: Timestamp) -> Self {
        Self {
            start: timestamp,
            end: timestamp,
            light: 0,
            deep: 0,
            rem: 0,
            awake: 0,
        }
    }
}

impl Default for SleepSessionSegmenter {
    fn default() -> Self {
        Self::from_config(&SegmentationConfig::default())
    }
}

impl SleepSessionSegmenter {
    pub fn new(config: &SegmentationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: &SegmentationConfig) -> Self {
        Self {
            min_session_length: config.min_sleep_session_length.num_seconds(),
            max_wake_gap: config.max_wake_gap.num_seconds(),
        }
    }

    pub fn calculate_sleep_sessions(&self, samples: &[ActivitySample]) -> Vec<SleepSession> {
        let mut sessions = Vec::new();
        let mut open: Option<OpenSleep> = None;
        let mut seconds_since_last_sleep = 0_i64;
        let mut previous: Option<Timestamp> = None;

        for sample in samples.iter().filter(|s| !s.is_synthetic) {
            let was_open = open.is_some();

            if is_asleep(sample.kind) {
                let session = open.get_or_insert_with(|| OpenSleep::new(sample.timestamp));
                session.end = sample.timestamp;
                // wake time between two sleep samples of the same session
                if was_open {
                    session.awake += seconds_since_last_sleep;
                }
                seconds_since_last_sleep = 0;
            }

            if let Some(previous) = previous {
                let elapsed = sample.timestamp - previous;
                let session = open.as_mut().filter(|_| was_open);
                match (sample.kind, session) {
                    (ActivityKind::LightSleep, Some(session)) => session.light += elapsed,
                    (ActivityKind::DeepSleep, Some(session)) => session.deep += elapsed,
                    (ActivityKind::RemSleep, Some(session)) => session.rem += elapsed,
                    (kind, _) if is_asleep(kind) => {}
                    // awake in bed counts toward the wake gap like any other kind
                    _ => seconds_since_last_sleep += elapsed,
                }
            }
            previous = Some(sample.timestamp);

            if open.is_some() && seconds_since_last_sleep > self.max_wake_gap {
                if let Some(session) = open.take().and_then(|s| self.finish(s)) {
                    sessions.push(session);
                }
                seconds_since_last_sleep = 0;
            }
        }

        if let Some(session) = open.and_then(|s| self.finish(s)) {
            sessions.push(session);
        }

        debug!(
            "detected {} sleep sessions from {} samples",
            sessions.len(),
            samples.len()
        );
        sessions
    }

    fn finish(&self, session: OpenSleep) -> Option<SleepSession> {
        if session.light + session.deep <= self.min_session_length {
            trace!(
                "dropping sleep blip {}..{} ({}s light, {}s deep)",
                session.start, session.end, session.light, session.deep
            );
            return None;
        }

        Some(SleepSession {
            start: session.start,
            end: session.end,
            light_seconds: session.light,
            deep_seconds: session.deep,
            rem_seconds: session.rem,
            awake_seconds: session.awake,
        })
    }
}

fn is_asleep(kind: ActivityKind) -> bool {
    matches!(
        kind,
        ActivityKind::LightSleep | ActivityKind::DeepSleep | ActivityKind::RemSleep
    )
}

/// Stage totals over a list of sleep sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SleepTotals {
    pub light_seconds: i64,
    pub deep_seconds: i64,
    pub rem_seconds: i64,
    pub awake_seconds: i64,
}

impl SleepTotals {
    pub fn new(sessions: &[SleepSession]) -> Self {
        sessions.iter().fold(Self::default(), |totals, s| Self {
            light_seconds: totals.light_seconds + s.light_seconds,
            deep_seconds: totals.deep_seconds + s.deep_seconds,
            rem_seconds: totals.rem_seconds + s.rem_seconds,
            awake_seconds: totals.awake_seconds + s.awake_seconds,
        })
    }

    pub fn asleep_seconds(&self) -> i64 {
        self.light_seconds + self.deep_seconds + self.rem_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(specs: &[(i64, ActivityKind)]) -> Vec<ActivitySample> {
        specs
            .iter()
            .map(|&(minute, kind)| ActivitySample::new(minute * 60, kind))
            .collect()
    }

    fn block(from: i64, to: i64, kind: ActivityKind) -> Vec<(i64, ActivityKind)> {
        (from..to).map(|m| (m, kind)).collect()
    }

    #[test]
    fn empty_input() {
        assert!(SleepSessionSegmenter::default()
            .calculate_sleep_sessions(&[])
            .is_empty());
    }

    #[test]
    fn four_minutes_is_too_short() {
        // five samples one minute apart, four intervals
        let samples = run(&block(0, 5, ActivityKind::LightSleep));
        let sessions = SleepSessionSegmenter::default().calculate_sleep_sessions(&samples);
        assert!(sessions.is_empty());
    }

    #[test]
    fn six_minutes_is_one_session() {
        let mut specs = block(0, 4, ActivityKind::LightSleep);
        specs.extend(block(4, 7, ActivityKind::DeepSleep));
        let samples = run(&specs);
        let sessions = SleepSessionSegmenter::default().calculate_sleep_sessions(&samples);
        assert_eq!(sessions.len(), 1);
        let session = sessions[0];
        assert_eq!(session.start, 0);
        assert_eq!(session.end, 6 * 60);
        assert_eq!(session.light_seconds, 3 * 60);
        assert_eq!(session.deep_seconds, 3 * 60);
    }

    #[test]
    fn short_wake_gap_is_absorbed() {
        let mut specs = block(0, 30, ActivityKind::DeepSleep);
        specs.extend(block(30, 120, ActivityKind::Activity));
        specs.extend(block(120, 150, ActivityKind::DeepSleep));
        let samples = run(&specs);
        let sessions = SleepSessionSegmenter::default().calculate_sleep_sessions(&samples);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start, 0);
        assert_eq!(sessions[0].end, 149 * 60);
        assert_eq!(sessions[0].awake_seconds, 90 * 60);
    }

    #[test]
    fn long_wake_gap_splits() {
        let mut specs = block(0, 30, ActivityKind::DeepSleep);
        specs.extend(block(30, 180, ActivityKind::Activity));
        specs.extend(block(180, 210, ActivityKind::DeepSleep));
        let samples = run(&specs);
        let sessions = SleepSessionSegmenter::default().calculate_sleep_sessions(&samples);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].end, 29 * 60);
        assert_eq!(sessions[0].awake_seconds, 0);
        assert_eq!(sessions[1].start, 180 * 60);
        assert_eq!(sessions[1].end, 209 * 60);
    }

    #[test]
    fn wake_gap_of_exactly_two_hours_is_absorbed() {
        let mut specs = block(0, 30, ActivityKind::DeepSleep);
        specs.extend(block(30, 150, ActivityKind::Activity));
        specs.extend(block(150, 180, ActivityKind::DeepSleep));
        let samples = run(&specs);
        let sessions = SleepSessionSegmenter::default().calculate_sleep_sessions(&samples);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].awake_seconds, 120 * 60);

        // one more minute awake is past the limit
        let mut specs = block(0, 30, ActivityKind::DeepSleep);
        specs.extend(block(30, 151, ActivityKind::Activity));
        specs.extend(block(151, 181, ActivityKind::DeepSleep));
        let samples = run(&specs);
        let sessions = SleepSessionSegmenter::default().calculate_sleep_sessions(&samples);
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn long_awake_in_bed_splits() {
        let mut specs = block(0, 30, ActivityKind::DeepSleep);
        specs.extend(block(30, 180, ActivityKind::AwakeSleep));
        specs.extend(block(180, 210, ActivityKind::DeepSleep));
        let samples = run(&specs);
        let sessions = SleepSessionSegmenter::default().calculate_sleep_sessions(&samples);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].start, 0);
        assert_eq!(sessions[0].end, 29 * 60);
        assert_eq!(sessions[0].awake_seconds, 0);
        assert_eq!(sessions[1].start, 180 * 60);
    }

    #[test]
    fn short_awake_in_bed_is_awake_time() {
        let mut specs = block(0, 30, ActivityKind::DeepSleep);
        specs.extend(block(30, 40, ActivityKind::AwakeSleep));
        specs.extend(block(40, 60, ActivityKind::DeepSleep));
        let samples = run(&specs);
        let sessions = SleepSessionSegmenter::default().calculate_sleep_sessions(&samples);
        assert_eq!(sessions.len(), 1);
        let s = sessions[0];
        assert_eq!(s.end, 59 * 60);
        assert_eq!(s.awake_seconds, 10 * 60);
        assert_eq!(s.deep_seconds, 49 * 60);
    }

    #[test]
    fn awake_in_bed_alone_is_not_a_session() {
        let samples = run(&block(0, 60, ActivityKind::AwakeSleep));
        assert!(SleepSessionSegmenter::default()
            .calculate_sleep_sessions(&samples)
            .is_empty());
    }

    #[test]
    fn components_fit_in_session() {
        let mut specs = block(0, 10, ActivityKind::Activity);
        specs.extend(block(10, 40, ActivityKind::LightSleep));
        specs.extend(block(40, 50, ActivityKind::NotWorn));
        specs.extend(block(50, 80, ActivityKind::RemSleep));
        specs.extend(block(80, 90, ActivityKind::DeepSleep));
        let samples = run(&specs);
        let sessions = SleepSessionSegmenter::default().calculate_sleep_sessions(&samples);
        assert_eq!(sessions.len(), 1);
        let s = sessions[0];
        assert!(s.end >= s.start);
        let components = s.light_seconds + s.deep_seconds + s.rem_seconds + s.awake_seconds;
        assert!(components <= s.end - s.start);
        assert_eq!(s.rem_seconds, 30 * 60);
        assert_eq!(s.awake_seconds, 10 * 60);
    }

    #[test]
    fn synthetic_samples_are_ignored() {
        let mut samples = run(&block(0, 10, ActivityKind::LightSleep));
        samples.insert(0, ActivitySample::synthetic(&samples[0], -3600));
        let sessions = SleepSessionSegmenter::default().calculate_sleep_sessions(&samples);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start, 0);
    }

    #[test]
    fn deterministic() {
        let mut specs = block(0, 60, ActivityKind::LightSleep);
        specs.extend(block(60, 70, ActivityKind::Activity));
        specs.extend(block(70, 100, ActivityKind::DeepSleep));
        let samples = run(&specs);
        let segmenter = SleepSessionSegmenter::default();
        assert_eq!(
            segmenter.calculate_sleep_sessions(&samples),
            segmenter.calculate_sleep_sessions(&samples)
        );
    }

    #[test]
    fn totals_over_sessions() {
        let sessions = [
            SleepSession {
                start: 0,
                end: 100,
                light_seconds: 40,
                deep_seconds: 30,
                rem_seconds: 10,
                awake_seconds: 20,
            },
            SleepSession {
                start: 200,
                end: 300,
                light_seconds: 50,
                deep_seconds: 50,
                rem_seconds: 0,
                awake_seconds: 0,
            },
        ];
        let totals = SleepTotals::new(&sessions);
        assert_eq!(totals.light_seconds, 90);
        assert_eq!(totals.asleep_seconds(), 180);
        assert_eq!(totals.awake_seconds, 20);
    }
}
