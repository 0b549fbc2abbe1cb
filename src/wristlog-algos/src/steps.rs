use wristlog_types::{
    ActivityKind, ActivitySample, HeartRateRange, SessionType, StepSession, StepSessionSummary,
    Timestamp,
};

use crate::{ConfigError, SegmentationConfig};

#[derive(Clone, Copy, Debug)]
pub struct StepSessionSegmenter {
    min_session_length: i64,
    max_idle_phase_length: i64,
    min_steps_per_minute_sample: u32,
    min_session_intensity: f32,
    min_steps_per_minute_for_run: u32,
    step_length_meters: f64,
    heart_rate_range: HeartRateRange,
}

#[derive(Clone, Copy, Debug, Default)]
struct HeartRateSum {
    sum: i64,
    count: i64,
}

impl HeartRateSum {
    fn add(&mut self, heart_rate: Option<i32>) {
        if let Some(heart_rate) = heart_rate {
            self.sum += i64::from(heart_rate);
            self.count += 1;
        }
    }

    fn merge(&mut self, other: HeartRateSum) {
        self.sum += other.sum;
        self.count += other.count;
    }

    fn average(&self) -> i32 {
        if self.count == 0 {
            0
        } else {
            (self.sum / self.count) as i32
        }
    }
}

/// Steps, intensity and heart rate seen while the wearer rests. Only kept if
/// activity resumes before the idle phase gets too long.
#[derive(Clone, Copy, Debug, Default)]
struct IdleBuffer {
    steps: u64,
    intensity: f32,
    heart_rate: HeartRateSum,
    seconds: i64,
}

#[derive(Clone, Copy, Debug)]
struct OpenStepSession {
    start: Timestamp,
    last: Timestamp,
    active_steps: u64,
    active_intensity: f32,
    heart_rate: HeartRateSum,
    idle: IdleBuffer,
}

impl OpenStepSession {
    fn new(sample: &ActivitySample, heart_rate: Option<i32>) -> Self {
        let mut session = Self {
            start: sample.timestamp,
            last: sample.timestamp,
            active_steps: u64::from(sample.steps),
            active_intensity: sample.intensity,
            heart_rate: HeartRateSum::default(),
            idle: IdleBuffer::default(),
        };
        session.heart_rate.add(heart_rate);
        session
    }

    fn absorb(&mut self, sample: &ActivitySample, heart_rate: Option<i32>) {
        let idle = std::mem::take(&mut self.idle);
        self.active_steps += u64::from(sample.steps) + idle.steps;
        self.active_intensity += sample.intensity + idle.intensity;
        self.heart_rate.add(heart_rate);
        self.heart_rate.merge(idle.heart_rate);
    }

    fn buffer(&mut self, sample: &ActivitySample, heart_rate: Option<i32>, elapsed: i64) {
        self.idle.steps += u64::from(sample.steps);
        self.idle.intensity += sample.intensity;
        self.idle.heart_rate.add(heart_rate);
        self.idle.seconds += elapsed;
    }

    /// The last moment the wearer was active.
    fn active_until(&self) -> Timestamp {
        self.last - self.idle.seconds
    }
}

impl Default for StepSessionSegmenter {
    fn default() -> Self {
        Self::from_config(&SegmentationConfig::default())
    }
}

impl StepSessionSegmenter {
    pub const MIN_STEPS_FOR_WALK: u64 = 200;
    pub const MIN_HEART_RATE_FOR_EXERCISE: i32 = 90;
    pub const MIN_INTENSITY_FOR_EXERCISE: f32 = 30.0;

    pub fn new(config: &SegmentationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: &SegmentationConfig) -> Self {
        Self {
            min_session_length: config.min_step_session_length.num_seconds(),
            max_idle_phase_length: config.max_idle_phase_length.num_seconds(),
            min_steps_per_minute_sample: config.min_steps_per_minute_sample,
            min_session_intensity: config.min_session_intensity,
            min_steps_per_minute_for_run: config.min_steps_per_minute_for_run,
            step_length_meters: config.step_length_meters(),
            heart_rate_range: config.heart_rate_range,
        }
    }

    pub fn calculate_step_sessions(&self, samples: &[ActivitySample]) -> Vec<StepSession> {
        let mut sessions = Vec::new();
        let mut open: Option<OpenStepSession> = None;

        let eligible = samples
            .iter()
            .filter(|s| !s.kind.is_sleep() && !s.is_synthetic);

        for sample in eligible {
            let heart_rate = self
                .heart_rate_range
                .contains(sample.heart_rate)
                .then_some(sample.heart_rate);

            let Some(mut session) = open.take() else {
                open = Some(OpenStepSession::new(sample, heart_rate));
                continue;
            };

            let elapsed = sample.timestamp - session.last;
            session.last = sample.timestamp;

            if self.is_active(sample) {
                session.absorb(sample, heart_rate);
            } else {
                session.buffer(sample, heart_rate, elapsed);
            }

            if session.idle.seconds >= self.max_idle_phase_length {
                let end = session.active_until();
                sessions.extend(self.finish(session, end, SessionType::Complete));
            } else {
                open = Some(session);
            }
        }

        if let Some(session) = open {
            sessions.extend(self.finish(session, session.last, SessionType::Ongoing));
        }

        debug!(
            "detected {} step sessions from {} samples",
            sessions.len(),
            samples.len()
        );
        sessions
    }

    /// A sample counts as active with enough steps on its own, or with some
    /// steps and enough movement.
    fn is_active(&self, sample: &ActivitySample) -> bool {
        sample.steps > self.min_steps_per_minute_sample
            || (sample.intensity > self.min_session_intensity && sample.steps > 0)
    }

    fn finish(
        &self,
        session: OpenStepSession,
        end: Timestamp,
        session_type: SessionType,
    ) -> Option<StepSession> {
        let length = session.active_until() - session.start;
        if length < self.min_session_length {
            return None;
        }

        let heart_rate_average = session.heart_rate.average();
        Some(StepSession {
            start: session.start,
            end,
            active_steps: session.active_steps,
            heart_rate_average,
            intensity_total: session.active_intensity,
            distance_meters: session.active_steps as f64 * self.step_length_meters,
            activity_kind: self.classify(
                length,
                session.active_steps,
                heart_rate_average,
                session.active_intensity,
            ),
            session_type,
        })
    }

    /// Running is checked first: a run also has a high step count, so the
    /// rate has to win over the absolute count.
    pub fn classify(
        &self,
        session_length: i64,
        active_steps: u64,
        heart_rate_average: i32,
        intensity: f32,
    ) -> ActivityKind {
        let minutes = session_length / 60;
        let steps_per_minute = if minutes > 0 {
            active_steps / minutes as u64
        } else {
            0
        };

        if steps_per_minute > u64::from(self.min_steps_per_minute_for_run) {
            ActivityKind::Running
        } else if active_steps > Self::MIN_STEPS_FOR_WALK {
            ActivityKind::Walking
        } else if heart_rate_average > Self::MIN_HEART_RATE_FOR_EXERCISE
            && intensity > Self::MIN_INTENSITY_FOR_EXERCISE
        {
            ActivityKind::Exercise
        } else {
            ActivityKind::Activity
        }
    }

    pub fn calculate_summary(sessions: &[StepSession], total_day_steps: u64) -> StepSessionSummary {
        let mut summary = StepSessionSummary {
            session_count: sessions.len(),
            total_day_steps,
            is_empty: sessions.is_empty(),
            ..Default::default()
        };

        let mut heart_rate = HeartRateSum::default();
        for session in sessions {
            summary.total_duration_seconds += session.end - session.start;
            summary.active_steps += session.active_steps;
            summary.distance_meters += session.distance_meters;
            summary.intensity_total += session.intensity_total;
            heart_rate.add(Some(session.heart_rate_average));
        }
        summary.heart_rate_average = heart_rate.average();

        summary
    }

    pub fn ongoing_session(sessions: &[StepSession]) -> Option<&StepSession> {
        sessions.iter().find(|s| s.is_ongoing())
    }
}
