use strum::{Display, EnumIter, EnumString};

/// Seconds since the unix epoch.
pub type Timestamp = i64;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityKind {
    DeepSleep,
    LightSleep,
    RemSleep,
    AwakeSleep,
    NotWorn,
    Activity,
    Walking,
    Running,
    Exercise,
    #[default]
    Unknown,
}

impl ActivityKind {
    pub fn is_sleep(self) -> bool {
        matches!(
            self,
            Self::DeepSleep | Self::LightSleep | Self::RemSleep | Self::AwakeSleep
        )
    }

    /// Default raw code used when a sample source does not report a finer one.
    pub fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Activity => 1,
            Self::LightSleep => 2,
            Self::DeepSleep => 4,
            Self::NotWorn => 8,
            Self::Running => 16,
            Self::Walking => 32,
            Self::Exercise => 64,
            Self::RemSleep => 128,
            Self::AwakeSleep => 256,
        }
    }
}

/// Inclusive range of heart rate values a device can actually measure.
/// Anything outside (the -1 and 255 sentinels included) means "not measured".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateRange {
    pub min: i32,
    pub max: i32,
}

impl HeartRateRange {
    pub const NOT_MEASURED: i32 = -1;
    pub const NOT_MEASURED_DEVICE: i32 = 255;

    pub fn contains(&self, heart_rate: i32) -> bool {
        heart_rate >= self.min && heart_rate <= self.max
    }
}

impl Default for HeartRateRange {
    fn default() -> Self {
        Self { min: 1, max: 254 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivitySample {
    pub timestamp: Timestamp,
    pub kind: ActivityKind,
    pub raw_kind: i32,
    #[serde(default)]
    pub steps: u32,
    #[serde(default = "not_measured")]
    pub heart_rate: i32,
    #[serde(default)]
    pub intensity: f32,
    #[serde(default)]
    pub is_synthetic: bool,
}

fn not_measured() -> i32 {
    HeartRateRange::NOT_MEASURED
}

impl ActivitySample {
    pub fn new(timestamp: Timestamp, kind: ActivityKind) -> Self {
        Self {
            timestamp,
            kind,
            raw_kind: kind.code(),
            steps: 0,
            heart_rate: HeartRateRange::NOT_MEASURED,
            intensity: 0.0,
            is_synthetic: false,
        }
    }

    /// Boundary filler anchored at `timestamp`, carrying the identity of `reference`.
    pub fn synthetic(reference: &ActivitySample, timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            kind: reference.kind,
            raw_kind: reference.raw_kind,
            steps: 0,
            heart_rate: HeartRateRange::NOT_MEASURED,
            intensity: 0.0,
            is_synthetic: true,
        }
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_heart_rate(mut self, heart_rate: i32) -> Self {
        self.heart_rate = heart_rate;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_raw_kind(mut self, raw_kind: i32) -> Self {
        self.raw_kind = raw_kind;
        self
    }
}
