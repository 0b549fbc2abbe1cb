use crate::{ActivityKind, Timestamp};

/// The line series a sample is drawn into.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Activity,
    DeepSleep,
    LightSleep,
    RemSleep,
    NotWorn,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 5] = [
        Self::Activity,
        Self::DeepSleep,
        Self::LightSleep,
        Self::RemSleep,
        Self::NotWorn,
    ];
}

impl From<ActivityKind> for SeriesKind {
    fn from(kind: ActivityKind) -> Self {
        match kind {
            ActivityKind::DeepSleep => Self::DeepSleep,
            ActivityKind::LightSleep => Self::LightSleep,
            ActivityKind::RemSleep => Self::RemSleep,
            ActivityKind::NotWorn => Self::NotWorn,
            _ => Self::Activity,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: Timestamp,
    pub value: f32,
}

impl SeriesPoint {
    pub fn new(timestamp: Timestamp, value: f32) -> Self {
        Self { timestamp, value }
    }

    pub fn zero(timestamp: Timestamp) -> Self {
        Self::new(timestamp, 0.0)
    }
}
