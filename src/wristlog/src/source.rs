use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use strum::{Display, EnumString};
use thiserror::Error;
use wristlog_types::{ActivitySample, Timestamp};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unable to read samples: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid sample file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no samples recorded for device `{0}`")]
    UnknownDevice(String),
}

/// Ordered samples for one device over an inclusive time range.
pub trait SampleSource {
    fn get_samples(
        &self,
        device_id: &str,
        ts_from: Timestamp,
        ts_to: Timestamp,
    ) -> Result<Vec<ActivitySample>, SourceError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TimestampUnit {
    #[default]
    Seconds,
    Milliseconds,
}

impl TimestampUnit {
    fn to_seconds(self, timestamp: Timestamp) -> Timestamp {
        match self {
            TimestampUnit::Seconds => timestamp,
            TimestampUnit::Milliseconds => timestamp.div_euclid(1000),
        }
    }
}

#[derive(Deserialize)]
struct SampleRecord {
    device: String,
    #[serde(flatten)]
    sample: ActivitySample,
}

/// Samples exported as a JSON array, each record tagged with its device.
#[derive(Clone, Debug, Default)]
pub struct JsonSampleSource {
    devices: BTreeMap<String, Vec<ActivitySample>>,
}

impl JsonSampleSource {
    pub fn open<P>(path: P, unit: TimestampUnit) -> Result<Self, SourceError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let source = Self::from_json(&data, unit)?;
        info!(
            "loaded {} devices from {}",
            source.devices.len(),
            path.display()
        );
        Ok(source)
    }

    pub fn from_json(data: &str, unit: TimestampUnit) -> Result<Self, SourceError> {
        let records: Vec<SampleRecord> = serde_json::from_str(data)?;

        let mut devices: BTreeMap<String, Vec<ActivitySample>> = BTreeMap::new();
        for SampleRecord { device, mut sample } in records {
            sample.timestamp = unit.to_seconds(sample.timestamp);
            devices.entry(device).or_default().push(sample);
        }

        for samples in devices.values_mut() {
            samples.sort_by_key(|s| s.timestamp);
        }

        Ok(Self { devices })
    }

    pub fn device_ids(&self) -> impl Iterator<Item = &str> {
        self.devices.keys().map(String::as_str)
    }

    pub fn all_samples(&self, device_id: &str) -> Result<&[ActivitySample], SourceError> {
        self.devices
            .get(device_id)
            .map(Vec::as_slice)
            .ok_or_else(|| SourceError::UnknownDevice(device_id.to_owned()))
    }
}

impl SampleSource for JsonSampleSource {
    fn get_samples(
        &self,
        device_id: &str,
        ts_from: Timestamp,
        ts_to: Timestamp,
    ) -> Result<Vec<ActivitySample>, SourceError> {
        let samples = self.all_samples(device_id)?;
        let from = samples.partition_point(|s| s.timestamp < ts_from);
        let to = samples.partition_point(|s| s.timestamp <= ts_to);

        let samples = samples[from..to.max(from)].to_vec();
        debug!(
            "{} samples for {} in {}..={}",
            samples.len(),
            device_id,
            ts_from,
            ts_to
        );
        Ok(samples)
    }
}
