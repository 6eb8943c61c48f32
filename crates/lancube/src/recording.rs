//! Segmented recording input.
//!
//! Recording JSON follows a versioned schema (`lancube.recording.v1`): three
//! per-sensor arrays produced by the upstream cleaning/segmentation step,
//! index-aligned so that entry `i` of every array is the same travel moment.
//! Channel counts are already normalized for gain and acquisition time.

use std::path::Path;

use crate::error::{read_to_string, Error, Result};
use crate::trace::Sensor;

pub const RECORDING_SCHEMA_V1: &str = "lancube.recording.v1";

/// One raw sample of one sensor, before conditioning.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSample {
    pub distance_m: f64,
    /// IR-contaminated red channel.
    pub red: f64,
    /// IR-contaminated green channel.
    pub green: f64,
    /// IR-contaminated blue channel.
    pub blue: f64,
    /// Clear (unfiltered) channel.
    pub clear: f64,
    /// Raw illuminance in lux.
    pub lux: f64,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub time: String,
}

/// A complete segmented recording. The three arrays always have the same
/// length; [`Recording::new`] is the only way to build a non-empty one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    top: Vec<RawSample>,
    left: Vec<RawSample>,
    right: Vec<RawSample>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordingSpecV1 {
    schema: String,
    top: Vec<RawSample>,
    left: Vec<RawSample>,
    right: Vec<RawSample>,
}

impl Recording {
    /// Build a recording from three aligned sample arrays.
    pub fn new(
        top: Vec<RawSample>,
        left: Vec<RawSample>,
        right: Vec<RawSample>,
    ) -> Result<Self> {
        if top.len() != left.len() || top.len() != right.len() {
            return Err(Error::MisalignedTraces {
                top: top.len(),
                left: left.len(),
                right: right.len(),
            });
        }
        Ok(Self { top, left, right })
    }

    /// Load a recording from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let spec: RecordingSpecV1 = serde_json::from_str(data)?;
        if spec.schema != RECORDING_SCHEMA_V1 {
            return Err(Error::UnsupportedSchema {
                found: spec.schema,
                expected: RECORDING_SCHEMA_V1,
            });
        }
        Self::new(spec.top, spec.left, spec.right)
    }

    /// Serialize with the current schema tag.
    pub fn to_json_string(&self) -> Result<String> {
        let spec = RecordingSpecV1 {
            schema: RECORDING_SCHEMA_V1.to_string(),
            top: self.top.clone(),
            left: self.left.clone(),
            right: self.right.clone(),
        };
        Ok(serde_json::to_string_pretty(&spec)?)
    }

    pub fn samples(&self, sensor: Sensor) -> &[RawSample] {
        match sensor {
            Sensor::Top => &self.top,
            Sensor::Left => &self.left,
            Sensor::Right => &self.right,
        }
    }

    /// Number of samples shared by all three sensors.
    pub fn len(&self) -> usize {
        self.top.len().min(self.left.len()).min(self.right.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
