//! Conditioned per-sensor traces.
//!
//! The three traces share one index space: sample `i` of the top trace and
//! sample `i` of a side trace were recorded at the same travel moment. All
//! cross-sensor lookups go through [`ConditionedTraces::sample`] with an
//! explicit sensor and index.

use crate::geo::GeoPoint;

/// One of the three light sensors of the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensor {
    Top,
    Left,
    Right,
}

impl Sensor {
    pub const ALL: [Sensor; 3] = [Sensor::Top, Sensor::Left, Sensor::Right];

    /// Side of travel this sensor faces.
    pub fn side(self) -> Side {
        match self {
            Sensor::Top => Side::None,
            Sensor::Left => Side::Left,
            Sensor::Right => Side::Right,
        }
    }
}

/// Side of the travel path a fixture was detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Detected overhead by the top sensor only.
    #[default]
    None,
    Left,
    Right,
}

/// Visible channels with the infrared contribution removed, plus infrared.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ChannelReading {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub ir: f64,
}

impl ChannelReading {
    /// Separate infrared from IR-contaminated red/green/blue using the clear
    /// channel: each visible channel is `(own - other two + clear) / 2` and
    /// `ir = (red + green + blue - clear) / 2`.
    pub fn from_contaminated(red: f64, green: f64, blue: f64, clear: f64) -> Self {
        Self {
            red: (red - green - blue + clear) / 2.0,
            green: (green - red - blue + clear) / 2.0,
            blue: (blue - red - green + clear) / 2.0,
            ir: (red + green + blue - clear) / 2.0,
        }
    }
}

/// One conditioned sample.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraceSample {
    /// Index of this sample in the source recording.
    pub source_index: usize,
    /// Travelled distance in metres.
    pub distance_m: f64,
    /// Smoothed (and, for side sensors, background-subtracted) intensity.
    pub value: f64,
    pub channels: ChannelReading,
    /// Raw illuminance (lux).
    pub lux: f64,
    pub position: GeoPoint,
    pub time: String,
}

/// Samples of a single sensor after conditioning.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SensorTrace {
    pub samples: Vec<TraceSample>,
}

impl SensorTrace {
    pub fn new(samples: Vec<TraceSample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn distance_m(&self, index: usize) -> f64 {
        self.samples[index].distance_m
    }

    pub fn value(&self, index: usize) -> f64 {
        self.samples[index].value
    }

    /// Returns `true` when travelled distance never decreases.
    pub fn is_monotonic(&self) -> bool {
        self.samples
            .windows(2)
            .all(|w| w[1].distance_m >= w[0].distance_m)
    }
}

/// The three aligned traces produced by the conditioner.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConditionedTraces {
    pub top: SensorTrace,
    pub left: SensorTrace,
    pub right: SensorTrace,
}

impl ConditionedTraces {
    pub fn trace(&self, sensor: Sensor) -> &SensorTrace {
        match sensor {
            Sensor::Top => &self.top,
            Sensor::Left => &self.left,
            Sensor::Right => &self.right,
        }
    }

    pub fn sample(&self, sensor: Sensor, index: usize) -> &TraceSample {
        &self.trace(sensor).samples[index]
    }

    /// Number of aligned sample indices (the shortest trace bounds the join).
    pub fn len(&self) -> usize {
        self.top.len().min(self.left.len()).min(self.right.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn infrared_removal_recovers_visible_channels() {
        // True visible r=3, g=5, b=2 with ir=1.5 leaking into every channel,
        // clear = r + g + b + ir.
        let (r, g, b, ir) = (3.0, 5.0, 2.0, 1.5);
        let reading = ChannelReading::from_contaminated(r + ir, g + ir, b + ir, r + g + b + ir);
        assert_abs_diff_eq!(reading.red, r, epsilon = 1e-12);
        assert_abs_diff_eq!(reading.green, g, epsilon = 1e-12);
        assert_abs_diff_eq!(reading.blue, b, epsilon = 1e-12);
        assert_abs_diff_eq!(reading.ir, ir, epsilon = 1e-12);
    }

    #[test]
    fn sensor_sides() {
        assert_eq!(Sensor::Top.side(), Side::None);
        assert_eq!(Sensor::Left.side(), Side::Left);
        assert_eq!(Sensor::Right.side(), Side::Right);
    }

    #[test]
    fn side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Right).unwrap(), "\"right\"");
        assert_eq!(serde_json::to_string(&Side::None).unwrap(), "\"none\"");
    }
}
