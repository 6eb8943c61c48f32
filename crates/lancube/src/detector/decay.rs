//! Decay-point search along a detection's own trace.

use crate::trace::SensorTrace;

use super::config::DecayParams;

/// Which side of the peak the decay point was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    /// Found ahead of the peak in travel order (`+1`).
    Ahead,
    /// Found behind the peak (`-1`).
    Behind,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Ahead => 1.0,
            Direction::Behind => -1.0,
        }
    }
}

impl From<Direction> for i8 {
    fn from(d: Direction) -> i8 {
        match d {
            Direction::Ahead => 1,
            Direction::Behind => -1,
        }
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Direction::Ahead),
            -1 => Ok(Direction::Behind),
            other => Err(format!("direction must be +1 or -1, got {other}")),
        }
    }
}

/// Decay point paired with one detection.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecayPoint {
    /// Sample index on the detection's trace.
    pub index: usize,
    pub value: f64,
    pub distance_m: f64,
    pub direction: Direction,
}

/// Find the decay point of the peak at `peak_index` on `trace`.
///
/// Ahead of the peak the first qualifying sample wins; the search behind the
/// peak runs only when nothing qualifies ahead and takes the last qualifying
/// sample (the one nearest the peak). Qualifying means inside the open
/// distance window `(min_offset_m, max_offset_m)` from the peak with
/// `|value|` in the closed band `[band_low * |v|, band_high * |v|]`.
pub fn locate_decay(
    trace: &SensorTrace,
    peak_index: usize,
    params: &DecayParams,
) -> Option<DecayPoint> {
    let peak = trace.samples.get(peak_index)?;
    let magnitude = peak.value.abs();
    let low = params.band_low * magnitude;
    let high = params.band_high * magnitude;
    let in_band = |v: f64| (low..=high).contains(&v.abs());

    // Distance never decreases along a conditioned trace, so each window is
    // a contiguous slice.
    let samples = &trace.samples;
    let window = |start: usize, end: usize| start.min(end)..end;

    let mut ahead = window(
        samples.partition_point(|s| s.distance_m - peak.distance_m <= params.min_offset_m),
        samples.partition_point(|s| s.distance_m - peak.distance_m < params.max_offset_m),
    );
    if let Some(index) = ahead.find(|&i| in_band(samples[i].value)) {
        let s = &samples[index];
        return Some(DecayPoint {
            index,
            value: s.value,
            distance_m: s.distance_m,
            direction: Direction::Ahead,
        });
    }

    let behind = window(
        samples.partition_point(|s| peak.distance_m - s.distance_m >= params.max_offset_m),
        samples.partition_point(|s| peak.distance_m - s.distance_m > params.min_offset_m),
    );
    behind
        .rev()
        .find(|&i| in_band(samples[i].value))
        .map(|index| DecayPoint {
            index,
            value: samples[index].value,
            distance_m: samples[index].distance_m,
            direction: Direction::Behind,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::trace_with_values;

    #[test]
    fn prefers_first_point_ahead() {
        // 2 m spacing; peak at index 5 (10 m).
        let values = [0.0, 0.1, 0.3, 0.5, 0.8, 1.0, 0.95, 0.6, 0.4, 0.2, 0.0];
        let trace = trace_with_values(&values);
        let p = locate_decay(&trace, 5, &DecayParams::default()).expect("decay point");
        // Index 6 is only 2 m ahead (excluded) and 0.95 is out of band anyway.
        assert_eq!(p.index, 7);
        assert_eq!(p.direction, Direction::Ahead);
    }

    #[test]
    fn falls_back_to_nearest_point_behind() {
        let values = [0.0, 0.3, 0.5, 0.7, 0.95, 1.0, 0.95, 0.05, 0.0, 0.0];
        let trace = trace_with_values(&values);
        let p = locate_decay(&trace, 5, &DecayParams::default()).expect("decay point");
        assert_eq!(p.index, 3);
        assert_eq!(p.direction, Direction::Behind);
    }

    #[test]
    fn search_stays_inside_distance_window() {
        // Peak at index 10 (20 m); in-band samples at offsets +2, +20, +22
        // and -20 m all fall outside the open window.
        let mut values = vec![0.0; 40];
        values[10] = 1.0;
        values[11] = 0.5;
        values[20] = 0.5;
        values[21] = 0.5;
        values[0] = 0.5;
        let trace = trace_with_values(&values);
        assert_eq!(locate_decay(&trace, 10, &DecayParams::default()), None);

        values[19] = 0.5;
        let trace = trace_with_values(&values);
        let p = locate_decay(&trace, 10, &DecayParams::default()).expect("decay point");
        assert_eq!(p.index, 19);
        assert_eq!(p.direction, Direction::Ahead);
    }

    #[test]
    fn band_is_closed() {
        let values = [0.0, 0.0, 1.0, 0.0, 0.9, 0.0];
        let trace = trace_with_values(&values);
        let p = locate_decay(&trace, 2, &DecayParams::default()).expect("decay point");
        assert_eq!(p.index, 4);
    }

    #[test]
    fn no_qualifying_point_drops_detection() {
        let values = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let trace = trace_with_values(&values);
        assert!(locate_decay(&trace, 3, &DecayParams::default()).is_none());
    }

    #[test]
    fn search_is_deterministic() {
        let values = [0.0, 0.2, 0.6, 1.0, 0.7, 0.4, 0.1];
        let trace = trace_with_values(&values);
        let a = locate_decay(&trace, 3, &DecayParams::default());
        let b = locate_decay(&trace, 3, &DecayParams::default());
        assert_eq!(a, b);
    }

    #[test]
    fn direction_serializes_as_sign() {
        assert_eq!(serde_json::to_string(&Direction::Ahead).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Direction::Behind).unwrap(), "-1");
        assert!(serde_json::from_str::<Direction>("0").is_err());
    }
}
