//! Cross-sensor correlation of peak candidates into classified detections.
//!
//! Top peaks are visited in travel order. A side counts as simultaneous only
//! when exactly one of its still-unclaimed candidates lies inside the open
//! window `(d - w, d + w)` around the top peak. A claimed side candidate is
//! consumed; side candidates left over become side-only detections.

use crate::trace::{ConditionedTraces, Sensor, Side};

use super::config::CorrelationParams;
use super::peaks::Peak;

/// Detection category, decided once by the correlator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Seen by the top sensor alone.
    TopOnly,
    /// Seen by one side sensor alone.
    SideOnly,
    /// Seen by the top sensor and one side sensor within the window.
    Simultaneous,
}

/// Peak candidates per sensor, in index order.
#[derive(Debug, Clone, Default)]
pub struct SensorPeaks {
    pub top: Vec<Peak>,
    pub left: Vec<Peak>,
    pub right: Vec<Peak>,
}

impl SensorPeaks {
    pub fn get(&self, sensor: Sensor) -> &[Peak] {
        match sensor {
            Sensor::Top => &self.top,
            Sensor::Left => &self.left,
            Sensor::Right => &self.right,
        }
    }
}

/// A classified detection on one trace.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Detection {
    /// Trace holding the peak; decay search runs on this trace.
    pub sensor: Sensor,
    /// Peak sample index on `sensor`'s trace.
    pub index: usize,
    pub category: Category,
    pub side: Side,
    pub peak_value: f64,
    pub peak_distance_m: f64,
    /// Simultaneous only: side trace value at `index`, when the side trace
    /// has that index.
    pub side_value: Option<f64>,
    /// Simultaneous only: index of the consumed side candidate.
    pub side_index: Option<usize>,
}

impl Detection {
    fn single(
        traces: &ConditionedTraces,
        sensor: Sensor,
        category: Category,
        peak: &Peak,
    ) -> Self {
        Self {
            sensor,
            index: peak.index,
            category,
            side: sensor.side(),
            peak_value: peak.value,
            peak_distance_m: traces.sample(sensor, peak.index).distance_m,
            side_value: None,
            side_index: None,
        }
    }
}

/// Counts per category after correlation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CorrelationStats {
    pub top_only: usize,
    pub side_only: usize,
    pub simultaneous: usize,
    /// Side windows with more than one unclaimed candidate.
    pub ambiguous_windows: usize,
}

/// Unclaimed candidates of `side` inside the open window around `center_m`.
fn window_hits(
    traces: &ConditionedTraces,
    side: Sensor,
    peaks: &[Peak],
    consumed: &[bool],
    center_m: f64,
    window_m: f64,
) -> Vec<usize> {
    peaks
        .iter()
        .enumerate()
        .filter(|(k, p)| {
            let d = traces.sample(side, p.index).distance_m;
            !consumed[*k] && center_m - window_m < d && d < center_m + window_m
        })
        .map(|(k, _)| k)
        .collect()
}

/// Classify every candidate into exactly one category.
///
/// Output order: top-sensor detections in travel order (a top peak may
/// yield one simultaneous detection per side), then side-only detections
/// of the left and right sensors.
pub fn correlate(
    traces: &ConditionedTraces,
    peaks: &SensorPeaks,
    params: &CorrelationParams,
) -> (Vec<Detection>, CorrelationStats) {
    let mut stats = CorrelationStats::default();
    let mut detections = Vec::new();
    let sides = [Sensor::Left, Sensor::Right];
    let mut consumed = sides.map(|s| vec![false; peaks.get(s).len()]);

    for top in &peaks.top {
        let center_m = traces.sample(Sensor::Top, top.index).distance_m;
        let mut matched = false;

        for (slot, &side) in sides.iter().enumerate() {
            let side_peaks = peaks.get(side);
            let hits = window_hits(
                traces,
                side,
                side_peaks,
                &consumed[slot],
                center_m,
                params.window_m,
            );
            match hits.as_slice() {
                [k] => {
                    consumed[slot][*k] = true;
                    matched = true;
                    stats.simultaneous += 1;
                    detections.push(Detection {
                        sensor: Sensor::Top,
                        index: top.index,
                        category: Category::Simultaneous,
                        side: side.side(),
                        peak_value: top.value,
                        peak_distance_m: center_m,
                        side_value: traces.trace(side).samples.get(top.index).map(|s| s.value),
                        side_index: Some(side_peaks[*k].index),
                    });
                }
                [] => {}
                _ => {
                    stats.ambiguous_windows += 1;
                    tracing::debug!(
                        "top peak at {:.1} m has {} {:?} candidates in window",
                        center_m,
                        hits.len(),
                        side
                    );
                }
            }
        }

        if !matched {
            stats.top_only += 1;
            detections.push(Detection::single(
                traces,
                Sensor::Top,
                Category::TopOnly,
                top,
            ));
        }
    }

    for (slot, &side) in sides.iter().enumerate() {
        for (k, peak) in peaks.get(side).iter().enumerate() {
            if !consumed[slot][k] {
                stats.side_only += 1;
                detections.push(Detection::single(traces, side, Category::SideOnly, peak));
            }
        }
    }

    tracing::info!(
        "correlation: {} top-only, {} simultaneous, {} side-only",
        stats.top_only,
        stats.simultaneous,
        stats.side_only
    );
    (detections, stats)
}
