//! Signal conditioning: raw recording -> aligned, smoothed traces.
//!
//! Every step that drops samples drops the same index from all three
//! sensors, so the shared index space of [`ConditionedTraces`] survives.

use crate::recording::{RawSample, Recording};
use crate::trace::{ChannelReading, ConditionedTraces, Sensor, SensorTrace, TraceSample};

use super::config::ConditionParams;

/// Normalized 1-D Gaussian kernel with radius `round(truncate * sigma)`.
pub fn gaussian_kernel(sigma: f64, truncate: f64) -> Vec<f64> {
    let radius = (truncate * sigma + 0.5) as usize;
    let sigma2 = sigma * sigma;
    let mut kernel: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-0.5 * x * x / sigma2).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Map an out-of-range index with half-sample symmetric reflection
/// (`d c b a | a b c d | d c b a`).
#[inline]
fn reflect_index(i: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    let mut j = i.rem_euclid(period);
    if j >= n {
        j = period - 1 - j;
    }
    j as usize
}

/// Smooth `signal` with a Gaussian kernel, reflecting at the borders.
pub fn gaussian_smooth(signal: &[f64], sigma: f64, truncate: f64) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let kernel = gaussian_kernel(sigma, truncate);
    let radius = (kernel.len() / 2) as isize;
    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, &w)| w * signal[reflect_index(i as isize + k as isize - radius, n)])
                .sum()
        })
        .collect()
}

/// Centered rolling minimum. Positions where the window does not fit
/// entirely inside the signal are `None`, as is every position for an
/// empty window.
pub fn rolling_min_centered(signal: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = signal.len();
    if window == 0 {
        return vec![None; n];
    }
    let half_left = window / 2;
    let half_right = window - 1 - half_left;
    (0..n)
        .map(|i| {
            if i < half_left || i + half_right >= n {
                return None;
            }
            signal[i - half_left..=i + half_right]
                .iter()
                .copied()
                .reduce(f64::min)
        })
        .collect()
}

/// Indices kept after the start trim and the monotonic-distance guard.
fn select_indices(recording: &Recording, trim_start_m: f64) -> Vec<usize> {
    let mut kept = Vec::with_capacity(recording.len());
    let mut last: Option<[f64; 3]> = None;
    for i in 0..recording.len() {
        let d = Sensor::ALL.map(|s| recording.samples(s)[i].distance_m);
        let mean = (d[0] + d[1] + d[2]) / 3.0;
        if mean.is_nan() || mean <= trim_start_m {
            continue;
        }
        if let Some(prev) = last {
            if d.iter().zip(prev.iter()).any(|(cur, p)| cur < p) {
                tracing::debug!("dropping sample {}: travelled distance went backwards", i);
                continue;
            }
        }
        last = Some(d);
        kept.push(i);
    }
    kept
}

fn build_sample(source_index: usize, raw: &RawSample, value: f64) -> TraceSample {
    TraceSample {
        source_index,
        distance_m: raw.distance_m,
        value,
        channels: ChannelReading::from_contaminated(raw.red, raw.green, raw.blue, raw.clear),
        lux: raw.lux,
        position: crate::geo::GeoPoint::new(raw.lat, raw.lon),
        time: raw.time.clone(),
    }
}

/// Condition a segmented recording into three aligned traces.
pub fn condition_recording(recording: &Recording, params: &ConditionParams) -> ConditionedTraces {
    let kept = select_indices(recording, params.trim_start_m);
    if kept.is_empty() {
        return ConditionedTraces::default();
    }

    let smoothed = Sensor::ALL.map(|sensor| {
        let raw = recording.samples(sensor);
        let clear: Vec<f64> = kept.iter().map(|&i| raw[i].clear).collect();
        gaussian_smooth(&clear, params.smoothing_sigma, params.smoothing_truncate)
    });

    // Side sensors only: smoothed[1] is left, smoothed[2] is right.
    let background =
        [1, 2].map(|idx| rolling_min_centered(&smoothed[idx], params.background_window));

    let mut top = Vec::new();
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (k, &src) in kept.iter().enumerate() {
        let (Some(bg_left), Some(bg_right)) = (background[0][k], background[1][k]) else {
            continue;
        };
        let [raw_top, raw_left, raw_right] = Sensor::ALL.map(|s| &recording.samples(s)[src]);
        top.push(build_sample(src, raw_top, smoothed[0][k]));
        left.push(build_sample(src, raw_left, smoothed[1][k] - bg_left));
        right.push(build_sample(src, raw_right, smoothed[2][k] - bg_right));
    }

    tracing::info!(
        "Conditioned {} of {} samples per sensor",
        top.len(),
        recording.len()
    );

    ConditionedTraces {
        top: SensorTrace::new(top),
        left: SensorTrace::new(left),
        right: SensorTrace::new(right),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::test_utils::raw_sample;

    #[test]
    fn kernel_is_normalized_and_narrow() {
        let k = gaussian_kernel(0.4, 4.0);
        assert_eq!(k.len(), 5);
        assert_abs_diff_eq!(k.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(k[2] > 0.9);
        assert_abs_diff_eq!(k[1], k[3], epsilon = 1e-15);
    }

    #[test]
    fn smoothing_preserves_constant_signal() {
        let out = gaussian_smooth(&[2.5; 9], 0.4, 4.0);
        for v in out {
            assert_abs_diff_eq!(v, 2.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn smoothing_keeps_isolated_peak_on_its_sample() {
        let signal = [0.0, 0.0, 0.1, 1.0, 0.1, 0.0, 0.0];
        let out = gaussian_smooth(&signal, 0.4, 4.0);
        let argmax = out
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(argmax, Some(3));
        assert!(out[3] > 0.9);
    }

    #[test]
    fn reflect_index_mirrors_edges() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(-3, 1), 0);
    }

    #[test]
    fn rolling_min_is_undefined_at_edges() {
        let signal = [5.0, 4.0, 3.0, 6.0, 7.0, 1.0, 8.0, 9.0];
        let out = rolling_min_centered(&signal, 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], Some(3.0));
        assert_eq!(out[4], Some(1.0));
        assert_eq!(out[6], Some(1.0));
        assert_eq!(out[7], None);
    }

    #[test]
    fn rolling_min_with_empty_window_is_undefined() {
        let out = rolling_min_centered(&[1.0, 2.0, 3.0], 0);
        assert_eq!(out, vec![None, None, None]);
    }

    #[test]
    fn conditioning_trims_and_stays_aligned() {
        let n = 40;
        let make = |i: usize| raw_sample(i as f64, 1.0);
        let rec = Recording::new(
            (0..n).map(make).collect(),
            (0..n).map(make).collect(),
            (0..n).map(make).collect(),
        )
        .expect("aligned");
        let params = ConditionParams::default();
        let traces = condition_recording(&rec, &params);

        // Distances 11..=39 survive the trim (29 samples); the 7-sample
        // background window removes three more at each end.
        assert_eq!(traces.top.len(), 23);
        assert_eq!(traces.left.len(), 23);
        assert_eq!(traces.right.len(), 23);
        assert_eq!(traces.top.samples[0].source_index, 14);
        for k in 0..traces.len() {
            let src = traces.top.samples[k].source_index;
            assert_eq!(traces.left.samples[k].source_index, src);
            assert_eq!(traces.right.samples[k].source_index, src);
        }
        // Flat side traces have no residual above background.
        assert!(traces.left.samples.iter().all(|s| s.value.abs() < 1e-12));
    }

    #[test]
    fn conditioned_distance_never_decreases() {
        let distances = [
            11.0, 12.0, 13.0, 12.5, 14.0, 15.0, 16.0, 15.9, 17.0, 18.0, 19.0, 20.0, 21.0, 22.0,
            23.0, 24.0,
        ];
        let make = |d: &f64| raw_sample(*d, 1.0);
        let rec = Recording::new(
            distances.iter().map(make).collect(),
            distances.iter().map(make).collect(),
            distances.iter().map(make).collect(),
        )
        .expect("aligned");
        let traces = condition_recording(&rec, &ConditionParams::default());
        assert!(!traces.is_empty());
        for sensor in Sensor::ALL {
            assert!(traces.trace(sensor).is_monotonic());
        }
    }

    #[test]
    fn empty_recording_conditions_to_empty_traces() {
        let traces = condition_recording(&Recording::default(), &ConditionParams::default());
        assert!(traces.is_empty());
    }
}
