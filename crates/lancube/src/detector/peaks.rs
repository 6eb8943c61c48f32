//! Local-maximum detection on a conditioned trace.
//!
//! A peak is a sample strictly higher than its left neighbour, followed by
//! an optional flat run and then a strictly lower sample; flat tops report
//! their midpoint. The first and last samples never qualify. Filters apply
//! in order: minimum height, minimum separation (higher peaks claim first),
//! minimum prominence, then the optional candidate cap.

use super::config::PeakParams;

/// A local maximum on one trace.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Peak {
    /// Sample index in the trace.
    pub index: usize,
    pub value: f64,
    pub prominence: f64,
}

fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }
    let i_max = x.len() - 1;
    let mut i = 1;
    while i < i_max {
        if x[i - 1] < x[i] {
            let mut i_ahead = i + 1;
            while i_ahead < i_max && x[i_ahead] == x[i] {
                i_ahead += 1;
            }
            if x[i_ahead] < x[i] {
                peaks.push((i + i_ahead - 1) / 2);
                i = i_ahead;
            }
        }
        i += 1;
    }
    peaks
}

fn select_by_distance(x: &[f64], peaks: &[usize], min_distance: usize) -> Vec<usize> {
    let n = peaks.len();
    let mut keep = vec![true; n];
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| x[peaks[a]].total_cmp(&x[peaks[b]]));

    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < min_distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < n && peaks[k] - peaks[j] < min_distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

/// Height of a peak above the higher of its two bases.
///
/// Each base is the lowest sample reached walking away from the peak until a
/// strictly higher sample (or the trace end) is met.
pub fn prominence(x: &[f64], peak: usize) -> f64 {
    let top = x[peak];

    let mut left_min = top;
    for &v in x[..=peak].iter().rev() {
        if v > top {
            break;
        }
        left_min = left_min.min(v);
    }

    let mut right_min = top;
    for &v in &x[peak..] {
        if v > top {
            break;
        }
        right_min = right_min.min(v);
    }

    top - left_min.max(right_min)
}

/// Find peaks in `values` that pass every threshold in `params`.
///
/// Returned peaks are in index order.
pub fn find_peaks(values: &[f64], params: &PeakParams) -> Vec<Peak> {
    let candidates: Vec<usize> = local_maxima(values)
        .into_iter()
        .filter(|&p| values[p] >= params.min_height)
        .collect();

    let candidates = if params.min_distance > 1 {
        select_by_distance(values, &candidates, params.min_distance)
    } else {
        candidates
    };

    let mut peaks: Vec<Peak> = candidates
        .into_iter()
        .map(|index| Peak {
            index,
            value: values[index],
            prominence: prominence(values, index),
        })
        .filter(|p| p.prominence >= params.min_prominence)
        .collect();

    if let Some(max) = params.max_candidates {
        if peaks.len() > max {
            peaks.sort_by(|a, b| b.prominence.total_cmp(&a.prominence));
            peaks.truncate(max);
            peaks.sort_by_key(|p| p.index);
        }
    }
    peaks
}
