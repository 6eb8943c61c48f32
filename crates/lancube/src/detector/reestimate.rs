//! Correction of implausible fixture heights from spatial neighbours.
//!
//! A suspect record gets the median height of its nearest trusted
//! neighbours (or a fixed fallback). Records with usable geometry are
//! rescaled by `ratio = (H_new - h) / (H_old - h)`: flux by `ratio²`,
//! horizontal distance and fixture offset by `ratio`. Records whose
//! geometry is degenerate are re-anchored at the new height instead.

use super::config::ReestimateParams;
use super::correlate::Category;
use super::fixture::FixtureRecord;
use super::invert::{luminous_flux, perpendicular_illuminance};
use super::project::project;

/// Implausible height or flux, or a degenerate inversion on a record whose
/// height was actually solved for.
pub fn is_suspect(record: &FixtureRecord, params: &ReestimateParams) -> bool {
    if !record.geometry_is_finite() {
        return record.category != Category::SideOnly;
    }
    (record.flux > params.max_flux || record.height_m > params.max_height_m)
        && record.height_m > params.min_suspect_height_m
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        0.5 * (values[mid - 1] + values[mid])
    } else {
        values[mid]
    }
}

/// Median height of up to `params.neighbors` trusted records nearest to
/// `records[target]`, measured between peak positions. NaN when none
/// qualify.
pub fn propose_height(
    records: &[FixtureRecord],
    suspect: &[bool],
    target: usize,
    params: &ReestimateParams,
) -> f64 {
    let origin = records[target].peak_position();
    let mut nearby: Vec<(f64, f64)> = records
        .iter()
        .zip(suspect)
        .enumerate()
        .filter(|(i, (r, &s))| {
            *i != target && !s && r.height_m.is_finite() && r.rise_m() > 0.0
        })
        .map(|(_, (r, _))| (origin.distance_m(r.peak_position()), r.height_m))
        .filter(|(dist, _)| {
            dist.is_finite() && params.max_neighbor_distance_m.map_or(true, |max| *dist <= max)
        })
        .collect();
    nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
    nearby.truncate(params.neighbors);
    let mut heights: Vec<f64> = nearby.into_iter().map(|(_, h)| h).collect();
    median(&mut heights)
}

/// Proportional rescale to `new_height`. Returns `false` (leaving the record
/// untouched) when the old geometry cannot anchor a ratio.
fn rescale(record: &mut FixtureRecord, new_height: f64) -> bool {
    let old_rise = record.rise_m();
    if !record.geometry_is_finite() || old_rise <= 0.0 {
        return false;
    }
    let ratio = (new_height - record.instrument_height_m) / old_rise;
    let peak = record.peak_position();
    let offset = peak.offset_to(record.position());

    record.height_m = new_height;
    record.flux *= ratio * ratio;
    record.horizontal_distance_m *= ratio;
    record.set_position(peak.offset_by(offset * ratio));
    true
}

/// Rebuild distance, illuminance, flux and position from `new_height`.
fn reanchor(record: &mut FixtureRecord, new_height: f64, flux_calibration: f64) {
    let h = record.instrument_height_m;
    let rise = new_height - h;
    let d = match (record.category, record.side_ratio) {
        (Category::Simultaneous, Some(k)) if k.is_finite() && k > 0.0 => rise / k,
        _ => 0.0,
    };
    let e_perp = perpendicular_illuminance(record.category, record.lux, new_height, h);

    record.height_m = new_height;
    record.horizontal_distance_m = d;
    record.e_perp = e_perp;
    record.flux = luminous_flux(flux_calibration, e_perp, d, new_height, h, record.ulor);
    record.set_position(project(record.peak_position(), record.bearing_vector(), d));
}

/// Replace implausible heights. Returns the corrected records and the number
/// of records whose height changed.
pub fn reestimate_heights(
    records: &[FixtureRecord],
    params: &ReestimateParams,
    flux_calibration: f64,
) -> (Vec<FixtureRecord>, usize) {
    let suspect: Vec<bool> = records.iter().map(|r| is_suspect(r, params)).collect();
    let mut out = records.to_vec();
    let mut corrected = 0usize;

    for (i, record) in out.iter_mut().enumerate() {
        if !suspect[i] {
            continue;
        }
        let proposal = propose_height(records, &suspect, i, params);
        let new_height = if proposal.is_finite() {
            proposal
        } else {
            params.fallback_height_m
        };
        tracing::debug!(
            "re-estimating height at ({:.6}, {:.6}): {:.2} m -> {:.2} m",
            record.peak_lat,
            record.peak_lon,
            record.height_m,
            new_height
        );
        if !rescale(record, new_height) {
            reanchor(record, new_height, flux_calibration);
        }
        corrected += 1;
    }

    if corrected > 0 {
        tracing::info!("re-estimated {} implausible heights", corrected);
    }
    (out, corrected)
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::test_utils::fixture_at;

    fn params() -> ReestimateParams {
        ReestimateParams::default()
    }

    #[test]
    fn suspect_predicate() {
        let p = params();
        let mut r = fixture_at(45.0, -72.0, 8.0, 5_000.0);
        assert!(!is_suspect(&r, &p));
        r.height_m = 25.0;
        assert!(is_suspect(&r, &p));
        r.height_m = 3.5;
        r.flux = 50_000.0;
        assert!(!is_suspect(&r, &p), "low fixtures are never suspect");
        r.height_m = f64::NAN;
        assert!(is_suspect(&r, &p));
    }

    #[test]
    fn rescale_is_proportional() {
        let mut suspect = fixture_at(45.0, -72.0, 30.0, 40_000.0);
        suspect.category = Category::Simultaneous;
        suspect.side = crate::trace::Side::Right;
        suspect.horizontal_distance_m = 6.0;
        let peak = suspect.peak_position();
        suspect.set_position(peak.offset_by(nalgebra::Vector2::new(6.0, 0.0)));

        let neighbours = [
            fixture_at(45.00005, -72.0, 9.0, 4_000.0),
            fixture_at(45.00010, -72.0, 10.0, 4_000.0),
            fixture_at(45.00015, -72.0, 12.0, 4_000.0),
        ];
        let mut records = vec![suspect.clone()];
        records.extend(neighbours);

        let (out, corrected) = reestimate_heights(&records, &params(), 1.0);
        assert_eq!(corrected, 1);
        let fixed = &out[0];
        assert_abs_diff_eq!(fixed.height_m, 10.0, epsilon = 1e-12);

        let ratio = (10.0 - 2.0) / (30.0 - 2.0);
        assert_relative_eq!(fixed.flux / suspect.flux, ratio * ratio, max_relative = 1e-12);
        assert_relative_eq!(
            fixed.horizontal_distance_m,
            6.0 * ratio,
            max_relative = 1e-12
        );
        let offset = peak.offset_to(fixed.position());
        assert_abs_diff_eq!(offset.x, 6.0 * ratio, epsilon = 1e-6);
        // Trusted records are untouched.
        assert_eq!(&out[1..], &records[1..]);
    }

    #[test]
    fn no_neighbours_uses_fallback() {
        let records = vec![fixture_at(45.0, -72.0, 40.0, 90_000.0)];
        let (out, corrected) = reestimate_heights(&records, &params(), 1.0);
        assert_eq!(corrected, 1);
        assert_abs_diff_eq!(out[0].height_m, 10.0);
    }

    #[test]
    fn degenerate_top_only_is_reanchored() {
        let mut r = fixture_at(45.0, -72.0, f64::NAN, f64::NAN);
        r.lux = 4.0;
        r.ulor = 0.0;
        let (out, _) = reestimate_heights(&[r], &params(), 1.0);
        let fixed = &out[0];
        assert!(fixed.is_finite());
        assert_abs_diff_eq!(fixed.height_m, 10.0);
        assert_abs_diff_eq!(fixed.horizontal_distance_m, 0.0);
        assert_relative_eq!(
            fixed.flux,
            2.0 * std::f64::consts::PI * 4.0 * 64.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn median_of_even_count_averages_middle() {
        assert_abs_diff_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(median(&mut []).is_nan());
    }
}
