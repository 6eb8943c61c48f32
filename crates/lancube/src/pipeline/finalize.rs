//! Finalize passes over the complete record set: height re-estimation,
//! flux threshold, two dedup passes, low-fixture shadowing, sanity guard.

use crate::detector::{
    dedup_fixtures, reestimate_heights, remove_shadowed_low, FixtureRecord, InventoryConfig,
};

use super::result::PipelineStats;

fn drop_low_flux(records: Vec<FixtureRecord>, min_flux: f64) -> (Vec<FixtureRecord>, usize) {
    let before = records.len();
    let kept: Vec<FixtureRecord> = records.into_iter().filter(|r| r.flux > min_flux).collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

fn phase_dedup(
    records: Vec<FixtureRecord>,
    config: &InventoryConfig,
    stats: &mut PipelineStats,
) -> Vec<FixtureRecord> {
    let before = records.len();
    let records = dedup_fixtures(
        records,
        config.prec_localisation_m,
        config.dedup.require_same_side,
    );
    stats.duplicates_dropped = before - records.len();

    let Some(radius) = config.dedup.relaxed_radius_m else {
        return records;
    };
    let before = records.len();
    let records = dedup_fixtures(records, radius, false);
    stats.relaxed_duplicates_dropped = before - records.len();
    records
}

/// Records that satisfy the output invariants: every numeric field finite,
/// `H >= h`, `d >= 0`.
fn is_sane(record: &FixtureRecord) -> bool {
    record.is_finite()
        && record.height_m >= record.instrument_height_m
        && record.horizontal_distance_m >= 0.0
}

fn sanity_guard(records: Vec<FixtureRecord>) -> (Vec<FixtureRecord>, usize) {
    let before = records.len();
    let kept: Vec<FixtureRecord> = records
        .into_iter()
        .filter(|r| {
            let ok = is_sane(r);
            if !ok {
                tracing::warn!(
                    "discarding {:?} record at ({:.6}, {:.6}): H={} d={} flux={}",
                    r.category,
                    r.peak_lat,
                    r.peak_lon,
                    r.height_m,
                    r.horizontal_distance_m,
                    r.flux
                );
            }
            ok
        })
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

pub(super) fn run(
    records: Vec<FixtureRecord>,
    config: &InventoryConfig,
    stats: &mut PipelineStats,
) -> Vec<FixtureRecord> {
    let (records, corrected) =
        reestimate_heights(&records, &config.reestimate, config.flux_calibration);
    stats.heights_reestimated = corrected;

    let (records, dropped) = drop_low_flux(records, config.min_flux);
    stats.low_flux_dropped = dropped;

    let records = phase_dedup(records, config, stats);

    let before = records.len();
    let records = remove_shadowed_low(records, config.prec_localisation_m);
    stats.shadowed_low_dropped = before - records.len();

    let (records, dropped) = sanity_guard(records);
    stats.sanity_dropped = dropped;

    tracing::info!(
        "{} fixtures after finalize (low flux {}, duplicates {}+{}, shadowed {})",
        records.len(),
        stats.low_flux_dropped,
        stats.duplicates_dropped,
        stats.relaxed_duplicates_dropped,
        stats.shadowed_low_dropped
    );
    records
}
