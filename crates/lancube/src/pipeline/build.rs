//! Detections -> fixture records: decay search, inversion, spectral
//! classification and projection.

use crate::catalog::SpectralCatalog;
use crate::detector::{
    classify, invert, locate_decay, luminous_flux, project, side_bearing, side_ratio,
    travel_bearing, Category, ColourRatios, Detection, FixtureRecord, InventoryConfig,
    InversionInput,
};
use crate::trace::ConditionedTraces;

pub(super) struct BuildOutput {
    pub records: Vec<FixtureRecord>,
    pub no_decay_point: usize,
    pub degenerate: usize,
}

fn build_one(
    traces: &ConditionedTraces,
    det: &Detection,
    catalog: &SpectralCatalog,
    config: &InventoryConfig,
) -> Option<FixtureRecord> {
    let h = config.instrument_height_m;
    let trace = traces.trace(det.sensor);
    let decay = locate_decay(trace, det.index, &config.decay)?;
    let peak = &trace.samples[det.index];
    let decay_sample = &trace.samples[decay.index];
    let decay_distance_m = (peak.distance_m - decay.distance_m).abs();

    let geometry = invert(
        &InversionInput {
            category: det.category,
            peak_value: det.peak_value,
            decay_value: decay.value,
            decay_distance_m,
            side_value: det.side_value,
            lux: peak.lux,
        },
        h,
    );

    let ratios = ColourRatios::from_channels(&peak.channels, &config.spectral);
    let entry = classify(&ratios, catalog, &config.spectral);
    let flux = luminous_flux(
        config.flux_calibration,
        geometry.e_perp,
        geometry.horizontal_distance_m,
        geometry.height_m,
        h,
        entry.ulor,
    );

    let bearing = travel_bearing(peak.position, decay_sample.position, decay.direction)
        .map(|b| side_bearing(b, det.side));
    let position = project(peak.position, bearing, geometry.horizontal_distance_m);

    Some(FixtureRecord {
        lat: position.lat,
        lon: position.lon,
        height_m: geometry.height_m,
        tech: entry.tech.clone(),
        lux: peak.lux,
        flux,
        side: det.side,
        red_green: ratios.red_green,
        blue_green: ratios.blue_green,
        horizontal_distance_m: geometry.horizontal_distance_m,
        decay_distance_m,
        peak_lat: peak.position.lat,
        peak_lon: peak.position.lon,
        e_perp: geometry.e_perp,
        time: peak.time.clone(),
        direction: decay.direction,
        instrument_height_m: h,
        category: det.category,
        ulor: entry.ulor,
        side_ratio: (det.category == Category::Simultaneous)
            .then(|| side_ratio(det.peak_value, det.side_value)),
        bearing: bearing.map(|b| [b.x, b.y]),
    })
}

pub(super) fn run(
    traces: &ConditionedTraces,
    detections: &[Detection],
    catalog: &SpectralCatalog,
    config: &InventoryConfig,
) -> BuildOutput {
    let mut out = BuildOutput {
        records: Vec::with_capacity(detections.len()),
        no_decay_point: 0,
        degenerate: 0,
    };

    for det in detections {
        let Some(record) = build_one(traces, det, catalog, config) else {
            out.no_decay_point += 1;
            tracing::debug!(
                "{:?} peak at {:.1} m has no decay point",
                det.sensor,
                det.peak_distance_m
            );
            continue;
        };
        if !record.geometry_is_finite() {
            out.degenerate += 1;
            tracing::debug!(
                "degenerate {:?} inversion at {:.1} m",
                det.category,
                det.peak_distance_m
            );
        }
        out.records.push(record);
    }

    tracing::info!(
        "{} fixtures built ({} detections without decay point)",
        out.records.len(),
        out.no_decay_point
    );
    out
}
