//! Shared test utilities: synthetic traces, recordings, catalog and records.
//!
//! Synthetic travel heads due north from (45.0, -72.0) with one sample every
//! [`SPACING_M`] metres.

use crate::catalog::{CatalogEntry, SpectralCatalog};
use crate::detector::{Category, Direction, FixtureRecord};
use crate::geo::{GeoPoint, EARTH_RADIUS_M};
use crate::recording::{RawSample, Recording};
use crate::trace::{ChannelReading, ConditionedTraces, Sensor, SensorTrace, Side, TraceSample};

pub(crate) const SPACING_M: f64 = 2.0;

/// Plateau-shaped bump by sample offset from the centre. Flat enough that the
/// first in-band decay sample ahead is four samples (8 m) out, at 40 % of the
/// peak, which pins the decay distance for closed-form height checks.
pub(crate) const BUMP_PROFILE: [f64; 6] = [1.0, 0.98, 0.96, 0.95, 0.40, 0.10];

const ORIGIN_LAT: f64 = 45.0;
const ORIGIN_LON: f64 = -72.0;

/// HPS-like visible/IR mix, matching the first entry of [`test_catalog`].
const HPS_CHANNELS: ChannelReading = ChannelReading {
    red: 2.4,
    green: 1.0,
    blue: 0.25,
    ir: 0.9,
};

fn position_at(distance_m: f64) -> GeoPoint {
    GeoPoint::new(ORIGIN_LAT + distance_m / EARTH_RADIUS_M.to_radians(), ORIGIN_LON)
}

/// A bump centred at a sample index on one sensor.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bump {
    pub sensor: Sensor,
    pub center: usize,
    pub amplitude: f64,
}

impl Bump {
    pub fn top(center: usize, amplitude: f64) -> Self {
        Self {
            sensor: Sensor::Top,
            center,
            amplitude,
        }
    }

    pub fn left(center: usize, amplitude: f64) -> Self {
        Self {
            sensor: Sensor::Left,
            ..Self::top(center, amplitude)
        }
    }

    pub fn right(center: usize, amplitude: f64) -> Self {
        Self {
            sensor: Sensor::Right,
            ..Self::top(center, amplitude)
        }
    }
}

/// `n` samples of a Gaussian of width `sigma_m` centred on sample `center`.
pub(crate) fn gaussian_values(n: usize, center: usize, amplitude: f64, sigma_m: f64) -> Vec<f64> {
    (0..n)
        .map(|k| {
            let x = (k as f64 - center as f64) * SPACING_M / sigma_m;
            amplitude * (-0.5 * x * x).exp()
        })
        .collect()
}

/// Values of `n` samples for `sensor` with every matching bump added.
pub(crate) fn bump_values(n: usize, sensor: Sensor, bumps: &[Bump]) -> Vec<f64> {
    let mut values = vec![0.0; n];
    let reach = BUMP_PROFILE.len() as isize - 1;
    for bump in bumps.iter().filter(|b| b.sensor == sensor) {
        for offset in -reach..=reach {
            let i = bump.center as isize + offset;
            if (0..n as isize).contains(&i) {
                values[i as usize] += bump.amplitude * BUMP_PROFILE[offset.unsigned_abs()];
            }
        }
    }
    values
}

fn trace_sample(k: usize, value: f64) -> TraceSample {
    let distance_m = k as f64 * SPACING_M;
    TraceSample {
        source_index: k,
        distance_m,
        value,
        channels: HPS_CHANNELS,
        lux: value * 10.0,
        position: position_at(distance_m),
        time: format!("21:{:02}:{:02}", k / 60 % 60, k % 60),
    }
}

/// Single conditioned trace with the given values, 2 m apart.
pub(crate) fn trace_with_values(values: &[f64]) -> SensorTrace {
    SensorTrace::new(
        values
            .iter()
            .enumerate()
            .map(|(k, &v)| trace_sample(k, v))
            .collect(),
    )
}

/// Three aligned traces of `n` samples with the given bumps.
pub(crate) fn bump_traces(n: usize, bumps: &[Bump]) -> ConditionedTraces {
    let [top, left, right] =
        Sensor::ALL.map(|s| trace_with_values(&bump_values(n, s, bumps)));
    ConditionedTraces { top, left, right }
}

/// Three aligned all-zero traces.
pub(crate) fn flat_traces(n: usize) -> ConditionedTraces {
    bump_traces(n, &[])
}

/// Raw sample with an HPS-like colour mix whose clear channel is `clear`.
pub(crate) fn raw_sample(distance_m: f64, clear: f64) -> RawSample {
    let c = &HPS_CHANNELS;
    let total = c.red + c.green + c.blue + c.ir;
    let scale = clear / total;
    let ir = c.ir * scale;
    let p = position_at(distance_m);
    RawSample {
        distance_m,
        red: c.red * scale + ir,
        green: c.green * scale + ir,
        blue: c.blue * scale + ir,
        clear,
        lux: clear * 10.0,
        lat: p.lat,
        lon: p.lon,
        time: String::new(),
    }
}

/// Raw recording of `n` samples, 2 m apart, with a small constant clear
/// floor plus the given bumps.
pub(crate) fn bump_recording(n: usize, bumps: &[Bump]) -> Recording {
    let [top, left, right] = Sensor::ALL.map(|s| {
        bump_values(n, s, bumps)
            .into_iter()
            .enumerate()
            .map(|(k, v)| raw_sample(k as f64 * SPACING_M, 0.01 + v))
            .collect::<Vec<_>>()
    });
    match Recording::new(top, left, right) {
        Ok(recording) => recording,
        Err(e) => panic!("bump recording is misaligned: {e}"),
    }
}

/// Two-entry catalog: HPS first, then a cool LED.
pub(crate) fn test_catalog() -> SpectralCatalog {
    let entries = vec![
        CatalogEntry {
            tech: "HPS".to_string(),
            red_green: 2.4,
            blue_green: 0.25,
            ir_green: 0.9,
            ulor: 0.1,
        },
        CatalogEntry {
            tech: "LED".to_string(),
            red_green: 0.8,
            blue_green: 0.9,
            ir_green: 0.02,
            ulor: 0.0,
        },
    ];
    match SpectralCatalog::new(entries) {
        Ok(catalog) => catalog,
        Err(e) => panic!("test catalog is invalid: {e}"),
    }
}

/// Top-only record at `(lat, lon)` directly below its fixture, h = 2 m.
pub(crate) fn fixture_at(lat: f64, lon: f64, height_m: f64, flux: f64) -> FixtureRecord {
    FixtureRecord {
        lat,
        lon,
        height_m,
        tech: "HPS".to_string(),
        lux: 5.0,
        flux,
        side: Side::None,
        red_green: 0.336,
        blue_green: 0.25,
        horizontal_distance_m: 0.0,
        decay_distance_m: 8.0,
        peak_lat: lat,
        peak_lon: lon,
        e_perp: 5.0,
        time: String::new(),
        direction: Direction::Ahead,
        instrument_height_m: 2.0,
        category: Category::TopOnly,
        ulor: 0.1,
        side_ratio: None,
        bearing: Some([0.0, 1.0]),
    }
}
