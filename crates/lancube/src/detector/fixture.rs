use nalgebra::Vector2;

use crate::geo::GeoPoint;
use crate::trace::Side;

use super::correlate::Category;
use super::decay::Direction;

/// One row of the fixture inventory.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FixtureRecord {
    /// Estimated fixture latitude.
    pub lat: f64,
    /// Estimated fixture longitude.
    pub lon: f64,
    /// Mounting height above ground (`H`, metres).
    pub height_m: f64,
    /// Technology label of the nearest catalog entry.
    pub tech: String,
    /// Raw illuminance at the peak sample.
    pub lux: f64,
    /// Estimated luminous flux.
    pub flux: f64,
    pub side: Side,
    /// Scaled red/green ratio at the peak sample.
    pub red_green: f64,
    /// Blue/green ratio at the peak sample.
    pub blue_green: f64,
    /// Horizontal distance from the travel path (`d`, metres).
    pub horizontal_distance_m: f64,
    /// Peak-to-decay distance (`D`, metres).
    pub decay_distance_m: f64,
    /// Latitude where the peak was recorded.
    pub peak_lat: f64,
    /// Longitude where the peak was recorded.
    pub peak_lon: f64,
    /// Perpendicular illuminance (`E⊥`).
    pub e_perp: f64,
    pub time: String,
    pub direction: Direction,
    /// Instrument mounting height (`h`, metres).
    pub instrument_height_m: f64,
    pub category: Category,
    /// Upward light output ratio of the matched technology.
    pub ulor: f64,
    /// Top/side peak ratio `k`, simultaneous detections only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_ratio: Option<f64>,
    /// Unit `(east, north)` bearing from the peak toward the fixture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearing: Option<[f64; 2]>,
}

impl FixtureRecord {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    pub fn peak_position(&self) -> GeoPoint {
        GeoPoint::new(self.peak_lat, self.peak_lon)
    }

    pub fn set_position(&mut self, p: GeoPoint) {
        self.lat = p.lat;
        self.lon = p.lon;
    }

    pub fn bearing_vector(&self) -> Option<Vector2<f64>> {
        self.bearing.map(|[x, y]| Vector2::new(x, y))
    }

    /// Height above the instrument (`H - h`).
    pub fn rise_m(&self) -> f64 {
        self.height_m - self.instrument_height_m
    }

    /// `H`, `d` and flux are all finite.
    pub fn geometry_is_finite(&self) -> bool {
        self.height_m.is_finite()
            && self.horizontal_distance_m.is_finite()
            && self.flux.is_finite()
    }

    /// Every numeric output field is finite.
    pub fn is_finite(&self) -> bool {
        self.geometry_is_finite()
            && self.position().is_finite()
            && self.peak_position().is_finite()
            && [
                self.lux,
                self.red_green,
                self.blue_green,
                self.decay_distance_m,
                self.e_perp,
            ]
            .iter()
            .all(|v| v.is_finite())
    }
}
