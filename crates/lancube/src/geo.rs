//! Local flat-earth geometry around a geographic origin.
//!
//! Offsets use the equirectangular approximation: east-west metres are scaled
//! by `cos(latitude)` of the origin. This is accurate to well under a metre
//! over the few tens of metres separating a detection from its fixture.

use nalgebra::Vector2;

/// Earth radius (metres) used for every degree/metre conversion.
pub const EARTH_RADIUS_M: f64 = 6_373_000.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Move by a local `(east, north)` offset in metres.
    pub fn offset_by(self, offset_m: Vector2<f64>) -> Self {
        let cos_lat = self.lat.to_radians().cos();
        Self {
            lat: self.lat + (180.0 * offset_m.y) / (std::f64::consts::PI * EARTH_RADIUS_M),
            lon: self.lon
                + (180.0 * offset_m.x) / (std::f64::consts::PI * EARTH_RADIUS_M * cos_lat),
        }
    }

    /// Local `(east, north)` offset in metres from `self` to `other`.
    pub fn offset_to(self, other: GeoPoint) -> Vector2<f64> {
        let cos_lat = self.lat.to_radians().cos();
        Vector2::new(
            (other.lon - self.lon).to_radians() * EARTH_RADIUS_M * cos_lat,
            (other.lat - self.lat).to_radians() * EARTH_RADIUS_M,
        )
    }

    /// Equirectangular distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        self.offset_to(other).norm()
    }
}
