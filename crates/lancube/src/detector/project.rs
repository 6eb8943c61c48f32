//! Projection of a horizontal distance onto geographic coordinates.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Rotation2, Vector2};

use crate::geo::GeoPoint;
use crate::trace::Side;

use super::decay::Direction;

/// Unit vector along the local direction of travel, `(east, north)`.
///
/// Built from the peak-to-decay degree delta with longitude scaled by
/// `cos(latitude)`, flipped when the decay point lies behind the peak.
/// `None` when the two positions coincide.
pub fn travel_bearing(
    peak: GeoPoint,
    decay: GeoPoint,
    direction: Direction,
) -> Option<Vector2<f64>> {
    let cos_lat = peak.lat.to_radians().cos();
    let delta = Vector2::new((decay.lon - peak.lon) * cos_lat, decay.lat - peak.lat)
        * direction.sign();
    let norm = delta.norm();
    if norm > 0.0 && norm.is_finite() {
        Some(delta / norm)
    } else {
        None
    }
}

/// Rotate a travel bearing toward the detection side.
pub fn side_bearing(travel: Vector2<f64>, side: Side) -> Vector2<f64> {
    let angle = match side {
        Side::Right => -FRAC_PI_2,
        Side::Left => FRAC_PI_2,
        Side::None => 0.0,
    };
    Rotation2::new(angle) * travel
}

/// Estimated fixture position `d` metres from `peak` along `bearing`.
///
/// Without a bearing only a zero distance can be placed; anything else is
/// reported as NaN.
pub fn project(
    peak: GeoPoint,
    bearing: Option<Vector2<f64>>,
    horizontal_distance_m: f64,
) -> GeoPoint {
    match bearing {
        Some(b) => peak.offset_by(b * horizontal_distance_m),
        None if horizontal_distance_m == 0.0 => peak,
        None => GeoPoint::new(f64::NAN, f64::NAN),
    }
}
