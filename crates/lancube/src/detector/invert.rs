//! Closed-form photometric inversion of a peak/decay pair.
//!
//! The falloff model is inverse-square with a cosine term, so the decay
//! ratio enters through its cube root. One solver per [`Category`] is
//! selected by [`solver_for`]; all variants share the guarded square root,
//! illuminance projection and flux formula below.
//!
//! A radicand at or below zero (or any non-finite intermediate) yields NaN
//! for the affected quantities. Such records are repaired or removed by the
//! finalize passes, never written out.

use std::f64::consts::PI;

use super::correlate::Category;

/// Quantities the inversion reads for one detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InversionInput {
    pub category: Category,
    /// Peak value on the detection's trace (`V`, or `Vtop` when simultaneous).
    pub peak_value: f64,
    /// Decay point value on the same trace (`Vp`).
    pub decay_value: f64,
    /// `|distance(peak) - distance(decay)|` (`D`).
    pub decay_distance_m: f64,
    /// Side value at the top peak index (`Vside`), simultaneous only.
    pub side_value: Option<f64>,
    /// Raw illuminance at the peak sample.
    pub lux: f64,
}

/// Horizontal distance, height and perpendicular illuminance of a fixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Horizontal distance from the travel path (`d`).
    pub horizontal_distance_m: f64,
    /// Mounting height above ground (`H`).
    pub height_m: f64,
    /// Perpendicular illuminance (`E⊥`).
    pub e_perp: f64,
}

impl Geometry {
    pub fn is_finite(&self) -> bool {
        self.horizontal_distance_m.is_finite()
            && self.height_m.is_finite()
            && self.e_perp.is_finite()
    }
}

/// `(d, H)` solver for one category, given `h`.
pub type Solver = fn(&InversionInput, f64) -> (f64, f64);

#[inline]
fn guarded_sqrt(x: f64) -> f64 {
    if x > 0.0 {
        x.sqrt()
    } else {
        f64::NAN
    }
}

/// `D * r^(1/3) / sqrt(1 - r^(2/3))` with `r = Vp / V`.
fn decay_offset(input: &InversionInput) -> f64 {
    let r = input.decay_value / input.peak_value;
    let value = input.decay_distance_m * r.powf(1.0 / 3.0) / guarded_sqrt(1.0 - r.powf(2.0 / 3.0));
    if value.is_finite() {
        value
    } else {
        f64::NAN
    }
}

fn solve_top_only(input: &InversionInput, h: f64) -> (f64, f64) {
    (0.0, decay_offset(input) + h)
}

fn solve_side_only(input: &InversionInput, h: f64) -> (f64, f64) {
    (decay_offset(input), h)
}

/// Top/side ratio `k = Vtop / Vside`, NaN unless finite and positive.
pub fn side_ratio(peak_value: f64, side_value: Option<f64>) -> f64 {
    match side_value {
        Some(side) if side > 0.0 => {
            let k = peak_value / side;
            if k.is_finite() && k > 0.0 {
                k
            } else {
                f64::NAN
            }
        }
        _ => f64::NAN,
    }
}

fn solve_simultaneous(input: &InversionInput, h: f64) -> (f64, f64) {
    let k = side_ratio(input.peak_value, input.side_value);
    let k2 = k * k;
    let decay = (input.peak_value / input.decay_value).powf(2.0 / 3.0);
    let d = input.decay_distance_m / guarded_sqrt(decay * (k2 + 1.0) - k2 - 1.0);
    if !d.is_finite() {
        return (f64::NAN, f64::NAN);
    }
    (d, d * k + h)
}

/// Solver dispatch by detection category.
pub fn solver_for(category: Category) -> Solver {
    match category {
        Category::TopOnly => solve_top_only,
        Category::SideOnly => solve_side_only,
        Category::Simultaneous => solve_simultaneous,
    }
}

/// Perpendicular illuminance. Simultaneous detections project the off-axis
/// reading onto the fixture-to-sensor line.
pub fn perpendicular_illuminance(category: Category, lux: f64, height_m: f64, h: f64) -> f64 {
    match category {
        Category::Simultaneous => {
            let rise = height_m - h;
            if rise > 0.0 {
                lux * (rise * rise + height_m * height_m).sqrt() / rise
            } else {
                f64::NAN
            }
        }
        Category::TopOnly | Category::SideOnly => lux,
    }
}

/// `2π K E⊥ (d² + (H - h)²) / (1 - ULOR)`.
pub fn luminous_flux(
    flux_calibration: f64,
    e_perp: f64,
    horizontal_distance_m: f64,
    height_m: f64,
    h: f64,
    ulor: f64,
) -> f64 {
    let rise = height_m - h;
    2.0 * PI * flux_calibration * e_perp
        * (horizontal_distance_m * horizontal_distance_m + rise * rise)
        / (1.0 - ulor)
}

/// Solve distance, height and perpendicular illuminance for one detection.
pub fn invert(input: &InversionInput, h: f64) -> Geometry {
    let (d, height) = solver_for(input.category)(input, h);
    Geometry {
        horizontal_distance_m: d,
        height_m: height,
        e_perp: perpendicular_illuminance(input.category, input.lux, height, h),
    }
}
