//! lancube: street-light inventory from mobile three-sensor light-meter
//! recordings.
//!
//! The instrument carries one upward-facing ("top") and two side-facing
//! ("left"/"right") light sensors along a path under overhead fixtures.
//! The pipeline stages are:
//!
//! 1. **Condition** - infrared removal, Gaussian smoothing, side-sensor
//!    background subtraction, lock-step sample drops.
//! 2. **Peaks** - local maxima per trace with height, separation and
//!    prominence thresholds.
//! 3. **Correlate** - top-only / side-only / simultaneous classification.
//! 4. **Decay** - 10-90 % decay point, ahead of the peak when possible.
//! 5. **Invert** - closed-form distance, height, illuminance and flux.
//! 6. **Classify** - nearest spectral catalog entry (technology + ULOR).
//! 7. **Project** - fixture coordinates from a unit bearing and distance.
//! 8. **Finalize** - height re-estimation, flux threshold, dedup, shadowed
//!    low-fixture removal.
//!
//! # Public API
//! - [`Surveyor`] as the primary entry point
//! - [`InventoryConfig`] for tuning
//! - [`Recording`] / [`SpectralCatalog`] loaders and the result structures

mod api;
mod catalog;
pub mod detector;
mod error;
mod geo;
mod pipeline;
mod recording;
mod trace;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::Surveyor;
pub use catalog::{CatalogEntry, SpectralCatalog};
pub use detector::{
    Category, ConditionParams, CorrelationParams, DecayParams, DedupParams, Direction,
    FixtureRecord, InventoryConfig, PeakParams, ReestimateParams, SpectralParams,
};
pub use error::{Error, Result};
pub use geo::{GeoPoint, EARTH_RADIUS_M};
pub use pipeline::{run_inventory, run_on_traces, InventoryResult, PipelineStats};
pub use recording::{RawSample, Recording, RECORDING_SCHEMA_V1};
pub use trace::{ChannelReading, ConditionedTraces, Sensor, SensorTrace, Side, TraceSample};
