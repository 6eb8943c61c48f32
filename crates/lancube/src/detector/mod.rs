//! Detection stages (conditioning, peaks, correlation, decay, inversion,
//! classification, projection, height correction, dedup) independent of
//! orchestration.
//!
//! The `pipeline` module owns the call order. This module provides the
//! algorithmic building blocks and the shared configuration types.

pub(crate) mod condition;
pub(crate) mod correlate;
pub(crate) mod decay;
pub(crate) mod dedup;
pub(crate) mod fixture;
pub(crate) mod invert;
pub(crate) mod peaks;
pub(crate) mod project;
pub(crate) mod reestimate;
pub(crate) mod spectral;

pub(crate) mod config;

pub use condition::{condition_recording, gaussian_smooth, rolling_min_centered};
pub use config::{
    ConditionParams, CorrelationParams, DecayParams, DedupParams, InventoryConfig, PeakParams,
    ReestimateParams, SpectralParams,
};
pub use correlate::{correlate, Category, CorrelationStats, Detection, SensorPeaks};
pub use decay::{locate_decay, DecayPoint, Direction};
pub use dedup::{dedup_fixtures, remove_shadowed_low};
pub use fixture::FixtureRecord;
pub use invert::{invert, luminous_flux, side_ratio, Geometry, InversionInput};
pub use peaks::{find_peaks, Peak};
pub use project::{project, side_bearing, travel_bearing};
pub use reestimate::{is_suspect, reestimate_heights};
pub use spectral::{classify, ColourRatios};
