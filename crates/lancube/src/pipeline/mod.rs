//! High-level inventory pipeline.
//!
//! This module is the "glue" layer that wires the detector stages together:
//! conditioning -> peaks -> correlation -> build (decay, inversion,
//! classification, projection) -> finalize (height correction, flux
//! threshold, dedup, sanity guard).
//!
//! Algorithmic primitives live in `crate::detector`. The pipeline layer
//! owns stage boundaries, call order and statistics.

mod build;
mod finalize;
mod result;
mod run;

pub use result::{InventoryResult, PipelineStats};
pub use run::{run_inventory, run_on_traces};
