//! High-level survey API.
//!
//! [`Surveyor`] is the primary entry point. It owns an [`InventoryConfig`]
//! and a [`SpectralCatalog`] and turns recordings into fixture inventories.

use std::path::Path;

use crate::catalog::SpectralCatalog;
use crate::detector::InventoryConfig;
use crate::error::Result;
use crate::pipeline::{self, InventoryResult};
use crate::recording::Recording;
use crate::trace::ConditionedTraces;

/// Primary inventory interface.
///
/// Create once, survey many recordings.
///
/// # Examples
///
/// ```no_run
/// use lancube::{Recording, Surveyor};
/// use std::path::Path;
///
/// let surveyor = Surveyor::from_catalog_json_file(Path::new("catalog.json")).unwrap();
/// let recording = Recording::from_json_file(Path::new("recording.json")).unwrap();
/// let result = surveyor.survey(&recording);
/// println!("Found {} fixtures", result.fixtures.len());
/// ```
pub struct Surveyor {
    config: InventoryConfig,
    catalog: SpectralCatalog,
}

impl Surveyor {
    /// Create a surveyor with the default configuration.
    pub fn new(catalog: SpectralCatalog) -> Self {
        Self::with_config(catalog, InventoryConfig::default())
    }

    /// Create with full config control.
    pub fn with_config(catalog: SpectralCatalog, config: InventoryConfig) -> Self {
        Self { config, catalog }
    }

    /// Load the catalog JSON and create a surveyor with default settings.
    pub fn from_catalog_json_file(path: &Path) -> Result<Self> {
        Ok(Self::new(SpectralCatalog::from_json_file(path)?))
    }

    /// Access the current configuration.
    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut InventoryConfig {
        &mut self.config
    }

    pub fn catalog(&self) -> &SpectralCatalog {
        &self.catalog
    }

    /// Condition a segmented recording and build its inventory.
    pub fn survey(&self, recording: &Recording) -> InventoryResult {
        pipeline::run_inventory(recording, &self.catalog, &self.config)
    }

    /// Build the inventory from already-conditioned traces.
    pub fn survey_traces(&self, traces: &ConditionedTraces) -> InventoryResult {
        pipeline::run_on_traces(traces, &self.catalog, &self.config)
    }
}
