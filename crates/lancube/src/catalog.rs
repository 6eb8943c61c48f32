//! Reference spectral catalog of lighting technologies.
//!
//! The catalog is read once and shared immutably by every classification.
//! An empty catalog is rejected at load time, so nearest-entry lookup always
//! has an answer.

use std::path::Path;

use crate::error::{read_to_string, Error, Result};

/// One lighting technology with its reference colour ratios.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    /// Technology label (e.g. `"HPS"`, `"LED 3000K"`).
    pub tech: String,
    /// Reference red/green ratio (unscaled).
    pub red_green: f64,
    /// Reference blue/green ratio.
    pub blue_green: f64,
    /// Reference infrared/green ratio.
    pub ir_green: f64,
    /// Upward light output ratio in `[0, 1)`.
    pub ulor: f64,
}

/// Validated, non-empty list of catalog entries in file order.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct SpectralCatalog {
    entries: Vec<CatalogEntry>,
}

impl SpectralCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        for entry in &entries {
            validate_entry(entry)?;
        }
        Ok(Self { entries })
    }

    /// Load a catalog from a JSON array of entries.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(data)?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_entry(entry: &CatalogEntry) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidCatalogEntry {
        tech: entry.tech.clone(),
        reason: reason.to_string(),
    };

    if entry.tech.trim().is_empty() {
        return Err(invalid("technology label must not be empty"));
    }
    if ![entry.red_green, entry.blue_green, entry.ir_green]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(invalid("colour ratios must be finite"));
    }
    if !(0.0..1.0).contains(&entry.ulor) {
        return Err(invalid("ulor must be in [0, 1)"));
    }
    Ok(())
}
