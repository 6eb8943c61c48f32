use crate::detector::{CorrelationStats, FixtureRecord};

/// Per-stage counters for one inventory run.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PipelineStats {
    /// Aligned samples per sensor after conditioning.
    pub conditioned_samples: usize,
    pub top_candidates: usize,
    pub left_candidates: usize,
    pub right_candidates: usize,
    pub correlation: CorrelationStats,
    /// Detections dropped because no decay point qualified.
    pub no_decay_point: usize,
    /// Records built by inversion, classification and projection.
    pub fixtures_built: usize,
    /// Records whose geometry came out NaN from inversion.
    pub degenerate_inversions: usize,
    pub heights_reestimated: usize,
    pub low_flux_dropped: usize,
    /// Duplicates removed by the side-matched pass.
    pub duplicates_dropped: usize,
    /// Duplicates removed by the relaxed, side-agnostic pass.
    pub relaxed_duplicates_dropped: usize,
    /// Instrument-height records removed near a taller fixture.
    pub shadowed_low_dropped: usize,
    /// Records removed by the final finiteness/range check.
    pub sanity_dropped: usize,
}

/// Final fixture inventory of one recording.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InventoryResult {
    pub fixtures: Vec<FixtureRecord>,
    pub stats: PipelineStats,
}

impl InventoryResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
