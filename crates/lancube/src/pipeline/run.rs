//! Top-level pipeline orchestrator: condition -> peaks -> correlate ->
//! build -> finalize.

use crate::catalog::SpectralCatalog;
use crate::detector::{condition_recording, correlate, find_peaks, InventoryConfig, SensorPeaks};
use crate::recording::Recording;
use crate::trace::{ConditionedTraces, Sensor};

use super::result::{InventoryResult, PipelineStats};

fn detect_peaks(traces: &ConditionedTraces, config: &InventoryConfig) -> SensorPeaks {
    let [top, left, right] =
        Sensor::ALL.map(|s| find_peaks(&traces.trace(s).values(), &config.peaks));
    tracing::info!(
        "{} top, {} left, {} right peak candidates",
        top.len(),
        left.len(),
        right.len()
    );
    SensorPeaks { top, left, right }
}

/// Run the full inventory on an already-conditioned set of traces.
pub fn run_on_traces(
    traces: &ConditionedTraces,
    catalog: &SpectralCatalog,
    config: &InventoryConfig,
) -> InventoryResult {
    let mut stats = PipelineStats {
        conditioned_samples: traces.len(),
        ..Default::default()
    };
    if traces.is_empty() {
        tracing::info!("no conditioned samples; inventory is empty");
        return InventoryResult {
            fixtures: Vec::new(),
            stats,
        };
    }

    let peaks = detect_peaks(traces, config);
    stats.top_candidates = peaks.top.len();
    stats.left_candidates = peaks.left.len();
    stats.right_candidates = peaks.right.len();

    let (detections, correlation) = correlate(traces, &peaks, &config.correlation);
    stats.correlation = correlation;

    let built = super::build::run(traces, &detections, catalog, config);
    stats.no_decay_point = built.no_decay_point;
    stats.fixtures_built = built.records.len();
    stats.degenerate_inversions = built.degenerate;

    let fixtures = super::finalize::run(built.records, config, &mut stats);
    InventoryResult { fixtures, stats }
}

/// Condition a segmented recording and run the full inventory on it.
pub fn run_inventory(
    recording: &Recording,
    catalog: &SpectralCatalog,
    config: &InventoryConfig,
) -> InventoryResult {
    let traces = condition_recording(recording, &config.condition);
    run_on_traces(&traces, catalog, config)
}
