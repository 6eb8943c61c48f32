use std::path::Path;

use crate::error::{read_to_string, Error, Result};

/// Signal conditioning controls.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConditionParams {
    /// Samples whose mean travelled distance is at or below this are dropped.
    pub trim_start_m: f64,
    /// Gaussian smoothing sigma, in samples.
    pub smoothing_sigma: f64,
    /// Kernel radius in multiples of sigma.
    pub smoothing_truncate: f64,
    /// Centered rolling-minimum window (samples) used as side-sensor background.
    pub background_window: usize,
}

impl Default for ConditionParams {
    fn default() -> Self {
        Self {
            trim_start_m: 10.0,
            smoothing_sigma: 0.4,
            smoothing_truncate: 4.0,
            background_window: 7,
        }
    }
}

/// Local-maximum detection thresholds.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PeakParams {
    /// Minimum index separation between two retained peaks.
    pub min_distance: usize,
    /// Minimum topographic prominence (conditioned intensity units).
    pub min_prominence: f64,
    /// Minimum absolute peak height.
    pub min_height: f64,
    /// Optional cap on peaks kept per trace (most prominent first).
    #[serde(default)]
    pub max_candidates: Option<usize>,
}

impl Default for PeakParams {
    fn default() -> Self {
        Self {
            min_distance: 2,
            min_prominence: 0.005,
            min_height: 0.005,
            max_candidates: None,
        }
    }
}

/// Cross-sensor correlation window.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CorrelationParams {
    /// Half-width (metres of travel) of the open window around a top peak.
    pub window_m: f64,
}

impl Default for CorrelationParams {
    fn default() -> Self {
        Self { window_m: 10.0 }
    }
}

/// Decay-point search window and acceptance band.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DecayParams {
    /// Samples closer than this to the peak (metres) are skipped.
    pub min_offset_m: f64,
    /// Samples farther than this from the peak (metres) are not considered.
    pub max_offset_m: f64,
    /// Lower bound of the accepted band, as a fraction of the peak.
    pub band_low: f64,
    /// Upper bound of the accepted band, as a fraction of the peak.
    pub band_high: f64,
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            min_offset_m: 2.0,
            max_offset_m: 20.0,
            band_low: 0.10,
            band_high: 0.90,
        }
    }
}

/// Spectral classification controls.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpectralParams {
    /// Scale applied to red/green ratios (measured and reference) to bring
    /// their dynamic range in line with the other two ratios.
    pub red_green_scale: f64,
}

impl Default for SpectralParams {
    fn default() -> Self {
        Self {
            red_green_scale: 0.14,
        }
    }
}

/// Implausible-height detection and correction.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReestimateParams {
    /// Flux above this marks a record as implausible.
    pub max_flux: f64,
    /// Height (metres) above this marks a record as implausible.
    pub max_height_m: f64,
    /// Implausible records at or below this height are left alone.
    pub min_suspect_height_m: f64,
    /// Number of nearby records consulted for a replacement height.
    pub neighbors: usize,
    /// Height used when no neighbour provides one.
    pub fallback_height_m: f64,
    /// Optional search radius (metres) for neighbours.
    #[serde(default)]
    pub max_neighbor_distance_m: Option<f64>,
}

impl Default for ReestimateParams {
    fn default() -> Self {
        Self {
            max_flux: 30_000.0,
            max_height_m: 22.0,
            min_suspect_height_m: 4.0,
            neighbors: 10,
            fallback_height_m: 10.0,
            max_neighbor_distance_m: None,
        }
    }
}

/// Duplicate-fixture suppression.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DedupParams {
    /// First pass only merges records detected on the same side.
    pub require_same_side: bool,
    /// Radius of the second, side-agnostic pass; `None` disables it.
    #[serde(default)]
    pub relaxed_radius_m: Option<f64>,
}

impl Default for DedupParams {
    fn default() -> Self {
        Self {
            require_same_side: true,
            relaxed_radius_m: Some(12.0),
        }
    }
}

/// Top-level inventory configuration.
///
/// Built once and passed by reference to every stage.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Mounting height of the instrument above ground (`h`, metres).
    pub instrument_height_m: f64,
    /// Flux calibration constant (`K`).
    pub flux_calibration: f64,
    /// Radius (metres) within which two records are the same fixture.
    pub prec_localisation_m: f64,
    /// Records with flux not strictly above this are discarded.
    pub min_flux: f64,
    pub condition: ConditionParams,
    pub peaks: PeakParams,
    pub correlation: CorrelationParams,
    pub decay: DecayParams,
    pub spectral: SpectralParams,
    pub reestimate: ReestimateParams,
    pub dedup: DedupParams,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            instrument_height_m: 2.0,
            flux_calibration: 1.0,
            prec_localisation_m: 8.0,
            min_flux: 250.0,
            condition: ConditionParams::default(),
            peaks: PeakParams::default(),
            correlation: CorrelationParams::default(),
            decay: DecayParams::default(),
            spectral: SpectralParams::default(),
            reestimate: ReestimateParams::default(),
            dedup: DedupParams::default(),
        }
    }
}

impl InventoryConfig {
    /// Default configuration with the three survey parameters set.
    pub fn with_survey(
        instrument_height_m: f64,
        flux_calibration: f64,
        prec_localisation_m: f64,
    ) -> Self {
        Self {
            instrument_height_m,
            flux_calibration,
            prec_localisation_m,
            ..Default::default()
        }
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing keys take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let config: InventoryConfig = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that would otherwise make stages silently meaningless.
    pub fn validate(&self) -> Result<()> {
        fn ensure(ok: bool, msg: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(Error::InvalidConfig(msg.to_string()))
            }
        }

        ensure(
            self.instrument_height_m.is_finite() && self.instrument_height_m >= 0.0,
            "instrument_height_m must be finite and >= 0",
        )?;
        ensure(
            self.flux_calibration.is_finite() && self.flux_calibration > 0.0,
            "flux_calibration must be finite and > 0",
        )?;
        ensure(
            self.prec_localisation_m.is_finite() && self.prec_localisation_m > 0.0,
            "prec_localisation_m must be finite and > 0",
        )?;
        ensure(self.min_flux.is_finite(), "min_flux must be finite")?;

        let c = &self.condition;
        ensure(
            c.smoothing_sigma.is_finite() && c.smoothing_sigma > 0.0,
            "condition.smoothing_sigma must be finite and > 0",
        )?;
        ensure(
            c.smoothing_truncate.is_finite() && c.smoothing_truncate > 0.0,
            "condition.smoothing_truncate must be finite and > 0",
        )?;
        ensure(
            c.background_window >= 1 && c.background_window % 2 == 1,
            "condition.background_window must be odd and >= 1",
        )?;

        ensure(self.peaks.min_distance >= 1, "peaks.min_distance must be >= 1")?;
        ensure(
            self.correlation.window_m.is_finite() && self.correlation.window_m > 0.0,
            "correlation.window_m must be finite and > 0",
        )?;

        let d = &self.decay;
        ensure(
            d.min_offset_m >= 0.0 && d.max_offset_m > d.min_offset_m,
            "decay offsets must satisfy 0 <= min_offset_m < max_offset_m",
        )?;
        ensure(
            (0.0..1.0).contains(&d.band_low) && d.band_high > d.band_low && d.band_high <= 1.0,
            "decay band must satisfy 0 <= band_low < band_high <= 1",
        )?;

        let r = &self.reestimate;
        ensure(r.neighbors >= 1, "reestimate.neighbors must be >= 1")?;
        ensure(
            r.fallback_height_m.is_finite() && r.fallback_height_m > self.instrument_height_m,
            "reestimate.fallback_height_m must exceed instrument_height_m",
        )?;
        if let Some(radius) = self.dedup.relaxed_radius_m {
            ensure(
                radius.is_finite() && radius > 0.0,
                "dedup.relaxed_radius_m must be finite and > 0",
            )?;
        }
        Ok(())
    }
}
