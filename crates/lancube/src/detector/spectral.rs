//! Nearest-entry spectral classification.

use crate::catalog::{CatalogEntry, SpectralCatalog};
use crate::trace::ChannelReading;

use super::config::SpectralParams;

/// Colour ratios of one sample, red/green already scaled.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColourRatios {
    pub red_green: f64,
    pub blue_green: f64,
    pub ir_green: f64,
}

impl ColourRatios {
    pub fn from_channels(channels: &ChannelReading, params: &SpectralParams) -> Self {
        Self {
            red_green: channels.red / channels.green * params.red_green_scale,
            blue_green: channels.blue / channels.green,
            ir_green: channels.ir / channels.green,
        }
    }

    pub fn from_entry(entry: &CatalogEntry, params: &SpectralParams) -> Self {
        Self {
            red_green: entry.red_green * params.red_green_scale,
            blue_green: entry.blue_green,
            ir_green: entry.ir_green,
        }
    }

    fn distance2(&self, other: &ColourRatios) -> f64 {
        let dr = self.red_green - other.red_green;
        let db = self.blue_green - other.blue_green;
        let di = self.ir_green - other.ir_green;
        dr * dr + db * db + di * di
    }
}

/// Catalog entry nearest to `ratios` in squared Euclidean distance.
///
/// Ties keep the earliest entry. Non-finite distances never win, so
/// unusable ratios (e.g. a zero green channel) fall back to the first
/// entry.
pub fn classify<'a>(
    ratios: &ColourRatios,
    catalog: &'a SpectralCatalog,
    params: &SpectralParams,
) -> &'a CatalogEntry {
    let entries = catalog.entries();
    let mut best = 0;
    let mut best_d2 = f64::INFINITY;
    for (i, entry) in entries.iter().enumerate() {
        let d2 = ratios.distance2(&ColourRatios::from_entry(entry, params));
        if d2 < best_d2 {
            best = i;
            best_d2 = d2;
        }
    }
    if !best_d2.is_finite() {
        tracing::warn!("colour ratios {:?} match no catalog entry; using the first", ratios);
    }
    &entries[best]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_catalog;

    #[test]
    fn picks_nearest_entry() {
        let catalog = test_catalog();
        let params = SpectralParams::default();
        let hps = ColourRatios::from_entry(&catalog.entries()[0], &params);
        let led = ColourRatios::from_entry(&catalog.entries()[1], &params);
        assert_eq!(classify(&hps, &catalog, &params).tech, "HPS");
        assert_eq!(classify(&led, &catalog, &params).tech, "LED");
    }

    #[test]
    fn ties_keep_catalog_order() {
        let entry = |tech: &str| CatalogEntry {
            tech: tech.to_string(),
            red_green: 1.0,
            blue_green: 0.5,
            ir_green: 0.1,
            ulor: 0.0,
        };
        let catalog = SpectralCatalog::new(vec![entry("A"), entry("B")]).expect("catalog");
        let params = SpectralParams::default();
        let ratios = ColourRatios::from_entry(&catalog.entries()[1], &params);
        assert_eq!(classify(&ratios, &catalog, &params).tech, "A");
    }

    #[test]
    fn zero_green_falls_back_to_first_entry() {
        let catalog = test_catalog();
        let params = SpectralParams::default();
        let channels = ChannelReading {
            red: 1.0,
            green: 0.0,
            blue: 1.0,
            ir: 0.0,
        };
        let ratios = ColourRatios::from_channels(&channels, &params);
        assert_eq!(classify(&ratios, &catalog, &params).tech, "HPS");
    }
}
