use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Analysis configuration
// ---------------------------------------------------------------------------

/// Tunables of the absorbance pipeline.
///
/// The defaults describe the usual setup: the horizontal extent of the image
/// is assumed to span the visible range 400–700 nm linearly, and every
/// channel reading is floored at `1e-6` before taking the ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Wavelength label of the first pixel column (nm).
    pub wavelength_start_nm: f64,
    /// Wavelength the last column approaches (nm, exclusive).
    pub wavelength_end_nm: f64,
    /// Minimum value any channel reading is clamped to.
    pub intensity_floor: f64,
    /// Wavelengths sampled for the "major wavelengths" summary.
    pub major_wavelengths: Vec<u32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            wavelength_start_nm: 400.0,
            wavelength_end_nm: 700.0,
            intensity_floor: 1e-6,
            major_wavelengths: vec![400, 500, 600, 700],
        }
    }
}

impl AnalysisConfig {
    /// Reject ranges and floors the extractor cannot work with.
    pub fn validate(&self) -> Result<()> {
        let (start, end) = (self.wavelength_start_nm, self.wavelength_end_nm);
        if !start.is_finite() || !end.is_finite() || start >= end {
            return Err(AnalysisError::InvalidInput(format!(
                "wavelength range {start}..{end} is empty or not finite"
            )));
        }
        if !(self.intensity_floor.is_finite() && self.intensity_floor > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "intensity floor must be positive, got {}",
                self.intensity_floor
            )));
        }
        Ok(())
    }
}
