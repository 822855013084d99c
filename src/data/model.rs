use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// PixelScanline – one horizontal row of RGBA samples
// ---------------------------------------------------------------------------

/// A single image row, one `[r, g, b, a]` sample per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelScanline {
    pixels: Vec<[u8; 4]>,
}

impl PixelScanline {
    pub fn from_pixels(pixels: Vec<[u8; 4]>) -> Self {
        Self { pixels }
    }

    /// Build a scanline from a row-major RGBA byte buffer, one row high.
    pub fn from_rgba(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 4 != 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "RGBA row has {} bytes, not a multiple of 4",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();
        Ok(Self { pixels })
    }

    pub fn width(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }
}

// ---------------------------------------------------------------------------
// WavelengthMap – display labels for each column
// ---------------------------------------------------------------------------

/// Integer wavelength label (nm) per scanline column.
///
/// This is an approximation: the horizontal extent is assumed to cover the
/// configured range linearly, it is not calibrated against the optics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavelengthMap(Vec<u32>);

impl WavelengthMap {
    /// Entry `i` is `round(start + i * (end - start) / width)`.
    pub fn linear(width: usize, start_nm: f64, end_nm: f64) -> Self {
        let step = (end_nm - start_nm) / width as f64;
        let labels = (0..width)
            .map(|i| (start_nm + i as f64 * step).round() as u32)
            .collect();
        Self(labels)
    }

    /// The 400–700 nm visible range.
    pub fn visible(width: usize) -> Self {
        Self::linear(width, 400.0, 700.0)
    }

    /// First column labelled exactly `nm`.
    pub fn position_of(&self, nm: u32) -> Option<usize> {
        self.0.iter().position(|&w| w == nm)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// AbsorbanceSeries / Extraction – extractor output
// ---------------------------------------------------------------------------

/// Per-channel absorbance, index-aligned with the [`WavelengthMap`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbsorbanceSeries {
    pub red: Vec<f64>,
    pub green: Vec<f64>,
    pub blue: Vec<f64>,
    /// `(red + green + blue) / 3` per column.
    pub total: Vec<f64>,
}

impl AbsorbanceSeries {
    pub fn with_capacity(width: usize) -> Self {
        Self {
            red: Vec::with_capacity(width),
            green: Vec::with_capacity(width),
            blue: Vec::with_capacity(width),
            total: Vec::with_capacity(width),
        }
    }

    pub fn len(&self) -> usize {
        self.total.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_empty()
    }
}

/// Everything one blank/sample pair yields.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub wavelengths: WavelengthMap,
    pub series: AbsorbanceSeries,
    /// Mean of `series.total`.
    pub scalar: f64,
}

// ---------------------------------------------------------------------------
// Calibration
// ---------------------------------------------------------------------------

/// An operator-supplied (known concentration, measured absorbance) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub concentration: f64,
    pub absorbance: f64,
}

impl CalibrationPoint {
    pub const fn new(concentration: f64, absorbance: f64) -> Self {
        Self {
            concentration,
            absorbance,
        }
    }
}

/// Seed curve loaded before any user input (absorbance = 0.5 · concentration).
pub const DEFAULT_CALIBRATION: [CalibrationPoint; 5] = [
    CalibrationPoint::new(0.1, 0.05),
    CalibrationPoint::new(0.3, 0.15),
    CalibrationPoint::new(0.5, 0.25),
    CalibrationPoint::new(0.7, 0.35),
    CalibrationPoint::new(0.9, 0.45),
];

/// Fitted line `absorbance = slope · concentration + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel {
    pub slope: f64,
    pub intercept: f64,
}

impl RegressionModel {
    pub fn absorbance_at(&self, concentration: f64) -> f64 {
        self.slope * concentration + self.intercept
    }
}

impl fmt::Display for RegressionModel {
    /// Renders the equation as `A = 0.500 · c + 0.000`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.intercept >= 0.0 { '+' } else { '-' };
        write!(
            f,
            "A = {:.3} · c {sign} {:.3}",
            self.slope,
            self.intercept.abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wavelength_map_spans_visible_range() {
        let map = WavelengthMap::visible(4);
        assert_eq!(map.as_slice(), &[400, 475, 550, 625]);
    }

    #[test]
    fn wavelength_map_is_monotonic() {
        let map = WavelengthMap::visible(1000);
        assert_eq!(map.len(), 1000);
        assert!(map.as_slice().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn position_of_finds_first_match() {
        let map = WavelengthMap::visible(300);
        assert_eq!(map.position_of(500), Some(100));

        // 0.5 nm steps: column 199 (499.5) already rounds up to 500
        let map = WavelengthMap::visible(600);
        assert_eq!(map.position_of(500), Some(199));
        // and the last column (699.5) rounds up to 700
        assert_eq!(map.position_of(700), Some(599));

        assert_eq!(WavelengthMap::visible(300).position_of(700), None);
    }

    #[test]
    fn rgba_row_must_be_whole_pixels() {
        let scanline = PixelScanline::from_rgba(&[1, 2, 3, 255, 4, 5, 6, 255]).unwrap();
        assert_eq!(scanline.width(), 2);
        assert_eq!(scanline.pixels()[1], [4, 5, 6, 255]);

        assert!(matches!(
            PixelScanline::from_rgba(&[1, 2, 3]),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn equation_folds_sign_into_operator() {
        let model = RegressionModel {
            slope: 0.5,
            intercept: -0.0126,
        };
        assert_eq!(model.to_string(), "A = 0.500 · c - 0.013");

        let model = RegressionModel {
            slope: 1.25,
            intercept: 0.0,
        };
        assert_eq!(model.to_string(), "A = 1.250 · c + 0.000");
    }
}
