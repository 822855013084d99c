use log::debug;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};

use super::model::{AbsorbanceSeries, Extraction, PixelScanline, WavelengthMap};

// ---------------------------------------------------------------------------
// Absorbance extraction
// ---------------------------------------------------------------------------

/// Compute per-channel and aggregate absorbance with the default 400–700 nm
/// mapping and `1e-6` floor.
pub fn extract(blank: &PixelScanline, sample: &PixelScanline) -> Result<Extraction> {
    extract_with(blank, sample, &AnalysisConfig::default())
}

/// Compute absorbance column by column: `A_c = -log10(sample_c / blank_c)`
/// for each of R, G, B, and `total = (A_R + A_G + A_B) / 3`.
///
/// Both scanlines must have the same, non-zero width. Every channel reading
/// is clamped to `config.intensity_floor` first, so a black pixel yields a
/// large finite absorbance rather than an infinity.
pub fn extract_with(
    blank: &PixelScanline,
    sample: &PixelScanline,
    config: &AnalysisConfig,
) -> Result<Extraction> {
    config.validate()?;

    let width = blank.width();
    if width == 0 {
        return Err(AnalysisError::InvalidInput(
            "scanline width must be positive".to_string(),
        ));
    }
    if sample.width() != width {
        return Err(AnalysisError::InvalidInput(format!(
            "blank scanline has {width} columns but sample has {}",
            sample.width()
        )));
    }

    let floor = config.intensity_floor;
    let channel_absorbance = |blank: u8, sample: u8| -> f64 {
        let b = (blank as f64).max(floor);
        let s = (sample as f64).max(floor);
        -(s / b).log10()
    };

    let mut series = AbsorbanceSeries::with_capacity(width);
    for (b, s) in blank.pixels().iter().zip(sample.pixels()) {
        let a_r = channel_absorbance(b[0], s[0]);
        let a_g = channel_absorbance(b[1], s[1]);
        let a_b = channel_absorbance(b[2], s[2]);

        series.red.push(a_r);
        series.green.push(a_g);
        series.blue.push(a_b);
        series.total.push((a_r + a_g + a_b) / 3.0);
    }

    let scalar = series.total.iter().sum::<f64>() / width as f64;
    debug!("Extracted {width} columns, scalar absorbance {scalar:.4}");

    Ok(Extraction {
        wavelengths: WavelengthMap::linear(
            width,
            config.wavelength_start_nm,
            config.wavelength_end_nm,
        ),
        series,
        scalar,
    })
}

/// Sample the total absorbance at the first column labelled with each of the
/// requested wavelengths. Wavelengths the map never hits come back as `None`.
pub fn absorbance_at_wavelengths(
    extraction: &Extraction,
    wavelengths: &[u32],
) -> Vec<(u32, Option<f64>)> {
    wavelengths
        .iter()
        .map(|&nm| {
            let value = extraction
                .wavelengths
                .position_of(nm)
                .and_then(|i| extraction.series.total.get(i).copied());
            (nm, value)
        })
        .collect()
}
