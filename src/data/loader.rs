use std::path::Path;
use std::thread;

use anyhow::{anyhow, Context, Result};
use image::RgbaImage;
use log::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

use super::extract::extract_with;
use super::model::{Extraction, PixelScanline};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Run the whole pipeline on two image files: decode both, crop them to their
/// common size, sample the middle row and extract absorbance.
pub fn analyze_files(blank: &Path, sample: &Path, config: &AnalysisConfig) -> Result<Extraction> {
    let (blank_img, sample_img) = decode_pair(blank, sample)?;
    let (blank_line, sample_line) = align_scanlines(&blank_img, &sample_img)?;
    let extraction = extract_with(&blank_line, &sample_line, config)?;

    info!(
        "Analysed {} vs {}: {} columns, final absorbance {:.3}",
        blank.display(),
        sample.display(),
        extraction.series.len(),
        extraction.scalar
    );
    Ok(extraction)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode any supported image file (PNG, JPEG) into 8-bit RGBA.
pub fn decode_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    debug!("Decoded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img.to_rgba8())
}

/// Decode the blank and the sample concurrently and wait for both.
///
/// Neither result is used until both have completed; a failure of either
/// aborts the pair.
pub fn decode_pair(blank: &Path, sample: &Path) -> Result<(RgbaImage, RgbaImage)> {
    thread::scope(|s| {
        let blank_job = s.spawn(|| decode_image(blank));
        let sample_job = s.spawn(|| decode_image(sample));

        let blank_img = blank_job
            .join()
            .map_err(|_| anyhow!("blank decode thread panicked"))?
            .context("loading blank image")?;
        let sample_img = sample_job
            .join()
            .map_err(|_| anyhow!("sample decode thread panicked"))?
            .context("loading sample image")?;

        Ok((blank_img, sample_img))
    })
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Crop both images to `min(width) x min(height)` and take the middle row of
/// that region from each. Larger images are truncated, never rescaled.
pub fn align_scanlines(
    blank: &RgbaImage,
    sample: &RgbaImage,
) -> std::result::Result<(PixelScanline, PixelScanline), AnalysisError> {
    let width = blank.width().min(sample.width());
    let height = blank.height().min(sample.height());
    if width == 0 || height == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "common image region is {width}x{height}"
        )));
    }
    if blank.dimensions() != sample.dimensions() {
        warn!(
            "Image sizes differ ({:?} vs {:?}), cropping both to {width}x{height}",
            blank.dimensions(),
            sample.dimensions()
        );
    }

    let row = height / 2;
    debug!("Sampling row {row} over {width} columns");

    let scanline = |img: &RgbaImage| {
        PixelScanline::from_pixels((0..width).map(|x| img.get_pixel(x, row).0).collect())
    };
    Ok((scanline(blank), scanline(sample)))
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Read an [`AnalysisConfig`] from a JSON file. Missing keys take defaults.
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let text = std::fs::read_to_string(path).context("reading config file")?;
    let config: AnalysisConfig = serde_json::from_str(&text).context("parsing config JSON")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn solid(width: u32, height: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(px))
    }

    #[test]
    fn crops_to_common_region_and_samples_middle_row() {
        let mut blank = solid(6, 5, [200, 200, 200, 255]);
        let sample = solid(4, 9, [100, 100, 100, 255]);
        // min height is 5, so row 2 is sampled
        blank.put_pixel(0, 2, Rgba([1, 2, 3, 255]));

        let (b, s) = align_scanlines(&blank, &sample).unwrap();
        assert_eq!(b.width(), 4);
        assert_eq!(s.width(), 4);
        assert_eq!(b.pixels()[0], [1, 2, 3, 255]);
        assert_eq!(b.pixels()[1], [200, 200, 200, 255]);
    }

    #[test]
    fn empty_region_is_invalid() {
        let blank = solid(0, 3, [0, 0, 0, 255]);
        let sample = solid(3, 3, [0, 0, 0, 255]);
        assert!(matches!(
            align_scanlines(&blank, &sample),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn decodes_pair_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let blank_path = dir.path().join("blank.png");
        let sample_path = dir.path().join("sample.png");
        solid(8, 4, [200, 200, 200, 255]).save(&blank_path).unwrap();
        solid(8, 4, [100, 100, 100, 255]).save(&sample_path).unwrap();

        let (b, s) = decode_pair(&blank_path, &sample_path).unwrap();
        assert_eq!(b.dimensions(), (8, 4));
        assert_eq!(s.get_pixel(3, 2).0, [100, 100, 100, 255]);

        let out = analyze_files(&blank_path, &sample_path, &AnalysisConfig::default()).unwrap();
        assert_eq!(out.series.len(), 8);
        assert!((out.scalar - 2.0_f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn missing_file_aborts_the_pair() {
        let dir = tempfile::tempdir().unwrap();
        let blank_path = dir.path().join("blank.png");
        solid(2, 2, [10, 10, 10, 255]).save(&blank_path).unwrap();

        let err = decode_pair(&blank_path, &dir.path().join("nope.png")).unwrap_err();
        assert!(format!("{err:#}").contains("sample"));
    }

    #[test]
    fn config_file_is_validated() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{ "major_wavelengths": [450, 650] }"#).unwrap();
        let config = load_config(&good).unwrap();
        assert_eq!(config.major_wavelengths, vec![450, 650]);

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{ "intensity_floor": -1.0 }"#).unwrap();
        assert!(load_config(&bad).is_err());
    }
}
