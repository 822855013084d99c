/// Data layer: core types, absorbance extraction, calibration and file I/O.
///
/// Architecture:
/// ```text
///  blank.png   sample.png
///      │           │
///      ▼           ▼
///   ┌──────────────────┐
///   │      loader      │  decode both (joined), crop, sample mid row
///   └──────────────────┘
///            │  PixelScanline × 2
///            ▼
///   ┌──────────────────┐
///   │     extract      │  -log10(sample/blank) per channel → Extraction
///   └──────────────────┘
///            │  scalar absorbance
///            ▼
///   ┌──────────────────┐        (concentration, absorbance) points
///   │    regression    │ ◄───── entered by the operator / seed data
///   └──────────────────┘
///            │
///            ▼
///      concentration
/// ```
pub mod export;
pub mod extract;
pub mod loader;
pub mod model;
pub mod regression;
