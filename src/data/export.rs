use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use super::model::Extraction;

/// Write an extraction to a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – one row per column: `wavelength_nm,red,green,blue,total`
/// * `.json` – `{ "wavelengths": [...], "red": [...], ..., "scalar_absorbance": x }`
pub fn export_file(extraction: &Extraction, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let file = match ext.as_str() {
        "csv" | "json" => std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?,
        other => bail!("Unsupported export extension: .{other}"),
    };
    let mut writer = std::io::BufWriter::new(file);

    if ext == "csv" {
        write_csv(extraction, &mut writer)?;
    } else {
        write_json(extraction, &mut writer)?;
    }
    writer.flush().context("flushing export file")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CsvRow {
    wavelength_nm: u32,
    red: f64,
    green: f64,
    blue: f64,
    total: f64,
}

pub fn write_csv<W: Write>(extraction: &Extraction, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let s = &extraction.series;
    for (i, &wavelength_nm) in extraction.wavelengths.as_slice().iter().enumerate() {
        csv.serialize(CsvRow {
            wavelength_nm,
            red: s.red[i],
            green: s.green[i],
            blue: s.blue[i],
            total: s.total[i],
        })
        .with_context(|| format!("writing CSV row {i}"))?;
    }
    csv.flush().context("flushing CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct JsonDocument<'a> {
    wavelengths: &'a [u32],
    red: &'a [f64],
    green: &'a [f64],
    blue: &'a [f64],
    total: &'a [f64],
    scalar_absorbance: f64,
}

pub fn write_json<W: Write>(extraction: &Extraction, writer: W) -> Result<()> {
    let s = &extraction.series;
    let doc = JsonDocument {
        wavelengths: extraction.wavelengths.as_slice(),
        red: &s.red,
        green: &s.green,
        blue: &s.blue,
        total: &s.total,
        scalar_absorbance: extraction.scalar,
    };
    serde_json::to_writer_pretty(writer, &doc).context("writing JSON")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::Value as JsonValue;

    use super::*;
    use crate::data::extract::extract;
    use crate::data::model::PixelScanline;

    fn sample_extraction() -> Extraction {
        let blank = PixelScanline::from_pixels(vec![[200, 200, 200, 255]; 3]);
        let sample = PixelScanline::from_pixels(vec![[100, 100, 100, 255]; 3]);
        extract(&blank, &sample).unwrap()
    }

    #[test]
    fn csv_has_header_and_one_row_per_column() {
        let mut buf = Vec::new();
        write_csv(&sample_extraction(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "wavelength_nm,red,green,blue,total");
        assert!(lines[1].starts_with("400,"));
        assert!(lines[3].starts_with("600,"));
    }

    #[test]
    fn json_carries_series_and_scalar() {
        let extraction = sample_extraction();
        let mut buf = Vec::new();
        write_json(&extraction, &mut buf).unwrap();
        let doc: JsonValue = serde_json::from_slice(&buf).unwrap();

        assert_eq!(doc["wavelengths"], serde_json::json!([400, 500, 600]));
        assert_eq!(doc["total"].as_array().unwrap().len(), 3);
        let scalar = doc["scalar_absorbance"].as_f64().unwrap();
        assert!((scalar - extraction.scalar).abs() < 1e-12);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_file(&sample_extraction(), &dir.path().join("out.xlsx")).unwrap_err();
        assert!(err.to_string().contains("xlsx"));
        assert!(!dir.path().join("out.xlsx").exists());
    }

    #[test]
    fn export_file_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.CSV");
        export_file(&sample_extraction(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("wavelength_nm,"));
    }
}
