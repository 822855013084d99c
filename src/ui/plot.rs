use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use rusty_lambert::data::extract::absorbance_at_wavelengths;
use rusty_lambert::data::model::Extraction;
use rusty_lambert::data::regression::CalibrationStore;

use crate::color;
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 220.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render every chart. Each one is rebuilt from the current series on every
/// frame; nothing is retained between frames.
pub fn charts(ui: &mut Ui, state: &AppState) {
    match &state.extraction {
        Some(extraction) => {
            ui.strong("Absorbance per channel");
            channel_plot(ui, extraction);
            ui.strong("Total absorbance");
            total_plot(ui, extraction);
            ui.strong("Absorbance at major wavelengths");
            major_wavelength_chart(ui, extraction, &state.config.major_wavelengths);
        }
        None => {
            ui.label(RichText::new("Choose a blank and a sample image, then Analyze.").italics());
        }
    }

    ui.separator();
    ui.strong("Calibration curve");
    calibration_plot(ui, &state.calibration);
}

fn series_points(extraction: &Extraction, values: &[f64]) -> PlotPoints<'static> {
    extraction
        .wavelengths
        .as_slice()
        .iter()
        .zip(values)
        .map(|(&nm, &a)| [nm as f64, a])
        .collect()
}

fn channel_plot(ui: &mut Ui, extraction: &Extraction) {
    let s = &extraction.series;
    Plot::new("channel_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Wavelength (nm)")
        .y_axis_label("Absorbance")
        .show(ui, |plot_ui| {
            for (name, values, colour) in [
                ("Red Absorbance", &s.red, color::RED_SERIES),
                ("Green Absorbance", &s.green, color::GREEN_SERIES),
                ("Blue Absorbance", &s.blue, color::BLUE_SERIES),
            ] {
                let line = Line::new(series_points(extraction, values))
                    .name(name)
                    .color(colour)
                    .width(1.5);
                plot_ui.line(line);
            }
        });
}

fn total_plot(ui: &mut Ui, extraction: &Extraction) {
    Plot::new("total_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Wavelength (nm)")
        .y_axis_label("Absorbance")
        .show(ui, |plot_ui| {
            let line = Line::new(series_points(extraction, &extraction.series.total))
                .name("Total Absorbance")
                .color(color::TOTAL_SERIES)
                .width(1.5);
            plot_ui.line(line);
        });
}

fn major_wavelength_chart(ui: &mut Ui, extraction: &Extraction, wavelengths: &[u32]) {
    // Wavelengths the scanline never reaches are drawn as empty bars.
    let bars: Vec<Bar> = absorbance_at_wavelengths(extraction, wavelengths)
        .into_iter()
        .map(|(nm, value)| {
            Bar::new(nm as f64, value.unwrap_or(0.0))
                .width(40.0)
                .fill(color::wavelength_color(nm))
                .name(format!("{nm} nm"))
        })
        .collect();

    Plot::new("major_wavelength_chart")
        .height(PLOT_HEIGHT)
        .x_axis_label("Wavelength (nm)")
        .y_axis_label("Absorbance")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Absorbance at Major Wavelengths"));
        });
}

fn calibration_plot(ui: &mut Ui, calibration: &CalibrationStore) {
    let points: PlotPoints = calibration
        .points()
        .iter()
        .map(|p| [p.concentration, p.absorbance])
        .collect();
    let fit = calibration.regression_line_endpoints().ok();

    Plot::new("calibration_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Concentration")
        .y_axis_label("Absorbance")
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .name("Calibration Points")
                    .color(color::CALIBRATION_POINTS)
                    .radius(5.0),
            );
            if let Some(((x0, y0), (x1, y1))) = fit {
                plot_ui.line(
                    Line::new(PlotPoints::new(vec![[x0, y0], [x1, y1]]))
                        .name("Best Fit Line")
                        .color(color::FIT_LINE)
                        .width(2.0),
                );
            }
        });
}
