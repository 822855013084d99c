mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::RustyLambertApp;
use eframe::egui;
use rusty_lambert::data::loader::load_config;
use rusty_lambert::AnalysisConfig;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional first argument: path to a JSON analysis config.
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => load_config(&path).unwrap_or_else(|e| {
            log::error!("Ignoring config {}: {e:#}", path.display());
            AnalysisConfig::default()
        }),
        None => AnalysisConfig::default(),
    };
    log::info!(
        "Wavelength range {}–{} nm, intensity floor {:e}",
        config.wavelength_start_nm,
        config.wavelength_end_nm,
        config.intensity_floor
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Lambert – Absorbance Analyser",
        options,
        Box::new(|cc| {
            // Install image loaders so the blank/sample previews can render.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(RustyLambertApp::new(config)))
        }),
    )
}
