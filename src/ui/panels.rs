use std::path::{Path, PathBuf};

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – images, calibration, prediction
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Images");
            ui.separator();
            image_picker(ui, "Blank", &mut state.blank_path);
            image_picker(ui, "Sample", &mut state.sample_path);

            ui.horizontal(|ui: &mut Ui| {
                if ui
                    .add_enabled(state.can_analyze(), egui::Button::new("Analyze"))
                    .clicked()
                {
                    state.start_analysis();
                }
                if state.is_loading() {
                    ui.spinner();
                }
            });

            ui.add_space(8.0);
            ui.heading("Calibration");
            ui.separator();
            calibration_form(ui, state);

            ui.add_space(8.0);
            ui.heading("Prediction");
            ui.separator();
            prediction_form(ui, state);
        });
}

fn image_picker(ui: &mut Ui, label: &str, path: &mut Option<PathBuf>) {
    ui.horizontal(|ui: &mut Ui| {
        if ui.button(format!("{label}…")).clicked() {
            if let Some(picked) = pick_image(label) {
                *path = Some(picked);
            }
        }
        match path.as_deref() {
            Some(p) => ui.label(file_name(p)),
            None => ui.label(RichText::new("not selected").weak()),
        };
    });

    if let Some(p) = path.as_deref() {
        ui.add(
            egui::Image::new(format!("file://{}", p.display()))
                .max_width(ui.available_width())
                .max_height(120.0),
        );
    }
}

fn calibration_form(ui: &mut Ui, state: &mut AppState) {
    egui::Grid::new("calibration_form")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Concentration");
            ui.text_edit_singleline(&mut state.concentration_input);
            ui.end_row();

            ui.label("Absorbance");
            ui.text_edit_singleline(&mut state.absorbance_input);
            ui.end_row();
        });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Add point").clicked() {
            state.submit_calibration_point();
        }
        if ui.button("Load defaults").clicked() {
            state.load_default_calibration();
        }
    });

    ui.label(format!("{} points", state.calibration.len()));
    match state.calibration.model() {
        Some(model) => ui.label(RichText::new(model.to_string()).monospace()),
        None => ui.label(RichText::new("No fit yet").weak()),
    };
}

fn prediction_form(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Absorbance");
        ui.text_edit_singleline(&mut state.predict_input);
    });
    if ui.button("Predict").clicked() {
        state.predict_concentration();
    }
    if let Some(c) = state.prediction {
        ui.strong(format!("Predicted Concentration: {c:.3}"));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open blank…").clicked() {
                if let Some(p) = pick_image("Blank") {
                    state.blank_path = Some(p);
                }
                ui.close_menu();
            }
            if ui.button("Open sample…").clicked() {
                if let Some(p) = pick_image("Sample") {
                    state.sample_path = Some(p);
                }
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(state.extraction.is_some(), egui::Button::new("Export results…"))
                .clicked()
            {
                if let Some(p) = pick_export_path() {
                    state.export_results(&p);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(extraction) = &state.extraction {
            ui.label(format!("Final Absorbance: {:.3}", extraction.scalar));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn pick_image(label: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(format!("Open {} image", label.to_lowercase()))
        .add_filter("Images", &["png", "jpg", "jpeg"])
        .pick_file()
}

fn pick_export_path() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Export absorbance")
        .set_file_name("absorbance.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
