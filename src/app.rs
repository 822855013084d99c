use std::time::Duration;

use eframe::egui;

use rusty_lambert::AnalysisConfig;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyLambertApp {
    pub state: AppState,
}

impl RustyLambertApp {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for RustyLambertApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep repainting while a background analysis is running.
        if self.state.poll_analysis() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: images, calibration, prediction ----
        egui::SidePanel::left("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                plot::charts(ui, &self.state);
            });
        });
    }
}
