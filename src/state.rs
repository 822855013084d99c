use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use rusty_lambert::data::export::export_file;
use rusty_lambert::data::loader::analyze_files;
use rusty_lambert::data::model::Extraction;
use rusty_lambert::data::regression::CalibrationStore;
use rusty_lambert::{AnalysisConfig, AnalysisError};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AnalysisConfig,

    /// Reference (zero concentration) image.
    pub blank_path: Option<PathBuf>,

    /// Image of the sample under test.
    pub sample_path: Option<PathBuf>,

    /// Result of the last successful analysis.
    pub extraction: Option<Extraction>,

    /// Calibration points and the fitted line.
    pub calibration: CalibrationStore,

    /// Raw text of the calibration and prediction form fields.
    pub concentration_input: String,
    pub absorbance_input: String,
    pub predict_input: String,

    /// Last predicted concentration.
    pub prediction: Option<f64>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Background decode + extract job, if one is running.
    pending: Option<Receiver<anyhow::Result<Extraction>>>,
}

impl AppState {
    /// Fresh state seeded with the built-in calibration curve.
    pub fn new(config: AnalysisConfig) -> Self {
        let mut calibration = CalibrationStore::new();
        if let Err(e) = calibration.load_builtin_defaults() {
            log::error!("Failed to seed calibration: {e}");
        }
        Self {
            config,
            blank_path: None,
            sample_path: None,
            extraction: None,
            calibration,
            concentration_input: String::new(),
            absorbance_input: String::new(),
            predict_input: String::new(),
            prediction: None,
            status_message: None,
            pending: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn can_analyze(&self) -> bool {
        self.blank_path.is_some() && self.sample_path.is_some() && !self.is_loading()
    }

    /// Decode both images and extract absorbance on a worker thread.
    pub fn start_analysis(&mut self) {
        let (Some(blank), Some(sample)) = (self.blank_path.clone(), self.sample_path.clone())
        else {
            self.status_message = Some("Please choose both blank and sample images.".into());
            return;
        };

        let (tx, rx) = mpsc::channel();
        let config = self.config.clone();
        thread::spawn(move || {
            // The receiver may be gone if the app closed meanwhile.
            let _ = tx.send(analyze_files(&blank, &sample, &config));
        });

        self.pending = Some(rx);
        self.status_message = None;
    }

    /// Collect the worker's result if it has finished. Returns `true` while
    /// the job is still running.
    pub fn poll_analysis(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        match rx.try_recv() {
            Ok(Ok(extraction)) => {
                self.predict_input = format!("{:.3}", extraction.scalar);
                self.extraction = Some(extraction);
                self.status_message = None;
            }
            Ok(Err(e)) => {
                log::error!("Analysis failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => {
                log::error!("Analysis worker exited without a result");
                self.status_message = Some("Error: analysis worker stopped".into());
            }
        }
        self.pending = None;
        false
    }

    /// Parse the calibration form and add the point to the store.
    pub fn submit_calibration_point(&mut self) {
        let parsed = (
            parse_number(&self.concentration_input),
            parse_number(&self.absorbance_input),
        );
        let (Some(concentration), Some(absorbance)) = parsed else {
            self.status_message = Some("Please enter a numeric concentration and absorbance.".into());
            return;
        };

        let before = self.calibration.len();
        let result = self.calibration.add_point(concentration, absorbance);
        if self.calibration.len() > before {
            self.concentration_input.clear();
            self.absorbance_input.clear();
        }
        self.status_message = match result {
            Ok(_) => None,
            Err(AnalysisError::DegenerateRegression(_)) => {
                Some("Point added; at least two distinct concentrations are needed for a fit.".into())
            }
            Err(e) => Some(format!("Error: {e}")),
        };
    }

    pub fn load_default_calibration(&mut self) {
        if let Err(e) = self.calibration.load_builtin_defaults() {
            self.status_message = Some(format!("Error: {e}"));
        }
    }

    pub fn predict_concentration(&mut self) {
        self.prediction = None;
        let Some(absorbance) = parse_number(&self.predict_input) else {
            self.status_message = Some("Please enter a valid absorbance.".into());
            return;
        };
        match self.calibration.predict(absorbance) {
            Ok(c) => {
                log::info!("Predicted concentration {c:.3} for absorbance {absorbance}");
                self.prediction = Some(c);
                self.status_message = None;
            }
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    pub fn export_results(&mut self, path: &Path) {
        let Some(extraction) = &self.extraction else {
            return;
        };
        match export_file(extraction, path) {
            Ok(()) => log::info!("Exported results to {}", path.display()),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_seeded_model() {
        let state = AppState::new(AnalysisConfig::default());
        assert_eq!(state.calibration.len(), 5);
        assert!(state.calibration.model().is_some());
        assert!(!state.can_analyze());
    }

    #[test]
    fn form_submission_clears_inputs() {
        let mut state = AppState::new(AnalysisConfig::default());
        state.concentration_input = " 1.1 ".into();
        state.absorbance_input = "0.55".into();
        state.submit_calibration_point();

        assert_eq!(state.calibration.len(), 6);
        assert!(state.concentration_input.is_empty());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn non_numeric_input_keeps_form() {
        let mut state = AppState::new(AnalysisConfig::default());
        state.concentration_input = "abc".into();
        state.absorbance_input = "0.2".into();
        state.submit_calibration_point();

        assert_eq!(state.calibration.len(), 5);
        assert_eq!(state.concentration_input, "abc");
        assert!(state.status_message.is_some());
    }

    #[test]
    fn prediction_uses_seed_curve() {
        let mut state = AppState::new(AnalysisConfig::default());
        state.predict_input = "0.25".into();
        state.predict_concentration();
        let c = state.prediction.unwrap();
        assert!((c - 0.5).abs() < 1e-9);
    }

    #[test]
    fn analysis_without_images_reports_status() {
        let mut state = AppState::new(AnalysisConfig::default());
        state.start_analysis();
        assert!(!state.is_loading());
        assert!(state.status_message.is_some());
    }
}
