//! Per-pixel optical absorbance from a blank/sample image pair, plus a
//! least-squares calibration curve for turning absorbance into concentration.
//!
//! The numeric core lives in [`data::extract`] and [`data::regression`];
//! [`data::loader`] and [`data::export`] are the file-system edges around it.

pub mod config;
pub mod data;
pub mod error;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
