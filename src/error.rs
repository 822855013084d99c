use thiserror::Error;

/// Failures of the numeric core. Every one of them is returned to the caller;
/// nothing here is recovered internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Regression needs at least one calibration point")]
    InsufficientData,

    #[error("Degenerate regression: {0}")]
    DegenerateRegression(String),

    #[error("No regression model has been fitted yet")]
    NoModel,
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
