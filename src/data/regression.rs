use log::{debug, info};

use crate::error::{AnalysisError, Result};

use super::model::{CalibrationPoint, RegressionModel, DEFAULT_CALIBRATION};

// ---------------------------------------------------------------------------
// CalibrationStore – accumulated points plus the current fit
// ---------------------------------------------------------------------------

/// Owns the calibration points and the line fitted through them.
///
/// Points are append-only. The model is refitted from scratch on every
/// insertion; once a fit has succeeded there is always a model.
///
/// The store is not synchronised. A multi-threaded host must put it behind a
/// single lock so `add_point`, `fit` and `predict` see one consistent
/// collection.
#[derive(Debug, Clone, Default)]
pub struct CalibrationStore {
    concentrations: Vec<f64>,
    absorbances: Vec<f64>,
    model: Option<RegressionModel>,
}

impl CalibrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one point and refit.
    ///
    /// The point is kept even when the refit fails (for instance while only
    /// one distinct concentration has been entered); the previous model, if
    /// any, stays current and the fit error is returned.
    pub fn add_point(&mut self, concentration: f64, absorbance: f64) -> Result<RegressionModel> {
        validate_point(concentration, absorbance)?;
        self.concentrations.push(concentration);
        self.absorbances.push(absorbance);
        debug!("Added calibration point ({concentration}, {absorbance})");
        self.refit()
    }

    /// Append a whole seed collection and refit once. Nothing is appended if
    /// any point is invalid.
    pub fn load_defaults(&mut self, points: &[CalibrationPoint]) -> Result<RegressionModel> {
        for p in points {
            validate_point(p.concentration, p.absorbance)?;
        }
        for p in points {
            self.concentrations.push(p.concentration);
            self.absorbances.push(p.absorbance);
        }
        info!("Loaded {} default calibration points", points.len());
        self.refit()
    }

    /// Append [`DEFAULT_CALIBRATION`] and refit.
    pub fn load_builtin_defaults(&mut self) -> Result<RegressionModel> {
        self.load_defaults(&DEFAULT_CALIBRATION)
    }

    /// Ordinary least squares over every stored point.
    pub fn fit(&self) -> Result<RegressionModel> {
        fit_line(&self.concentrations, &self.absorbances)
    }

    /// Invert the current line: `concentration = (absorbance - intercept) / slope`.
    pub fn predict(&self, absorbance: f64) -> Result<f64> {
        if !absorbance.is_finite() {
            return Err(AnalysisError::InvalidInput(format!(
                "absorbance {absorbance} is not a finite number"
            )));
        }
        let model = self.model.ok_or(AnalysisError::NoModel)?;
        if model.slope == 0.0 {
            return Err(AnalysisError::DegenerateRegression(
                "fitted slope is zero, concentration is undetermined".to_string(),
            ));
        }
        Ok((absorbance - model.intercept) / model.slope)
    }

    /// End points of the current line over the stored concentration range.
    pub fn regression_line_endpoints(&self) -> Result<((f64, f64), (f64, f64))> {
        let model = self.model.ok_or(AnalysisError::NoModel)?;
        regression_line_endpoints(&model, &self.concentrations)
    }

    pub fn model(&self) -> Option<RegressionModel> {
        self.model
    }

    /// Stored points in insertion order.
    pub fn points(&self) -> Vec<CalibrationPoint> {
        self.concentrations
            .iter()
            .zip(&self.absorbances)
            .map(|(&c, &a)| CalibrationPoint::new(c, a))
            .collect()
    }

    pub fn concentrations(&self) -> &[f64] {
        &self.concentrations
    }

    pub fn len(&self) -> usize {
        self.concentrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concentrations.is_empty()
    }

    fn refit(&mut self) -> Result<RegressionModel> {
        let model = self.fit()?;
        info!("Calibration refitted over {} points: {model}", self.len());
        self.model = Some(model);
        Ok(model)
    }
}

fn validate_point(concentration: f64, absorbance: f64) -> Result<()> {
    if !concentration.is_finite() || !absorbance.is_finite() {
        return Err(AnalysisError::InvalidInput(format!(
            "calibration point ({concentration}, {absorbance}) is not finite"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Closed-form least-squares line through `(x[i], y[i])`.
///
/// `x` and `y` must have equal length. Fails on an empty input and when all
/// `x` are identical, where the normal equations have no unique solution.
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<RegressionModel> {
    if x.len() != y.len() {
        return Err(AnalysisError::InvalidInput(format!(
            "{} concentrations but {} absorbances",
            x.len(),
            y.len()
        )));
    }
    if x.is_empty() {
        return Err(AnalysisError::InsufficientData);
    }

    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();

    // Zero exactly when every x is the same, but rounding can leave a tiny
    // residue there, so identical x values are checked directly.
    let denom = n * sum_x2 - sum_x * sum_x;
    let all_equal = x.iter().all(|&v| v == x[0]);
    if all_equal || denom == 0.0 {
        return Err(AnalysisError::DegenerateRegression(
            "all concentrations are identical".to_string(),
        ));
    }

    // A flat line; the sums would leave a ~1e-16 slope instead of zero.
    if y.iter().all(|&v| v == y[0]) {
        return Ok(RegressionModel {
            slope: 0.0,
            intercept: y[0],
        });
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;
    Ok(RegressionModel { slope, intercept })
}

/// `(minX, line(minX))` and `(maxX, line(maxX))` over the given concentrations.
pub fn regression_line_endpoints(
    model: &RegressionModel,
    concentrations: &[f64],
) -> Result<((f64, f64), (f64, f64))> {
    if concentrations.is_empty() {
        return Err(AnalysisError::InsufficientData);
    }
    let min_x = concentrations.iter().copied().fold(f64::INFINITY, f64::min);
    let max_x = concentrations
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    Ok((
        (min_x, model.absorbance_at(min_x)),
        (max_x, model.absorbance_at(max_x)),
    ))
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    #[test]
    fn seeded_store_fits_half_slope() {
        let mut store = CalibrationStore::new();
        let model = store.load_builtin_defaults().unwrap();

        assert_eq!(store.len(), 5);
        assert_relative_eq!(model.slope, 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(model.intercept, 0.0, epsilon = 1e-9);
        assert_relative_eq!(store.predict(0.25).unwrap(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn exact_line_is_recovered() {
        let (m, b) = (-1.75, 0.3);
        let mut store = CalibrationStore::new();
        for x in [0.0, 0.5, 1.0, 2.0, 3.5, 10.0] {
            let _ = store.add_point(x, m * x + b);
        }

        let model = store.model().unwrap();
        assert_relative_eq!(model.slope, m, epsilon = 1e-9);
        assert_relative_eq!(model.intercept, b, epsilon = 1e-9);
        for x0 in [-4.0, 0.0, 0.33, 7.0] {
            assert_relative_eq!(store.predict(m * x0 + b).unwrap(), x0, epsilon = 1e-9);
        }
    }

    #[test]
    fn empty_fit_is_insufficient() {
        let store = CalibrationStore::new();
        assert_eq!(store.fit(), Err(AnalysisError::InsufficientData));
    }

    #[test]
    fn identical_concentrations_are_degenerate() {
        assert!(matches!(
            fit_line(&[0.4, 0.4, 0.4], &[0.1, 0.2, 0.3]),
            Err(AnalysisError::DegenerateRegression(_))
        ));
    }

    #[test]
    fn first_point_is_kept_without_a_model() {
        let mut store = CalibrationStore::new();
        let first = store.add_point(1.0, 0.5);

        assert!(matches!(first, Err(AnalysisError::DegenerateRegression(_))));
        assert_eq!(store.len(), 1);
        assert_eq!(store.model(), None);
        assert_eq!(store.predict(0.5), Err(AnalysisError::NoModel));

        let model = store.add_point(3.0, 1.5).unwrap();
        assert_relative_eq!(model.slope, 0.5, epsilon = 1e-12);
        assert_eq!(store.model(), Some(model));
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let mut store = CalibrationStore::new();
        assert!(matches!(
            store.add_point(f64::NAN, 0.1),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(matches!(
            store.add_point(0.1, f64::INFINITY),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn bad_seed_appends_nothing() {
        let mut store = CalibrationStore::new();
        let seed = [CalibrationPoint::new(0.1, 0.1), CalibrationPoint::new(f64::NAN, 0.2)];
        assert!(store.load_defaults(&seed).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn predict_before_fit_has_no_model() {
        let store = CalibrationStore::new();
        assert_eq!(store.predict(0.2), Err(AnalysisError::NoModel));
    }

    #[test]
    fn flat_fit_cannot_predict() {
        let mut store = CalibrationStore::new();
        store.add_point(0.0, 0.3).unwrap_err();
        let model = store.add_point(1.0, 0.3).unwrap();
        assert_eq!(model.slope, 0.0);
        assert!(matches!(
            store.predict(0.3),
            Err(AnalysisError::DegenerateRegression(_))
        ));
    }

    #[test]
    fn constant_absorbance_fits_exactly_flat() {
        let model = fit_line(&[0.1, 0.3, 0.5], &[0.3, 0.3, 0.3]).unwrap();
        assert_eq!(model.slope, 0.0);
        assert_eq!(model.intercept, 0.3);

        let model = fit_line(&[0.3, 0.6, 0.9, 1.7], &[0.1; 4]).unwrap();
        assert_eq!(model.slope, 0.0);
    }

    #[test]
    fn constant_absorbance_cannot_predict() {
        let mut store = CalibrationStore::new();
        let _ = store.add_point(0.1, 0.3);
        store.add_point(0.3, 0.3).unwrap();
        store.add_point(0.5, 0.3).unwrap();
        assert!(matches!(
            store.predict(0.3),
            Err(AnalysisError::DegenerateRegression(_))
        ));
    }

    #[test]
    fn endpoints_span_concentration_range() {
        let mut store = CalibrationStore::new();
        store.load_builtin_defaults().unwrap();
        store.add_point(0.05, 0.03).unwrap();

        let ((x0, y0), (x1, y1)) = store.regression_line_endpoints().unwrap();
        let model = store.model().unwrap();
        assert_eq!(x0, 0.05);
        assert_eq!(x1, 0.9);
        assert_relative_eq!(y0, model.absorbance_at(0.05));
        assert_relative_eq!(y1, model.absorbance_at(0.9));
    }

    #[test]
    fn endpoints_need_points() {
        let model = RegressionModel {
            slope: 1.0,
            intercept: 0.0,
        };
        assert_eq!(
            regression_line_endpoints(&model, &[]),
            Err(AnalysisError::InsufficientData)
        );
    }

    #[test]
    fn points_keep_insertion_order() {
        let mut store = CalibrationStore::new();
        let _ = store.add_point(0.9, 0.4);
        let _ = store.add_point(0.1, 0.1);
        let points = store.points();
        assert_eq!(points[0], CalibrationPoint::new(0.9, 0.4));
        assert_eq!(points[1], CalibrationPoint::new(0.1, 0.1));
    }
}
