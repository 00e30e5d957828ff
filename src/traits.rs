//! Core trait for supervised regressors.
//!
//! The model store and the curve generator depend only on this
//! contract, so the learning algorithm can be swapped without touching
//! either.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// Supervised regression estimator with sklearn-style fit/predict/score.
///
/// # Examples
///
/// ```
/// use durar::prelude::*;
///
/// // Strength at (dosage, day) feature pairs: y = 30 + 0.2 * day
/// let x = Matrix::from_vec(4, 2, vec![
///     0.06, 7.0,
///     0.06, 28.0,
///     0.06, 56.0,
///     0.06, 90.0,
/// ]).unwrap();
/// let y = Vector::from_slice(&[31.4, 35.6, 41.2, 48.0]);
///
/// let mut model = GradientBoostingRegressor::new();
/// model.fit(&x, &y).unwrap();
/// let r2 = model.score(&x, &y);
/// assert!(r2 > 0.99);
/// ```
pub trait Estimator {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (dimension mismatch, empty
    /// data, invalid hyperparameters).
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()>;

    /// Predicts target values for input data.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32>;

    /// Computes the R² coefficient of determination.
    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32 {
        crate::metrics::r_squared(&self.predict(x), y)
    }
}
