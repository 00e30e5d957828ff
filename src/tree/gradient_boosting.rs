//! Gradient boosting regressor.
//!
//! Sequential ensemble of shallow regression trees under squared-error
//! loss. Each round fits a tree to the current residuals and adds its
//! prediction scaled by the learning rate.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::DecisionTreeRegressor;
use crate::error::{DurarError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;

/// Gradient Boosting Regressor.
///
/// # Algorithm
///
/// 1. Initialize with the target mean
/// 2. For each boosting round:
///    - Compute residuals (negative gradient of squared error)
///    - Fit a shallow regression tree to the residuals
///    - Update predictions with `learning_rate` × tree prediction
/// 3. Final prediction = init + Σ `learning_rate` × `tree(x)`
///
/// With the default `subsample = 1.0` there is no stochastic step and
/// training is fully deterministic; `random_state` only matters when a
/// fraction of rows is drawn per round.
///
/// # Examples
///
/// ```
/// use durar::prelude::*;
///
/// let x = Matrix::from_vec(6, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
///
/// let mut model = GradientBoostingRegressor::new().with_random_state(0);
/// model.fit(&x, &y).unwrap();
/// assert!(model.score(&x, &y) > 0.99);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    /// Number of boosting rounds (trees).
    n_estimators: usize,
    /// Shrinkage applied to each tree's contribution.
    learning_rate: f32,
    /// Maximum depth of each tree.
    max_depth: usize,
    /// Fraction of rows drawn (without replacement) per round.
    subsample: f32,
    /// Seed for row subsampling; inert while `subsample == 1.0`.
    random_state: Option<u64>,
    /// Initial prediction (target mean).
    init_prediction: f32,
    /// Fitted ensemble.
    trees: Vec<DecisionTreeRegressor>,
}

impl GradientBoostingRegressor {
    /// Creates a regressor with the calibration defaults:
    /// 200 rounds, learning rate 0.1, depth 3, no subsampling.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: 200,
            learning_rate: 0.1,
            max_depth: 3,
            subsample: 1.0,
            random_state: None,
            init_prediction: 0.0,
            trees: Vec::new(),
        }
    }

    /// Sets the number of boosting rounds.
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the learning rate (shrinkage parameter).
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the maximum depth of each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the fraction of rows drawn per round, in (0, 1].
    #[must_use]
    pub fn with_subsample(mut self, subsample: f32) -> Self {
        self.subsample = subsample;
        self
    }

    /// Sets the seed for row subsampling.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Returns the number of fitted trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Returns the learning rate.
    #[must_use]
    pub const fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Returns the configured maximum tree depth.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the subsampling seed.
    #[must_use]
    pub const fn random_state(&self) -> Option<u64> {
        self.random_state
    }

    /// Returns the initial prediction (target mean after fitting).
    #[must_use]
    pub const fn init_prediction(&self) -> f32 {
        self.init_prediction
    }

    /// Predicts the value for a single feature row.
    ///
    /// # Panics
    ///
    /// Panics if called before `fit()`.
    #[must_use]
    pub fn predict_row(&self, row: &[f32]) -> f32 {
        assert!(!self.trees.is_empty(), "model not fitted, call fit() first");
        let mut value = self.init_prediction;
        for tree in &self.trees {
            value += self.learning_rate * tree.predict_row(row);
        }
        value
    }

    fn validate_params(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(DurarError::InvalidParameter {
                param: "n_estimators".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if self.learning_rate <= 0.0 {
            return Err(DurarError::InvalidParameter {
                param: "learning_rate".to_string(),
                value: self.learning_rate.to_string(),
                constraint: "> 0".to_string(),
            });
        }
        if self.subsample <= 0.0 || self.subsample > 1.0 {
            return Err(DurarError::InvalidParameter {
                param: "subsample".to_string(),
                value: self.subsample.to_string(),
                constraint: "in (0, 1]".to_string(),
            });
        }
        Ok(())
    }

    /// Draws the rows used for one boosting round.
    ///
    /// Indices are re-sorted after the draw so downstream summation
    /// order does not depend on shuffle order.
    fn sample_rows(&self, n_samples: usize, round: usize) -> Vec<usize> {
        let k = ((self.subsample * n_samples as f32).round() as usize).clamp(1, n_samples);
        let mut rows: Vec<usize> = (0..n_samples).collect();

        if let Some(seed) = self.random_state {
            let mut rng = StdRng::seed_from_u64(seed + round as u64);
            rows.shuffle(&mut rng);
        } else {
            rows.shuffle(&mut rand::thread_rng());
        }

        rows.truncate(k);
        rows.sort_unstable();
        rows
    }
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for GradientBoostingRegressor {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        self.validate_params()?;

        let (n_samples, _) = x.shape();
        if n_samples != y.len() {
            return Err(DurarError::dimension_mismatch("x rows", n_samples, y.len()));
        }
        if n_samples == 0 {
            return Err(DurarError::Training {
                message: "cannot fit with zero samples".to_string(),
            });
        }

        self.init_prediction = y.mean();
        let mut current = vec![self.init_prediction; n_samples];
        self.trees = Vec::with_capacity(self.n_estimators);

        let use_subsampling = self.subsample < 1.0;

        for round in 0..self.n_estimators {
            let residuals: Vec<f32> = y
                .as_slice()
                .iter()
                .zip(current.iter())
                .map(|(&yi, &pi)| yi - pi)
                .collect();

            let mut tree = DecisionTreeRegressor::new().with_max_depth(self.max_depth);
            if use_subsampling {
                let rows = self.sample_rows(n_samples, round);
                let sub_x = x.select_rows(&rows);
                let sub_y: Vec<f32> = rows.iter().map(|&r| residuals[r]).collect();
                tree.fit(&sub_x, &Vector::from_vec(sub_y))?;
            } else {
                tree.fit(x, &Vector::from_vec(residuals))?;
            }

            // Update running predictions on the full sample set.
            for row in 0..n_samples {
                current[row] += self.learning_rate * tree.predict_row(x.row(row));
            }

            self.trees.push(tree);
        }

        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let n_samples = x.n_rows();
        let mut predictions = Vec::with_capacity(n_samples);
        for row in 0..n_samples {
            predictions.push(self.predict_row(x.row(row)));
        }
        Vector::from_vec(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data() -> (Matrix<f32>, Vector<f32>) {
        let x = Matrix::from_vec(8, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0])
            .expect("matrix");
        let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0, 11.0, 13.0, 15.0, 17.0]);
        (x, y)
    }

    #[test]
    fn defaults_match_calibration_settings() {
        let model = GradientBoostingRegressor::new();
        assert_eq!(model.n_estimators, 200);
        assert!((model.learning_rate() - 0.1).abs() < 1e-9);
        assert_eq!(model.max_depth(), 3);
        assert!((model.subsample - 1.0).abs() < 1e-9);
        assert!(model.random_state().is_none());
        assert_eq!(model.n_trees(), 0);
    }

    #[test]
    fn fit_drives_training_error_down() {
        let (x, y) = linear_data();
        let mut model = GradientBoostingRegressor::new();
        model.fit(&x, &y).expect("fit should succeed");

        assert_eq!(model.n_trees(), 200);
        let preds = model.predict(&x);
        for (pred, actual) in preds.as_slice().iter().zip(y.as_slice()) {
            assert!(
                (pred - actual).abs() < 0.1,
                "prediction {pred} too far from {actual}"
            );
        }
    }

    #[test]
    fn constant_targets_are_reproduced() {
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("matrix");
        let y = Vector::from_slice(&[0.0, 0.0, 0.0, 0.0]);
        let mut model = GradientBoostingRegressor::new();
        model.fit(&x, &y).expect("fit should succeed");

        // Mean of zeros is exactly zero and every residual tree is a zero leaf.
        assert_eq!(model.predict_row(&[2.5]), 0.0);
        assert_eq!(model.predict_row(&[500.0]), 0.0);
    }

    #[test]
    fn two_fits_agree_bitwise() {
        let (x, y) = linear_data();
        let mut a = GradientBoostingRegressor::new();
        let mut b = GradientBoostingRegressor::new();
        a.fit(&x, &y).expect("fit should succeed");
        b.fit(&x, &y).expect("fit should succeed");

        let pa = a.predict(&x);
        let pb = b.predict(&x);
        for (va, vb) in pa.as_slice().iter().zip(pb.as_slice()) {
            assert_eq!(va.to_bits(), vb.to_bits());
        }
    }

    #[test]
    fn subsampled_fit_is_reproducible_with_seed() {
        let (x, y) = linear_data();
        let mut a = GradientBoostingRegressor::new()
            .with_n_estimators(50)
            .with_subsample(0.75)
            .with_random_state(42);
        let mut b = a.clone();
        a.fit(&x, &y).expect("fit should succeed");
        b.fit(&x, &y).expect("fit should succeed");

        let pa = a.predict(&x);
        let pb = b.predict(&x);
        for (va, vb) in pa.as_slice().iter().zip(pb.as_slice()) {
            assert_eq!(va.to_bits(), vb.to_bits());
        }
    }

    #[test]
    fn zero_estimators_is_rejected() {
        let (x, y) = linear_data();
        let mut model = GradientBoostingRegressor::new().with_n_estimators(0);
        assert!(matches!(
            model.fit(&x, &y),
            Err(DurarError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn bad_subsample_is_rejected() {
        let (x, y) = linear_data();
        let mut model = GradientBoostingRegressor::new().with_subsample(1.5);
        assert!(matches!(
            model.fit(&x, &y),
            Err(DurarError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let x = Matrix::from_vec(2, 1, vec![1.0, 2.0]).expect("matrix");
        let y = Vector::from_slice(&[1.0]);
        let mut model = GradientBoostingRegressor::new();
        assert!(matches!(
            model.fit(&x, &y),
            Err(DurarError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn serde_round_trip_is_bit_identical() {
        let (x, y) = linear_data();
        let mut model = GradientBoostingRegressor::new().with_n_estimators(50);
        model.fit(&x, &y).expect("fit should succeed");

        let bytes = bincode::serialize(&model).expect("serialize");
        let loaded: GradientBoostingRegressor = bincode::deserialize(&bytes).expect("deserialize");

        let probe = Matrix::from_vec(3, 1, vec![0.5, 4.5, 100.0]).expect("matrix");
        let before = model.predict(&probe);
        let after = loaded.predict(&probe);
        for (va, vb) in before.as_slice().iter().zip(after.as_slice()) {
            assert_eq!(va.to_bits(), vb.to_bits());
        }
    }

    #[test]
    #[should_panic(expected = "not fitted")]
    fn predict_before_fit_panics() {
        let model = GradientBoostingRegressor::new();
        let _ = model.predict_row(&[1.0]);
    }
}
