//! Durar: concrete durability prediction engine.
//!
//! Predicts the time-evolution of compressive strength (MPa) and mass
//! loss (%) for concrete specimens under chemical attack (control,
//! sulphate, acid, chloride), parameterized by additive dosage and
//! elapsed days. Per-attack gradient-boosted regression ensembles are
//! fit to an embedded lab calibration table and cached on disk, then
//! queried for dense degradation curves and single-day lookups.
//!
//! # Quick Start
//!
//! ```
//! use durar::prelude::*;
//!
//! let records = build_dataset();
//! let store = ModelStore::train(&records).unwrap();
//!
//! // Dense strength curve for 6% dosage under sulphate attack
//! let (days, strengths) = predict_strength_curve(&store, 0.06, "sulphate", 120, 1).unwrap();
//! assert_eq!(days.first(), Some(&1));
//! assert_eq!(days.last(), Some(&120));
//!
//! // Single-day lookup against a lab measurement point
//! let mpa = predict_point(&store, 0.06, 28, "sulphate").unwrap();
//! assert!((mpa - 38.0).abs() <= 1.5);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Matrix and Vector containers
//! - [`traits`]: the `Estimator` fit/predict/score contract
//! - [`tree`]: CART regression trees and gradient boosting
//! - [`metrics`]: regression metrics (R², MSE, MAE)
//! - [`dataset`]: attack types and the embedded calibration table
//! - [`model`]: the per-attack model store and its disk cache
//! - [`predict`]: curve generation, point lookup, decay rate
//! - [`validation`]: self-consistency check against the lab table

pub mod dataset;
pub mod error;
pub mod metrics;
pub mod model;
pub mod predict;
pub mod primitives;
pub mod traits;
pub mod tree;
pub mod validation;

pub use error::{DurarError, Result};
pub use primitives::{Matrix, Vector};

/// Commonly used items.
pub mod prelude {
    pub use crate::dataset::{build_dataset, AttackType, CalibrationRecord};
    pub use crate::error::{DurarError, Result};
    pub use crate::model::ModelStore;
    pub use crate::predict::{
        decay_rate, predict_point, predict_point_with_weight, predict_strength_curve,
        predict_weight_curve,
    };
    pub use crate::primitives::{Matrix, Vector};
    pub use crate::traits::Estimator;
    pub use crate::tree::{DecisionTreeRegressor, GradientBoostingRegressor};
}
