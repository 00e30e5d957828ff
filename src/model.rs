//! Per-attack model store: training, caching, lookup.
//!
//! Holds one strength regressor and one weight-loss regressor per
//! attack type. Built once at startup (`load_or_train`) and treated as
//! read-only afterwards; queries never mutate it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::dataset::{AttackType, CalibrationRecord};
use crate::error::{DurarError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use crate::tree::GradientBoostingRegressor;

/// File name of the cached strength bundle.
pub const STRENGTH_BUNDLE: &str = "models_strength.bin";

/// File name of the cached weight-loss bundle.
pub const WEIGHT_BUNDLE: &str = "models_weight.bin";

/// Environment variable overriding the cache directory.
pub const MODEL_DIR_ENV: &str = "DURAR_MODEL_DIR";

/// Default cache directory, relative to the working directory.
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Seed for strength models. Weight models use an independent seed so
/// the two target curves never share a subsampling stream.
const STRENGTH_SEED: u64 = 0;

/// Seed for weight-loss models.
const WEIGHT_SEED: u64 = 1;

/// Resolves the cache directory from `DURAR_MODEL_DIR`, falling back
/// to `./models`.
#[must_use]
pub fn cache_dir_from_env() -> PathBuf {
    std::env::var(MODEL_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_DIR))
}

/// One cached bundle is a map from attack type to fitted regressor.
type Bundle = BTreeMap<AttackType, GradientBoostingRegressor>;

/// A bundle missing any attack's model is unusable; rejecting it here
/// is what forces a full retrain instead of partial reuse.
fn validate_bundle(models: &Bundle, target: &str) -> Result<()> {
    for attack in AttackType::ALL {
        if !models.contains_key(&attack) {
            return Err(DurarError::Corrupt {
                message: format!("{target} bundle missing model for {attack}"),
            });
        }
    }
    Ok(())
}

/// Fitted per-attack regressors for strength and weight loss.
#[derive(Debug)]
pub struct ModelStore {
    strength: BTreeMap<AttackType, GradientBoostingRegressor>,
    weight: BTreeMap<AttackType, GradientBoostingRegressor>,
}

impl ModelStore {
    /// Trains all eight regressors from the calibration records.
    ///
    /// Each attack's strength and weight models are fit on that
    /// attack's rows only, with features `[dosage, day]`.
    ///
    /// # Errors
    ///
    /// Returns `DurarError::Training` if any attack has no records; no
    /// partial store is ever produced.
    pub fn train(records: &[CalibrationRecord]) -> Result<Self> {
        let mut strength = BTreeMap::new();
        let mut weight = BTreeMap::new();

        for attack in AttackType::ALL {
            let rows: Vec<&CalibrationRecord> =
                records.iter().filter(|r| r.attack == attack).collect();
            if rows.is_empty() {
                return Err(DurarError::Training {
                    message: format!("no calibration records for {attack}"),
                });
            }

            let mut features = Vec::with_capacity(rows.len() * 2);
            let mut strength_targets = Vec::with_capacity(rows.len());
            let mut weight_targets = Vec::with_capacity(rows.len());
            for record in &rows {
                features.push(record.dosage);
                features.push(record.day as f32);
                strength_targets.push(record.strength);
                weight_targets.push(record.weight_loss);
            }

            let x = Matrix::from_vec(rows.len(), 2, features)
                .map_err(|e| DurarError::Training {
                    message: format!("feature matrix for {attack}: {e}"),
                })?;

            let mut strength_model =
                GradientBoostingRegressor::new().with_random_state(STRENGTH_SEED);
            strength_model.fit(&x, &Vector::from_vec(strength_targets))?;

            let mut weight_model = GradientBoostingRegressor::new().with_random_state(WEIGHT_SEED);
            weight_model.fit(&x, &Vector::from_vec(weight_targets))?;

            strength.insert(attack, strength_model);
            weight.insert(attack, weight_model);
        }

        info!("trained strength and weight models for {} attack types", AttackType::ALL.len());
        Ok(Self { strength, weight })
    }

    /// Writes both bundles to `dir`, creating the directory if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or either
    /// bundle cannot be serialized or written.
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| DurarError::io(dir, e))?;
        write_bundle(&dir.join(STRENGTH_BUNDLE), &self.strength)?;
        write_bundle(&dir.join(WEIGHT_BUNDLE), &self.weight)?;
        info!("saved model bundles to {}", dir.display());
        Ok(())
    }

    /// Reads both bundles from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing, unreadable, fails
    /// to deserialize, or lacks any attack's model. Callers recover by
    /// retraining; partial reuse of one intact bundle is not allowed.
    pub fn load(dir: &Path) -> Result<Self> {
        let strength = read_bundle(&dir.join(STRENGTH_BUNDLE), "strength")?;
        let weight = read_bundle(&dir.join(WEIGHT_BUNDLE), "weight")?;
        Ok(Self { strength, weight })
    }

    /// Loads the store from the cache, or trains and caches it.
    ///
    /// Idempotent: with an intact cache this deserializes the same
    /// fitted behavior without retraining. Any load failure (missing
    /// file, corrupt bytes, incomplete bundle) regenerates BOTH
    /// bundles and overwrites the cache.
    ///
    /// # Errors
    ///
    /// Returns an error only if training fails or the fresh bundles
    /// cannot be written.
    pub fn load_or_train(dir: &Path, records: &[CalibrationRecord]) -> Result<Self> {
        match Self::load(dir) {
            Ok(store) => {
                info!("loaded model bundles from {}", dir.display());
                Ok(store)
            }
            Err(e) => {
                warn!("model cache unusable ({e}); retraining");
                let store = Self::train(records)?;
                store.save(dir)?;
                Ok(store)
            }
        }
    }

    /// Strength regressor for an attack type.
    ///
    /// # Errors
    ///
    /// Returns `DurarError::Corrupt` if the store lacks the model;
    /// this cannot happen for stores built by `train` or `load`.
    pub fn strength_model(&self, attack: AttackType) -> Result<&GradientBoostingRegressor> {
        self.strength.get(&attack).ok_or_else(|| DurarError::Corrupt {
            message: format!("strength model for {attack} not loaded"),
        })
    }

    /// Weight-loss regressor for an attack type.
    ///
    /// # Errors
    ///
    /// Returns `DurarError::Corrupt` if the store lacks the model.
    pub fn weight_model(&self, attack: AttackType) -> Result<&GradientBoostingRegressor> {
        self.weight.get(&attack).ok_or_else(|| DurarError::Corrupt {
            message: format!("weight model for {attack} not loaded"),
        })
    }
}

fn write_bundle(path: &Path, models: &Bundle) -> Result<()> {
    let bytes = bincode::serialize(models)
        .map_err(|e| DurarError::Serialization(format!("{}: {e}", path.display())))?;
    fs::write(path, bytes).map_err(|e| DurarError::io(path, e))
}

fn read_bundle(path: &Path, target: &str) -> Result<Bundle> {
    let bytes = fs::read(path).map_err(|e| DurarError::io(path, e))?;
    let models: Bundle = bincode::deserialize(&bytes)
        .map_err(|e| DurarError::Serialization(format!("{}: {e}", path.display())))?;
    validate_bundle(&models, target)?;
    Ok(models)
}
