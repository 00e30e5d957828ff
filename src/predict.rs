//! Curve generation and single-day prediction queries.
//!
//! All queries are pure functions over an immutable [`ModelStore`]:
//! identical arguments give bit-identical output, and nothing here
//! mutates shared state, so callers may issue requests concurrently
//! without locking.

use crate::dataset::AttackType;
use crate::error::{DurarError, Result};
use crate::model::ModelStore;
use crate::tree::GradientBoostingRegressor;

/// Dosage assumed when a caller supplies none.
pub const DEFAULT_DOSAGE: f32 = 0.06;

/// Attack type assumed when a caller supplies none.
pub const DEFAULT_ATTACK: &str = "control";

/// Horizon in days assumed when a caller supplies none.
pub const DEFAULT_HORIZON_DAYS: u32 = 120;

/// Day step assumed when a caller supplies none.
pub const DEFAULT_STEP: u32 = 1;

/// Upper clamp for strength predictions, in MPa. The regressor is an
/// unconstrained extrapolator; far outside the calibration range it
/// can emit physically impossible values.
pub const STRENGTH_CEILING_MPA: f32 = 200.0;

/// Upper clamp for weight-loss predictions, in percent.
pub const WEIGHT_CEILING_PCT: f32 = 100.0;

/// Predicts a compressive-strength curve for one dosage and attack.
///
/// Days run `1, 1+step, …` up to and including `horizon_days` when the
/// grid lands on it. Values are clamped to `[0, 200]` MPa.
///
/// # Errors
///
/// Returns `UnknownAttack` for names outside the closed set (matched
/// case-insensitively) and `InvalidParameter` for a zero step or
/// horizon.
///
/// # Examples
///
/// ```
/// use durar::prelude::*;
///
/// let records = build_dataset();
/// let store = ModelStore::train(&records).unwrap();
/// let (days, mpa) = predict_strength_curve(&store, 0.06, "sulphate", 56, 7).unwrap();
/// assert_eq!(days.first(), Some(&1));
/// assert_eq!(days.last(), Some(&50));
/// assert!(mpa.iter().all(|v| (0.0..=200.0).contains(v)));
/// ```
pub fn predict_strength_curve(
    store: &ModelStore,
    dosage: f32,
    attack: &str,
    horizon_days: u32,
    step: u32,
) -> Result<(Vec<u32>, Vec<f32>)> {
    let attack = attack.parse::<AttackType>()?;
    let days = day_grid(horizon_days, step)?;
    let values = predict_series(
        store.strength_model(attack)?,
        dosage,
        &days,
        STRENGTH_CEILING_MPA,
    );
    Ok((days, values))
}

/// Predicts a mass-loss curve for one dosage and attack.
///
/// Same grid rules as [`predict_strength_curve`]; values are clamped
/// to `[0, 100]` percent.
///
/// # Errors
///
/// Returns `UnknownAttack` for names outside the closed set and
/// `InvalidParameter` for a zero step or horizon.
pub fn predict_weight_curve(
    store: &ModelStore,
    dosage: f32,
    attack: &str,
    horizon_days: u32,
    step: u32,
) -> Result<(Vec<u32>, Vec<f32>)> {
    let attack = attack.parse::<AttackType>()?;
    let days = day_grid(horizon_days, step)?;
    let values = predict_series(
        store.weight_model(attack)?,
        dosage,
        &days,
        WEIGHT_CEILING_PCT,
    );
    Ok((days, values))
}

/// Predicts strength at exactly one day, rounded to 2 decimals.
///
/// Shares the curve path (clamping and model lookup) on a one-day
/// grid; there is no separate single-point logic.
///
/// # Errors
///
/// Returns `UnknownAttack` for names outside the closed set and
/// `InvalidParameter` for day 0.
pub fn predict_point(store: &ModelStore, dosage: f32, day: u32, attack: &str) -> Result<f32> {
    let attack = attack.parse::<AttackType>()?;
    point_value(store.strength_model(attack)?, dosage, day, STRENGTH_CEILING_MPA)
}

/// Predicts strength and weight loss at exactly one day, each rounded
/// to 2 decimals.
///
/// # Errors
///
/// Returns `UnknownAttack` for names outside the closed set and
/// `InvalidParameter` for day 0.
pub fn predict_point_with_weight(
    store: &ModelStore,
    dosage: f32,
    day: u32,
    attack: &str,
) -> Result<(f32, f32)> {
    let attack = attack.parse::<AttackType>()?;
    let strength = point_value(store.strength_model(attack)?, dosage, day, STRENGTH_CEILING_MPA)?;
    let weight = point_value(store.weight_model(attack)?, dosage, day, WEIGHT_CEILING_PCT)?;
    Ok((strength, weight))
}

/// Percentage strength drop from the first to the last curve value,
/// rounded to 2 decimals.
///
/// Defined as 0.0 for curves with fewer than 2 points, and for curves
/// whose first value is 0 (a percentage drop from zero has no
/// meaning).
#[must_use]
pub fn decay_rate(strengths: &[f32]) -> f32 {
    if strengths.len() < 2 {
        return 0.0;
    }
    let first = strengths[0];
    let last = strengths[strengths.len() - 1];
    if first == 0.0 {
        return 0.0;
    }
    round2((first - last) / first * 100.0)
}

/// Builds the query day grid `1, 1+step, … ≤ horizon`.
fn day_grid(horizon_days: u32, step: u32) -> Result<Vec<u32>> {
    if step == 0 {
        return Err(DurarError::InvalidParameter {
            param: "step".to_string(),
            value: "0".to_string(),
            constraint: ">= 1".to_string(),
        });
    }
    if horizon_days == 0 {
        return Err(DurarError::InvalidParameter {
            param: "horizon_days".to_string(),
            value: "0".to_string(),
            constraint: ">= 1".to_string(),
        });
    }
    Ok((1..=horizon_days).step_by(step as usize).collect())
}

/// Evaluates one model over a day grid and clamps to `[0, ceiling]`.
fn predict_series(
    model: &GradientBoostingRegressor,
    dosage: f32,
    days: &[u32],
    ceiling: f32,
) -> Vec<f32> {
    days.iter()
        .map(|&day| model.predict_row(&[dosage, day as f32]).clamp(0.0, ceiling))
        .collect()
}

/// Single-day evaluation through the shared series path.
fn point_value(
    model: &GradientBoostingRegressor,
    dosage: f32,
    day: u32,
    ceiling: f32,
) -> Result<f32> {
    if day == 0 {
        return Err(DurarError::InvalidParameter {
            param: "day".to_string(),
            value: "0".to_string(),
            constraint: ">= 1".to_string(),
        });
    }
    let values = predict_series(model, dosage, &[day], ceiling);
    Ok(round2(values[0]))
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
