//! Offline self-consistency check against the lab table.
//!
//! Compares `predict_point` output with every calibration record. The
//! calibration table doubles as the validation set, so this is a fit
//! quality floor, not held-out validation.

use std::fs;
use std::path::Path;

use crate::dataset::{AttackType, CalibrationRecord};
use crate::error::{DurarError, Result};
use crate::model::ModelStore;
use crate::predict::predict_point;

/// Absolute strength error allowed per record, in MPa.
pub const STRENGTH_TOLERANCE_MPA: f32 = 1.5;

/// Comparison of one lab record against the model's prediction.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRow {
    /// Exposure environment.
    pub attack: AttackType,
    /// Additive dosage fraction.
    pub dosage: f32,
    /// Measurement day.
    pub day: u32,
    /// Lab-measured strength, MPa.
    pub lab_strength: f32,
    /// Model-predicted strength, MPa.
    pub predicted: f32,
    /// Absolute error, MPa.
    pub error: f32,
    /// True when the error is within tolerance.
    pub pass: bool,
}

impl ValidationRow {
    /// One-line report entry in the `PASS attack GO=… day=…` format.
    #[must_use]
    pub fn report_line(&self) -> String {
        format!(
            "{} {} GO={:.2} day={}: predicted {:.2} vs lab {:.2} (err={:.2})",
            if self.pass { "PASS" } else { "FAIL" },
            self.attack,
            self.dosage,
            self.day,
            self.predicted,
            self.lab_strength,
            self.error,
        )
    }
}

/// Runs `predict_point` against every calibration record.
///
/// Row order follows the dataset order (attack-major, dosage, day).
///
/// # Errors
///
/// Returns an error if any prediction query fails; with a store built
/// from the same dataset this indicates a programming defect, not bad
/// input.
pub fn validate_against_lab(
    store: &ModelStore,
    records: &[CalibrationRecord],
) -> Result<Vec<ValidationRow>> {
    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        let predicted = predict_point(store, record.dosage, record.day, record.attack.as_str())?;
        let error = (predicted - record.strength).abs();
        rows.push(ValidationRow {
            attack: record.attack,
            dosage: record.dosage,
            day: record.day,
            lab_strength: record.strength,
            predicted,
            error,
            pass: error <= STRENGTH_TOLERANCE_MPA,
        });
    }

    Ok(rows)
}

/// Number of failing rows.
#[must_use]
pub fn count_failures(rows: &[ValidationRow]) -> usize {
    rows.iter().filter(|r| !r.pass).count()
}

/// Writes the tabular report as CSV.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_csv_report(rows: &[ValidationRow], path: &Path) -> Result<()> {
    let mut out = String::from("attack,dosage,day,lab_strength,pred_strength,error,status\n");
    for row in rows {
        out.push_str(&format!(
            "{},{:.2},{},{:.2},{:.2},{:.2},{}\n",
            row.attack,
            row.dosage,
            row.day,
            row.lab_strength,
            row.predicted,
            row.error,
            if row.pass { "PASS" } else { "FAIL" },
        ));
    }
    fs::write(path, out).map_err(|e| DurarError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::build_dataset;

    #[test]
    fn every_record_is_compared() {
        let records = build_dataset();
        let store = ModelStore::train(&records).expect("training should succeed");
        let rows = validate_against_lab(&store, &records).expect("validation");

        assert_eq!(rows.len(), records.len());
        for (row, record) in rows.iter().zip(&records) {
            assert_eq!(row.attack, record.attack);
            assert_eq!(row.day, record.day);
        }
    }

    #[test]
    fn report_line_format() {
        let row = ValidationRow {
            attack: AttackType::Sulphate,
            dosage: 0.06,
            day: 28,
            lab_strength: 38.0,
            predicted: 38.0,
            error: 0.0,
            pass: true,
        };
        let line = row.report_line();
        assert!(line.starts_with("PASS sulphate GO=0.06 day=28"));
        assert!(line.contains("38.00"));
    }

    #[test]
    fn count_failures_counts_only_failures() {
        let pass = ValidationRow {
            attack: AttackType::Control,
            dosage: 0.0,
            day: 7,
            lab_strength: 26.53,
            predicted: 26.53,
            error: 0.0,
            pass: true,
        };
        let fail = ValidationRow {
            pass: false,
            error: 9.9,
            ..pass
        };
        assert_eq!(count_failures(&[pass, fail, pass]), 1);
    }
}
