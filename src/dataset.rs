//! Embedded lab calibration data.
//!
//! Compressive strength (MPa) and cumulative mass loss (%) measured at
//! days 7/28/56 for six additive dosages under four exposure
//! environments. The table is a compile-time constant; `build_dataset`
//! assembles the same 72 records in the same order on every call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DurarError;

/// Dosage fractions present in the calibration data.
pub const DOSAGE_LEVELS: [f32; 6] = [0.00, 0.02, 0.04, 0.06, 0.08, 0.10];

/// Exposure days at which specimens were measured.
pub const LAB_DAYS: [u32; 3] = [7, 28, 56];

/// Chemical exposure environment of a specimen. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttackType {
    /// No attack; reference curing conditions.
    Control,
    /// Sulphate solution exposure.
    Sulphate,
    /// Acid solution exposure.
    Acid,
    /// Chloride solution exposure.
    Chloride,
}

impl AttackType {
    /// All attack types, in dataset order.
    pub const ALL: [AttackType; 4] = [
        AttackType::Control,
        AttackType::Sulphate,
        AttackType::Acid,
        AttackType::Chloride,
    ];

    /// Lowercase name used in queries and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AttackType::Control => "control",
            AttackType::Sulphate => "sulphate",
            AttackType::Acid => "acid",
            AttackType::Chloride => "chloride",
        }
    }
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttackType {
    type Err = DurarError;

    /// Case-insensitive lookup; unknown names are an error, never a
    /// silent default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "control" => Ok(AttackType::Control),
            "sulphate" => Ok(AttackType::Sulphate),
            "acid" => Ok(AttackType::Acid),
            "chloride" => Ok(AttackType::Chloride),
            _ => Err(DurarError::UnknownAttack {
                name: s.to_string(),
            }),
        }
    }
}

/// One lab measurement: strength and mass loss for a specimen at a
/// given dosage and day under a given attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationRecord {
    /// Exposure environment.
    pub attack: AttackType,
    /// Additive dosage fraction (0.00 to 0.10).
    pub dosage: f32,
    /// Days of curing/exposure.
    pub day: u32,
    /// Compressive strength in MPa.
    pub strength: f32,
    /// Cumulative mass loss in percent (0 for control).
    pub weight_loss: f32,
}

// Strength tables: one row per dosage level, one column per lab day.

const CONTROL_STRENGTH: [[f32; 3]; 6] = [
    [26.53, 33.33, 47.14],
    [31.29, 35.37, 41.54],
    [32.65, 38.09, 42.12],
    [36.05, 42.21, 52.13],
    [33.33, 36.05, 46.14],
    [31.29, 33.33, 44.13],
];

const SULPHATE_STRENGTH: [[f32; 3]; 6] = [
    [23.9, 30.0, 32.2],
    [28.2, 31.8, 35.0],
    [29.4, 34.3, 37.1],
    [32.4, 38.0, 40.9],
    [30.0, 32.4, 35.0],
    [28.2, 30.0, 31.9],
];

const SULPHATE_WEIGHT: [[f32; 3]; 6] = [
    [2.8, 10.7, 13.6],
    [2.4, 10.2, 12.9],
    [2.4, 11.2, 13.4],
    [2.5, 11.1, 13.3],
    [2.4, 10.8, 13.1],
    [2.9, 10.3, 13.2],
];

const ACID_STRENGTH: [[f32; 3]; 6] = [
    [30.5, 35.8, 32.2],
    [31.2, 36.5, 35.0],
    [32.0, 37.1, 36.0],
    [32.8, 38.0, 37.5],
    [31.5, 36.0, 34.0],
    [30.0, 34.5, 32.0],
];

const ACID_WEIGHT: [[f32; 3]; 6] = [
    [2.9, 8.7, 12.7],
    [2.9, 9.5, 12.6],
    [2.4, 9.6, 12.4],
    [2.1, 5.6, 10.8],
    [1.7, 8.7, 10.1],
    [0.2, 6.5, 7.3],
];

const CHLORIDE_STRENGTH: [[f32; 3]; 6] = [
    [23.1, 29.75, 40.1],
    [26.85, 32.3, 44.5],
    [28.7, 35.2, 46.75],
    [30.1, 37.9, 50.5],
    [27.2, 34.8, 46.1],
    [26.1, 32.85, 43.2],
];

const CHLORIDE_WEIGHT: [[f32; 3]; 6] = [
    [0.52, 1.9, 2.83],
    [0.49, 1.68, 2.53],
    [0.44, 1.46, 2.22],
    [0.40, 1.37, 2.08],
    [0.46, 1.42, 2.2],
    [0.51, 1.47, 2.25],
];

/// Control specimens lose no mass; the table is all zeros.
const CONTROL_WEIGHT: [[f32; 3]; 6] = [[0.0; 3]; 6];

fn attack_tables(attack: AttackType) -> (&'static [[f32; 3]; 6], &'static [[f32; 3]; 6]) {
    match attack {
        AttackType::Control => (&CONTROL_STRENGTH, &CONTROL_WEIGHT),
        AttackType::Sulphate => (&SULPHATE_STRENGTH, &SULPHATE_WEIGHT),
        AttackType::Acid => (&ACID_STRENGTH, &ACID_WEIGHT),
        AttackType::Chloride => (&CHLORIDE_STRENGTH, &CHLORIDE_WEIGHT),
    }
}

/// Assembles the full calibration table: 4 attacks × 6 dosages × 3 days,
/// attack-major, dosage then day within each attack.
#[must_use]
pub fn build_dataset() -> Vec<CalibrationRecord> {
    let mut records = Vec::with_capacity(AttackType::ALL.len() * DOSAGE_LEVELS.len() * LAB_DAYS.len());

    for attack in AttackType::ALL {
        let (strength, weight) = attack_tables(attack);
        for (dosage_idx, &dosage) in DOSAGE_LEVELS.iter().enumerate() {
            for (day_idx, &day) in LAB_DAYS.iter().enumerate() {
                records.push(CalibrationRecord {
                    attack,
                    dosage,
                    day,
                    strength: strength[dosage_idx][day_idx],
                    weight_loss: weight[dosage_idx][day_idx],
                });
            }
        }
    }

    debug_assert_eq!(records.len(), 72);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_has_72_records() {
        assert_eq!(build_dataset().len(), 72);
    }

    #[test]
    fn each_attack_has_18_records() {
        let records = build_dataset();
        for attack in AttackType::ALL {
            let count = records.iter().filter(|r| r.attack == attack).count();
            assert_eq!(count, 18, "{attack} should have 6 dosages x 3 days");
        }
    }

    #[test]
    fn control_weight_loss_is_zero() {
        for record in build_dataset() {
            if record.attack == AttackType::Control {
                assert_eq!(record.weight_loss, 0.0);
            }
        }
    }

    #[test]
    fn spot_check_lab_values() {
        let records = build_dataset();
        let find = |attack, dosage: f32, day| {
            records
                .iter()
                .find(|r| r.attack == attack && (r.dosage - dosage).abs() < 1e-6 && r.day == day)
                .copied()
                .expect("record present")
        };

        assert!((find(AttackType::Control, 0.06, 56).strength - 52.13).abs() < 1e-6);
        assert!((find(AttackType::Sulphate, 0.06, 28).strength - 38.0).abs() < 1e-6);
        assert!((find(AttackType::Acid, 0.06, 28).weight_loss - 5.6).abs() < 1e-6);
        assert!((find(AttackType::Chloride, 0.10, 7).weight_loss - 0.51).abs() < 1e-6);
    }

    #[test]
    fn build_is_deterministic() {
        assert_eq!(build_dataset(), build_dataset());
    }

    #[test]
    fn attack_parse_is_case_insensitive() {
        assert_eq!(
            "SULPHATE".parse::<AttackType>().expect("parses"),
            AttackType::Sulphate
        );
        assert_eq!(
            "Chloride".parse::<AttackType>().expect("parses"),
            AttackType::Chloride
        );
    }

    #[test]
    fn unknown_attack_is_rejected() {
        let err = "frost".parse::<AttackType>().unwrap_err();
        assert!(matches!(err, DurarError::UnknownAttack { .. }));
        assert!(err.to_string().contains("frost"));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for attack in AttackType::ALL {
            let parsed: AttackType = attack.to_string().parse().expect("parses");
            assert_eq!(parsed, attack);
        }
    }
}
