//! Validates the fitted models against the embedded lab table.
//!
//! Builds (or loads) the model store, compares `predict_point` output
//! with every calibration record, prints one line per record, writes
//! `prediction_validation.csv`, and exits non-zero on any failure.

use std::path::Path;
use std::process::ExitCode;

use durar::dataset::build_dataset;
use durar::error::Result;
use durar::model::{cache_dir_from_env, ModelStore};
use durar::validation::{count_failures, validate_against_lab, write_csv_report};

const REPORT_PATH: &str = "prediction_validation.csv";

fn run() -> Result<usize> {
    let records = build_dataset();
    let store = ModelStore::load_or_train(&cache_dir_from_env(), &records)?;

    let rows = validate_against_lab(&store, &records)?;
    for row in &rows {
        println!("{}", row.report_line());
    }

    write_csv_report(&rows, Path::new(REPORT_PATH))?;
    println!();
    println!("validation saved to {REPORT_PATH}");

    Ok(count_failures(&rows))
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(0) => {
            println!("all records within tolerance");
            ExitCode::SUCCESS
        }
        Ok(failures) => {
            eprintln!("{failures} record(s) outside tolerance");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("validation aborted: {e}");
            ExitCode::FAILURE
        }
    }
}
