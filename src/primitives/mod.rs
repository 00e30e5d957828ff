//! Core numeric containers (Vector, Matrix).
//!
//! Row-major storage, just enough surface for tree fitting and batch
//! prediction. No linear algebra.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
