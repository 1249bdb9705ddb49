pub mod consts;
pub mod error;
pub mod config;

pub mod tuple;
pub mod matrix;
pub mod ray;

pub mod color;
pub mod canvas;
pub mod pattern;
pub mod light;

pub mod shape;
pub mod intersect;
pub mod world;
pub mod camera;
pub mod scene;

pub use crate::error::{ Error, Result };

use crate::consts::FEQ_EPSILON;

/// Approximate floating point equality.
///
/// Every value comparison in the crate (tuples, colors, matrices, materials)
/// goes through this function.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}

#[test]
fn feq_tolerates_small_error() {
    assert!(feq(1.0, 1.0 + FEQ_EPSILON / 2.0));
    assert!(!feq(1.0, 1.0 + FEQ_EPSILON * 2.0));
}
