//! Error types for geometry construction and evaluation.

use thiserror::Error;

/// Errors raised by planform constructors and by consumers that detect
/// degenerate geometry outputs.
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("Invalid planform parameter {what}: {value}")]
    InvalidParameter { what: &'static str, value: f64 },

    #[error("Non-finite geometry output for {what} at y = {y}: {value}")]
    NonFinite {
        what: &'static str,
        y: f64,
        value: f64,
    },

    #[error("Degenerate geometry: {what} at y = {y}")]
    Degenerate { what: &'static str, y: f64 },
}

pub type GeometryResult<T> = Result<T, GeometryError>;
