//! Error types for section coefficient models.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SectionError {
    #[error("Invalid coefficient model parameter {what}: {value}")]
    InvalidParameter { what: &'static str, value: f64 },

    #[error("Polar table error: {what}")]
    Table { what: &'static str },
}

pub type SectionResult<T> = Result<T, SectionError>;
