//! Error types for the lifting-line solver.

use ll_geom::GeometryError;
use nalgebra::DVector;
use thiserror::Error;

/// Snapshot of solver state at the point of failure, so callers and test
/// harnesses can inspect a diverged solve programmatically.
#[derive(Clone, Debug)]
pub struct DivergenceReport {
    /// Newton iteration at which the failure was detected (0-based)
    pub iteration: usize,
    /// Offending control point, where one is identifiable
    pub control_point: Option<usize>,
    /// Circulation distribution at failure
    pub gamma: DVector<f64>,
    /// Local angles of attack at failure (radians), if evaluated
    pub alpha: Vec<f64>,
    /// Residual vector at failure, if evaluated
    pub residual: Option<DVector<f64>>,
}

impl DivergenceReport {
    /// Human-readable failure location.
    pub fn location(&self) -> String {
        match self.control_point {
            Some(cp) => format!("iteration {}, control point {cp}", self.iteration),
            None => format!("iteration {}", self.iteration),
        }
    }
}

/// Errors that can occur while building a discretization or running a solve.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Input error: {what}")]
    Input { what: String },

    #[error("Solve diverged at {}: {what}", .report.location())]
    Diverged {
        what: &'static str,
        report: Box<DivergenceReport>,
    },

    #[error("Jacobian solve failed at iteration {iteration}")]
    LinearSolve { iteration: usize },

    #[error("Non-finite section coefficient at station {station}")]
    NonFiniteCoefficient { station: usize },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// The divergence report attached to this error, if any.
    pub fn report(&self) -> Option<&DivergenceReport> {
        match self {
            SolverError::Diverged { report, .. } => Some(report),
            _ => None,
        }
    }
}
