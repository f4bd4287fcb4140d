//! ll-solver: nonlinear lifting-line solver for liftline.
//!
//! Discretizes the span into bound vortex segments, builds the pairwise
//! induced-velocity influence tensor, and solves the coupled lift-equivalence
//! equations for the circulation distribution with a Newton-Raphson
//! iteration (the Phillips method). Section coefficients and span geometry
//! arrive through the `ll-section` and `ll-geom` traits.
//!
//! References:
//! Phillips and Snyder, "Modern Adaptation of Prandtl's Classic Lifting-Line
//! Theory", Journal of Aircraft, 2000.

pub mod config;
pub mod discretization;
pub mod error;
pub mod forces;
pub mod influence;
pub mod phillips;

pub use config::SolverConfig;
pub use discretization::SpanDiscretization;
pub use error::{DivergenceReport, SolverError, SolverResult};
pub use forces::{section_forces, SegmentLoads};
pub use influence::InfluenceTensor;
pub use phillips::{CirculationSolver, Solution, SolveStatus};
