//! ll-section: 2-D section aerodynamic coefficients for liftline.
//!
//! The solver consumes section lift/drag/moment coefficients through the
//! [`SectionCoefficients`] capability trait; each estimation strategy
//! (constant-slope thin airfoil, interpolated polar table, fitted polynomial)
//! is a separate implementation. Out-of-range angles of attack are reported
//! as NaN, which the consumer must detect.

pub mod brakes;
pub mod error;
pub mod linear;
pub mod poly;
pub mod table;
pub mod traits;

pub use brakes::CubicBrakes;
pub use error::{SectionError, SectionResult};
pub use linear::LinearSection;
pub use poly::PolySection;
pub use table::TableSection;
pub use traits::SectionCoefficients;
