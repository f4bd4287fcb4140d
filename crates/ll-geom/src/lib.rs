//! ll-geom: span-wise wing geometry for liftline.
//!
//! A planform is described by scalar functions of the span position `y`
//! (chord, x/z of the quarter-chord line, local dihedral, twist), evaluable
//! anywhere on `[-b/2, b/2]`. The lifting-line solver consumes these through
//! the [`SpanGeometry`] trait and never depends on a concrete shape.

pub mod elliptical;
pub mod error;
pub mod flat;
pub mod traits;

pub use elliptical::EllipticalPlanform;
pub use error::{GeometryError, GeometryResult};
pub use flat::FlatPlanform;
pub use traits::SpanGeometry;
