//! Elliptically-parameterized paraglider planform.
//!
//! Chord, quarter-chord sweep, and arc (dihedral) distributions are all
//! elliptical arcs, parameterized by their mean and maximum angles. Geometric
//! torsion grows from the center toward the tips, either linearly or
//! exponentially.

use crate::error::{GeometryError, GeometryResult};
use crate::traits::SpanGeometry;
use ll_core::units::{radians, Angle, Length};

/// Span-wise distribution law for geometric torsion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TorsionShape {
    /// `theta(y) = 2*theta_tip/b * |y|`
    Linear,
    /// `theta(y) = k * (exp(|y|) - 1)` with `k` chosen to hit `theta_tip`
    Exponential,
}

/// Coefficients of one elliptical arc `B*sqrt(1 - y^2/A^2)`, or `None` for a
/// flat (zero-angle) distribution.
#[derive(Clone, Copy, Debug)]
struct Arc {
    a: f64,
    b: f64,
}

impl Arc {
    /// Build the arc hitting angle `med` at the mid-semispan and `max` at the
    /// tip. Requires `tan(max) > 2*tan(med)` in magnitude (the ellipse
    /// degenerates otherwise).
    fn new(half_span: f64, med: f64, max: f64, what: &'static str) -> GeometryResult<Option<Arc>> {
        let t_med = med.tan();
        let t_max = max.tan();

        if t_max == 0.0 {
            if t_med != 0.0 {
                return Err(GeometryError::InvalidParameter { what, value: med });
            }
            return Ok(None);
        }

        let ratio = t_med / t_max;
        let disc = 1.0 - 2.0 * ratio;
        if disc <= 0.0 || !disc.is_finite() {
            return Err(GeometryError::InvalidParameter { what, value: max });
        }

        Ok(Some(Arc {
            a: half_span * (1.0 - ratio) / disc.sqrt(),
            b: half_span * t_med * (1.0 - ratio) / disc,
        }))
    }

    fn eval(&self, y: f64) -> f64 {
        self.b * (1.0 - (y * y) / (self.a * self.a)).sqrt()
    }

    fn slope(&self, y: f64) -> f64 {
        let root = (1.0 - (y * y) / (self.a * self.a)).sqrt();
        self.b * -y / (self.a * self.a * root)
    }
}

/// Elliptical paraglider canopy planform.
///
/// Angles follow the body-frame convention (x forward, y starboard, z down):
/// a canopy that arcs downward toward the tips has negative `dihedral_med`
/// and `dihedral_max`.
#[derive(Clone, Debug)]
pub struct EllipticalPlanform {
    b: f64,
    c0: f64,
    taper: f64,
    sweep: Option<Arc>,
    arc: Option<Arc>,
    torsion_tip: f64,
    torsion_shape: TorsionShape,
}

impl EllipticalPlanform {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        span: Length,
        central_chord: Length,
        taper: f64,
        sweep_med: Angle,
        sweep_max: Angle,
        dihedral_med: Angle,
        dihedral_max: Angle,
        torsion_tip: Angle,
        torsion_shape: TorsionShape,
    ) -> GeometryResult<Self> {
        let b = span.value;
        let c0 = central_chord.value;

        if !(b.is_finite() && b > 0.0) {
            return Err(GeometryError::InvalidParameter {
                what: "span",
                value: b,
            });
        }
        if !(c0.is_finite() && c0 > 0.0) {
            return Err(GeometryError::InvalidParameter {
                what: "central chord",
                value: c0,
            });
        }
        if !(taper.is_finite() && taper > 0.0 && taper < 1.0) {
            return Err(GeometryError::InvalidParameter {
                what: "taper",
                value: taper,
            });
        }

        let half = b / 2.0;
        let sweep = Arc::new(half, radians(sweep_med), radians(sweep_max), "sweep")?;
        let arc = Arc::new(half, radians(dihedral_med), radians(dihedral_max), "dihedral")?;

        Ok(Self {
            b,
            c0,
            taper,
            sweep,
            arc,
            torsion_tip: radians(torsion_tip),
            torsion_shape,
        })
    }

    /// Build a planform from its span and projected area, solving for the
    /// central chord. Convenient for matching published wing data.
    #[allow(clippy::too_many_arguments)]
    pub fn from_span_and_area(
        span: Length,
        area: ll_core::units::Area,
        taper: f64,
        sweep_med: Angle,
        sweep_max: Angle,
        dihedral_med: Angle,
        dihedral_max: Angle,
        torsion_tip: Angle,
        torsion_shape: TorsionShape,
    ) -> GeometryResult<Self> {
        let s = area.value;
        let b = span.value;
        if !(s.is_finite() && s > 0.0) {
            return Err(GeometryError::InvalidParameter {
                what: "area",
                value: s,
            });
        }
        let tf = taper_factor(taper);
        if !tf.is_finite() {
            return Err(GeometryError::InvalidParameter {
                what: "taper",
                value: taper,
            });
        }
        let c0 = s / (b / 2.0 * tf);
        Self::new(
            span,
            ll_core::units::m(c0),
            taper,
            sweep_med,
            sweep_max,
            dihedral_med,
            dihedral_max,
            torsion_tip,
            torsion_shape,
        )
    }

    pub fn central_chord(&self) -> f64 {
        self.c0
    }

    pub fn taper(&self) -> f64 {
        self.taper
    }
}

fn taper_factor(t: f64) -> f64 {
    let root = (1.0 - t * t).sqrt();
    t + (root).asin() / root
}

impl SpanGeometry for EllipticalPlanform {
    fn span(&self) -> f64 {
        self.b
    }

    fn area(&self) -> f64 {
        self.c0 * self.b / 2.0 * taper_factor(self.taper)
    }

    fn chord(&self, y: f64) -> f64 {
        let a = (self.b / 2.0) / (1.0 - self.taper * self.taper).sqrt();
        self.c0 * (1.0 - (y * y) / (a * a)).sqrt()
    }

    fn x(&self, y: f64) -> f64 {
        // Quarter-chord sweep arc, referenced so x(0) = 0
        match &self.sweep {
            Some(arc) => arc.eval(y) - arc.b,
            None => 0.0,
        }
    }

    fn z(&self, y: f64) -> f64 {
        match &self.arc {
            Some(arc) => arc.eval(y) - arc.b,
            None => 0.0,
        }
    }

    fn dihedral(&self, y: f64) -> f64 {
        match &self.arc {
            Some(arc) => arc.slope(y).atan(),
            None => 0.0,
        }
    }

    fn twist(&self, y: f64) -> f64 {
        match self.torsion_shape {
            TorsionShape::Linear => 2.0 * self.torsion_tip / self.b * y.abs(),
            TorsionShape::Exponential => {
                let k = self.torsion_tip / ((self.b / 2.0).exp() - 1.0);
                k * (y.abs().exp() - 1.0)
            }
        }
    }

    fn aspect_ratio(&self) -> f64 {
        2.0 * self.b / (self.c0 * taper_factor(self.taper))
    }

    fn mac(&self) -> f64 {
        let t = self.taper;
        (2.0 / 3.0) * self.c0 * (2.0 + t * t) / taper_factor(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ll_core::units::{deg, m, m2};
    use ll_core::{nearly_equal, Tolerances};

    fn reference_wing() -> EllipticalPlanform {
        // Span and area of the reference canopy used across the test suite
        EllipticalPlanform::from_span_and_area(
            m(8.84),
            m2(19.55),
            0.4,
            deg(10.0),
            deg(25.0),
            deg(-15.0),
            deg(-40.0),
            deg(0.0),
            TorsionShape::Linear,
        )
        .unwrap()
    }

    #[test]
    fn area_roundtrip() {
        let wing = reference_wing();
        let tol = Tolerances::default();
        assert!(nearly_equal(wing.area(), 19.55, tol));
        assert!(nearly_equal(wing.span(), 8.84, tol));
    }

    #[test]
    fn aspect_ratio_consistent_with_area() {
        let wing = reference_wing();
        let ar = wing.span() * wing.span() / wing.area();
        assert!((wing.aspect_ratio() - ar).abs() < 1e-9);
    }

    #[test]
    fn tip_chord_is_tapered_central_chord() {
        let wing = reference_wing();
        let tip = wing.chord(wing.span() / 2.0);
        assert!((tip - wing.central_chord() * wing.taper()).abs() < 1e-9);
    }

    #[test]
    fn dihedral_hits_max_at_tip() {
        let wing = reference_wing();
        let tip = wing.span() / 2.0;
        // Local dihedral angle is atan(dz/dy); at the tip it equals the
        // negated tip parameter (antisymmetric about the centerline).
        let expected = -deg(-40.0).value.tan().atan();
        assert!((wing.dihedral(tip) - expected).abs() < 1e-6);
        assert!((wing.dihedral(-tip) + expected).abs() < 1e-6);
        assert!(wing.dihedral(0.0).abs() < 1e-12);
    }

    #[test]
    fn centerline_is_reference_point() {
        let wing = reference_wing();
        assert!(wing.x(0.0).abs() < 1e-12);
        assert!(wing.z(0.0).abs() < 1e-12);
        assert!(wing.twist(0.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_taper() {
        let result = EllipticalPlanform::new(
            m(8.84),
            m(2.5),
            1.5,
            deg(0.0),
            deg(0.0),
            deg(0.0),
            deg(0.0),
            deg(0.0),
            TorsionShape::Linear,
        );
        assert!(matches!(
            result,
            Err(GeometryError::InvalidParameter { what: "taper", .. })
        ));
    }

    #[test]
    fn rejects_inconsistent_arc_angles() {
        // tan(max) must exceed 2*tan(med)
        let result = EllipticalPlanform::new(
            m(8.84),
            m(2.5),
            0.4,
            deg(0.0),
            deg(0.0),
            deg(-30.0),
            deg(-40.0),
            deg(0.0),
            TorsionShape::Linear,
        );
        assert!(result.is_err());
    }

    #[test]
    fn linear_torsion_reaches_tip_value() {
        let wing = EllipticalPlanform::from_span_and_area(
            m(8.84),
            m2(19.55),
            0.4,
            deg(0.0),
            deg(0.0),
            deg(0.0),
            deg(0.0),
            deg(4.0),
            TorsionShape::Linear,
        )
        .unwrap();
        let tip = wing.twist(wing.span() / 2.0);
        assert!((tip - deg(4.0).value).abs() < 1e-9);
    }
}
