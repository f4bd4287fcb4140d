//! Rectangular flat planform, used for analytic reference cases.

use crate::error::{GeometryError, GeometryResult};
use crate::traits::SpanGeometry;
use ll_core::units::Length;

/// Untwisted rectangular wing: constant chord, no sweep, no dihedral.
///
/// The closed-form lifting-line results for this shape make it the standard
/// fixture for solver verification.
#[derive(Clone, Copy, Debug)]
pub struct FlatPlanform {
    b: f64,
    c: f64,
}

impl FlatPlanform {
    pub fn new(span: Length, chord: Length) -> GeometryResult<Self> {
        let b = span.value;
        let c = chord.value;
        if !(b.is_finite() && b > 0.0) {
            return Err(GeometryError::InvalidParameter {
                what: "span",
                value: b,
            });
        }
        if !(c.is_finite() && c > 0.0) {
            return Err(GeometryError::InvalidParameter {
                what: "chord",
                value: c,
            });
        }
        Ok(Self { b, c })
    }
}

impl SpanGeometry for FlatPlanform {
    fn span(&self) -> f64 {
        self.b
    }

    fn area(&self) -> f64 {
        self.b * self.c
    }

    fn chord(&self, _y: f64) -> f64 {
        self.c
    }

    fn x(&self, _y: f64) -> f64 {
        0.0
    }

    fn z(&self, _y: f64) -> f64 {
        0.0
    }

    fn dihedral(&self, _y: f64) -> f64 {
        0.0
    }

    fn twist(&self, _y: f64) -> f64 {
        0.0
    }
}
