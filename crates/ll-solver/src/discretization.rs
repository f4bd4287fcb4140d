//! Cosine-spaced span discretization into bound vortex segments.

use crate::error::{SolverError, SolverResult};
use ll_geom::{GeometryError, SpanGeometry};
use nalgebra::Vector3;
use std::f64::consts::PI;

/// Nodes, control points, and per-point section frames for a fixed wing
/// geometry.
///
/// `K` segments are bounded by `K+1` nodes at
/// `node_y[k] = -(b/2)*cos(k*pi/K)`; each segment's control point sits at
/// the angular midpoint `cp_y[k] = -(b/2)*cos(pi/(2K) + k*pi/K)`. Cosine
/// spacing concentrates points near the tips, where the circulation gradient
/// is steepest.
///
/// Immutable once built; shareable read-only across parallel solves.
#[derive(Clone, Debug)]
pub struct SpanDiscretization {
    span: f64,
    nodes: Vec<Vector3<f64>>,
    cps: Vec<Vector3<f64>>,
    y: Vec<f64>,
    spanwise: Vec<Vector3<f64>>,
    chordwise: Vec<Vector3<f64>>,
    normal: Vec<Vector3<f64>>,
    chord: Vec<f64>,
    dihedral: Vec<f64>,
    twist: Vec<f64>,
    dl: Vec<Vector3<f64>>,
    da: Vec<f64>,
}

fn checked(value: f64, what: &'static str, y: f64) -> SolverResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SolverError::Geometry(GeometryError::NonFinite {
            what,
            y,
            value,
        }))
    }
}

impl SpanDiscretization {
    /// Discretize `geometry` into `segments` bound vortex segments.
    pub fn new(geometry: &dyn SpanGeometry, segments: usize) -> SolverResult<Self> {
        if segments == 0 {
            return Err(SolverError::Input {
                what: "segment count must be at least 1".into(),
            });
        }

        let b = geometry.span();
        if !(b.is_finite() && b > 0.0) {
            return Err(SolverError::Geometry(GeometryError::InvalidParameter {
                what: "span",
                value: b,
            }));
        }
        let half = b / 2.0;
        let k = segments;

        let mut nodes = Vec::with_capacity(k + 1);
        let mut node_chord = Vec::with_capacity(k + 1);
        let mut node_y = Vec::with_capacity(k + 1);
        for i in 0..=k {
            let y = -half * (i as f64 * PI / k as f64).cos();
            let x = checked(geometry.x(y), "x", y)?;
            let z = checked(geometry.z(y), "z", y)?;
            let c = checked(geometry.chord(y), "chord", y)?;
            if c <= 0.0 {
                return Err(SolverError::Geometry(GeometryError::Degenerate {
                    what: "non-positive chord",
                    y,
                }));
            }
            nodes.push(Vector3::new(x, y, z));
            node_chord.push(c);
            node_y.push(y);
        }

        let mut cps = Vec::with_capacity(k);
        let mut y_cp = Vec::with_capacity(k);
        let mut spanwise = Vec::with_capacity(k);
        let mut chordwise = Vec::with_capacity(k);
        let mut normal = Vec::with_capacity(k);
        let mut cp_chord = Vec::with_capacity(k);
        let mut cp_dihedral = Vec::with_capacity(k);
        let mut cp_twist = Vec::with_capacity(k);
        for i in 0..k {
            let y = -half * (PI / (2.0 * k as f64) + i as f64 * PI / k as f64).cos();
            let x = checked(geometry.x(y), "x", y)?;
            let z = checked(geometry.z(y), "z", y)?;
            let c = checked(geometry.chord(y), "chord", y)?;
            let dihedral = checked(geometry.dihedral(y), "dihedral", y)?;
            let twist = checked(geometry.twist(y), "twist", y)?;

            let (sd, cd) = dihedral.sin_cos();
            let (st, ct) = twist.sin_cos();
            let u_s = Vector3::new(0.0, cd, sd);
            let u_a = Vector3::new(ct, st * sd, st * cd);
            let u_n = u_a.cross(&u_s).normalize();

            debug_assert!((u_s.norm() - 1.0).abs() < 1e-9);
            debug_assert!((u_a.norm() - 1.0).abs() < 1e-9);
            debug_assert!((u_n.norm() - 1.0).abs() < 1e-9);

            cps.push(Vector3::new(x, y, z));
            y_cp.push(y);
            spanwise.push(u_s);
            chordwise.push(u_a);
            normal.push(u_n);
            cp_chord.push(c);
            cp_dihedral.push(dihedral);
            cp_twist.push(twist);
        }

        let mut dl = Vec::with_capacity(k);
        let mut da = Vec::with_capacity(k);
        for i in 0..k {
            let seg = nodes[i + 1] - nodes[i];
            let len = seg.norm();
            if len <= 0.0 || !len.is_finite() {
                return Err(SolverError::Geometry(GeometryError::Degenerate {
                    what: "zero-length segment",
                    y: node_y[i],
                }));
            }
            // Trapezoidal chord average over the segment's endpoints
            dl.push(seg);
            da.push(0.5 * (node_chord[i] + node_chord[i + 1]) * len);
        }

        Ok(Self {
            span: b,
            nodes,
            cps,
            y: y_cp,
            spanwise,
            chordwise,
            normal,
            chord: cp_chord,
            dihedral: cp_dihedral,
            twist: cp_twist,
            dl,
            da,
        })
    }

    /// Number of bound vortex segments `K`.
    pub fn len(&self) -> usize {
        self.dl.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dl.is_empty()
    }

    pub fn span(&self) -> f64 {
        self.span
    }

    /// Segment endpoints, `K+1` points ordered from `-b/2` to `b/2`.
    pub fn nodes(&self) -> &[Vector3<f64>] {
        &self.nodes
    }

    /// Control points, one per segment.
    pub fn control_points(&self) -> &[Vector3<f64>] {
        &self.cps
    }

    /// Span-wise station of each control point.
    pub fn stations(&self) -> &[f64] {
        &self.y
    }

    pub fn spanwise(&self) -> &[Vector3<f64>] {
        &self.spanwise
    }

    pub fn chordwise(&self) -> &[Vector3<f64>] {
        &self.chordwise
    }

    pub fn normal(&self) -> &[Vector3<f64>] {
        &self.normal
    }

    /// Section chord at each control point.
    pub fn chords(&self) -> &[f64] {
        &self.chord
    }

    /// Local dihedral angle at each control point.
    pub fn dihedrals(&self) -> &[f64] {
        &self.dihedral
    }

    /// Geometric twist at each control point.
    pub fn twists(&self) -> &[f64] {
        &self.twist
    }

    /// Directed segment vectors `node[i+1] - node[i]`.
    pub fn segments(&self) -> &[Vector3<f64>] {
        &self.dl
    }

    /// Differential planform area of each segment.
    pub fn areas(&self) -> &[f64] {
        &self.da
    }
}
