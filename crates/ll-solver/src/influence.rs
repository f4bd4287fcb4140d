//! Pairwise induced-velocity influence of bound vortex segments.

use crate::discretization::SpanDiscretization;
use crate::error::{SolverError, SolverResult};
use nalgebra::Vector3;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Dense K×K grid of induced-velocity vectors.
///
/// Entry `(i, j)` is the velocity induced at control point `j` by a
/// unit-strength horseshoe vortex on segment `i`: two semi-infinite trailing
/// legs extended from the segment's nodes along the reference free-stream
/// direction, plus the bound filament itself. The bound term is omitted for
/// `i == j`; a segment's own bound vortex induces no velocity at its own
/// control point under this formulation, and keeping it would divide by
/// zero.
///
/// The tensor is valid for one free-stream direction and one geometry; it is
/// rebuilt per solve and reused across Newton iterations.
#[derive(Clone, Debug)]
pub struct InfluenceTensor {
    rows: Vec<Vec<Vector3<f64>>>,
}

impl InfluenceTensor {
    /// Build the influence tensor for unit free-stream direction `u_inf`.
    pub fn build(disc: &SpanDiscretization, u_inf: &Vector3<f64>) -> SolverResult<Self> {
        let k = disc.len();
        let nodes = disc.nodes();
        let cps = disc.control_points();

        let rows: Vec<Vec<Vector3<f64>>> = (0..k)
            .into_par_iter()
            .map(|i| {
                (0..k)
                    .map(|j| horseshoe(u_inf, &nodes[i], &nodes[i + 1], &cps[j], i == j))
                    .collect()
            })
            .collect();

        for (i, row) in rows.iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                if !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()) {
                    return Err(SolverError::Input {
                        what: format!(
                            "singular induced velocity for segment {i} at control point {j}"
                        ),
                    });
                }
            }
        }

        Ok(Self { rows })
    }

    /// Velocity induced at control point `cp` by unit circulation on
    /// `segment`.
    #[inline]
    pub fn at(&self, segment: usize, cp: usize) -> &Vector3<f64> {
        &self.rows[segment][cp]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Induced velocity of one horseshoe vortex at one field point.
fn horseshoe(
    u_inf: &Vector3<f64>,
    node_a: &Vector3<f64>,
    node_b: &Vector3<f64>,
    cp: &Vector3<f64>,
    skip_bound: bool,
) -> Vector3<f64> {
    let r1 = cp - node_a;
    let r2 = cp - node_b;
    let r1n = r1.norm();
    let r2n = r2.norm();

    // Trailing leg from the far node
    let mut v = u_inf.cross(&r2) / (r2n * (r2n - u_inf.dot(&r2)));

    // Bound filament
    if !skip_bound {
        let cross = r1.cross(&r2);
        v += ((r1n + r2n) * cross) / (r1n * r2n * (r1n * r2n + r1.dot(&r2)));
    }

    // Trailing leg from the near node
    v -= u_inf.cross(&r1) / (r1n * (r1n - u_inf.dot(&r1)));

    v / (4.0 * PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ll_core::units::m;
    use ll_geom::FlatPlanform;

    fn flat_tensor(k: usize) -> (SpanDiscretization, InfluenceTensor) {
        let wing = FlatPlanform::new(m(10.0), m(1.0)).unwrap();
        let disc = SpanDiscretization::new(&wing, k).unwrap();
        let u_inf = Vector3::new(1.0, 0.0, 0.0);
        let tensor = InfluenceTensor::build(&disc, &u_inf).unwrap();
        (disc, tensor)
    }

    #[test]
    fn all_entries_finite() {
        let (disc, tensor) = flat_tensor(20);
        for i in 0..disc.len() {
            for j in 0..disc.len() {
                let v = tensor.at(i, j);
                assert!(v.x.is_finite() && v.y.is_finite() && v.z.is_finite());
            }
        }
    }

    #[test]
    fn single_segment_self_induction_is_pure_downwash() {
        // One segment spanning (-s, s), control point at the center: the two
        // trailing legs each contribute -z_hat/(4*pi*s), the bound term is
        // skipped.
        let (disc, tensor) = flat_tensor(1);
        let s = disc.span() / 2.0;
        let v = tensor.at(0, 0);
        assert!(v.x.abs() < 1e-12);
        assert!(v.y.abs() < 1e-12);
        let expected = -2.0 / (4.0 * PI * s);
        assert!((v.z - expected).abs() < 1e-12);
    }

    #[test]
    fn mirror_symmetry_across_centerline() {
        // For a mirror-symmetric wing with no sideslip, the influence of the
        // mirrored segment at the mirrored control point is the y-flipped
        // vector.
        let (disc, tensor) = flat_tensor(12);
        let k = disc.len();
        for i in 0..k {
            for j in 0..k {
                let v = tensor.at(i, j);
                let w = tensor.at(k - 1 - i, k - 1 - j);
                assert!((v.x - w.x).abs() < 1e-10, "x mismatch at ({i},{j})");
                assert!((v.y + w.y).abs() < 1e-10, "y mismatch at ({i},{j})");
                assert!((v.z - w.z).abs() < 1e-10, "z mismatch at ({i},{j})");
            }
        }
    }

    #[test]
    fn self_influence_opposes_incidence() {
        // The trailing legs of a segment's own horseshoe reduce the
        // z-component of the local velocity, so positive circulation lowers
        // its own effective angle of attack. This sign is what makes the
        // coupled system contract instead of blow up.
        let (disc, tensor) = flat_tensor(10);
        for j in 0..disc.len() {
            assert!(tensor.at(j, j).z < 0.0);
        }
    }
}
