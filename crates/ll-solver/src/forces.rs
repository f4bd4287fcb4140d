//! Per-segment force and moment assembly.

use crate::discretization::SpanDiscretization;
use crate::error::{SolverError, SolverResult};
use ll_section::SectionCoefficients;
use nalgebra::{DVector, Vector3};

/// Per-segment force and moment differentials in body coordinates, per unit
/// air density. The caller applies `rho` and integrates.
#[derive(Clone, Debug)]
pub struct SegmentLoads {
    pub force: Vec<Vector3<f64>>,
    pub moment: Vec<Vector3<f64>>,
}

impl SegmentLoads {
    /// Sum of the segment forces.
    pub fn total_force(&self) -> Vector3<f64> {
        self.force.iter().sum()
    }
}

/// Kutta-Joukowski force per segment from a converged circulation and the
/// final local velocities: `dF[j] = Gamma[j] * (dl[j] x V[j])`.
///
/// The per-segment moment contribution is null in this formulation; pitching
/// moment accounting belongs to the external force aggregator.
pub fn kutta_joukowski(
    disc: &SpanDiscretization,
    gamma: &DVector<f64>,
    v_local: &[Vector3<f64>],
) -> SegmentLoads {
    let dl = disc.segments();
    let force = (0..disc.len())
        .map(|j| gamma[j] * dl[j].cross(&v_local[j]))
        .collect();
    let moment = vec![Vector3::zeros(); disc.len()];
    SegmentLoads { force, moment }
}

/// Simplified non-iterative force estimate from 2-D section coefficients at
/// the *uninduced* local angle of attack.
///
/// No circulation solve: the local flow is taken directly from `v_rel`,
/// resolved into the section plane through the local dihedral, and the
/// section polars are applied at `alpha = atan(w/u) + twist`. Useful as a
/// cheap cross-check against the full solve; it ignores downwash entirely
/// and so overpredicts lift at high aspect-ratio loadings.
pub fn section_forces(
    disc: &SpanDiscretization,
    section: &dyn SectionCoefficients,
    v_rel: &[Vector3<f64>],
    delta: &[f64],
) -> SolverResult<SegmentLoads> {
    let k = disc.len();
    if v_rel.len() != k || delta.len() != k {
        return Err(SolverError::Input {
            what: format!(
                "expected {k} stations, got v_rel {} and delta {}",
                v_rel.len(),
                delta.len()
            ),
        });
    }

    let nodes = disc.nodes();
    let stations = disc.stations();
    let chords = disc.chords();
    let dihedrals = disc.dihedrals();
    let twists = disc.twists();

    let mut force = Vec::with_capacity(k);
    let mut moment = Vec::with_capacity(k);
    for j in 0..k {
        let (sd, cd) = dihedrals[j].sin_cos();
        let theta = twists[j];

        // Section-plane relative wind
        let u = v_rel[j].x;
        let w = v_rel[j].z * cd - v_rel[j].y * sd;
        let alpha = (w / u).atan() + theta;

        let cl = section.cl(stations[j], alpha, delta[j]);
        let cdrag = section.cd(stations[j], alpha, delta[j]);
        let cm = section.cm(stations[j], alpha, delta[j]);
        if !cl.is_finite() || !cdrag.is_finite() || !cm.is_finite() {
            return Err(SolverError::NonFiniteCoefficient { station: j });
        }

        // Per-unit-span loads scaled by the segment's span extent; the
        // 1/cos(dihedral) factor converts planform span to arc length
        let dy = nodes[j + 1].y - nodes[j].y;
        let k1 = 0.5 * (u * u + w * w);
        let k2 = dy / cd;
        let lift = k1 * cl * chords[j] * k2;
        let drag = k1 * cdrag * chords[j] * k2;
        let m0 = k1 * cm * chords[j] * chords[j] * k2;

        let (s_fl, c_fl) = (alpha - theta).sin_cos();
        let f_perp = lift * c_fl + drag * s_fl;
        let f_par = lift * s_fl - drag * c_fl;

        force.push(Vector3::new(f_par, f_perp * sd, -f_perp * cd));
        moment.push(Vector3::new(0.0, m0 * cd, -m0 * sd));
    }

    Ok(SegmentLoads { force, moment })
}
