//! Newton-Raphson solve for the span-wise circulation distribution.
//!
//! Each bound vortex segment must carry a circulation whose Kutta-Joukowski
//! lift matches the lift predicted by its section's 2-D coefficients at the
//! local (induced) angle of attack. That coupling across all segments is a
//! nonlinear system in the circulation vector; it is solved here with a
//! damped Newton iteration whose Jacobian is assembled in closed form.

use crate::config::SolverConfig;
use crate::discretization::SpanDiscretization;
use crate::error::{DivergenceReport, SolverError, SolverResult};
use crate::influence::InfluenceTensor;
use ll_geom::SpanGeometry;
use ll_section::SectionCoefficients;
use nalgebra::{DMatrix, DVector, Vector3};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a circulation solve.
///
/// `MaxIterationsReached` is not an error: with the default configuration no
/// convergence criterion is checked, and the caller decides whether the
/// best-effort circulation is acceptable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    /// Residual dropped below the requested tolerance (only reachable when
    /// `residual_tolerance` is set)
    Converged,
    /// Iteration budget spent; the result is a best-effort estimate
    MaxIterationsReached,
}

/// Result of a circulation solve.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Circulation strength per segment
    pub gamma: DVector<f64>,
    /// Total local velocity per control point (free stream + induced)
    pub v_local: Vec<Vector3<f64>>,
    /// Local angle of attack per control point (radians)
    pub alpha: Vec<f64>,
    pub status: SolveStatus,
    /// Newton updates performed
    pub iterations: usize,
    /// Residual norm at the returned circulation
    pub residual_norm: f64,
}

/// Per-iteration station quantities shared between the residual and the
/// Jacobian.
struct IterationState {
    v_local: Vec<Vector3<f64>>,
    alpha: Vec<f64>,
    cl: Vec<f64>,
    cl_alpha: Vec<f64>,
    w: Vec<Vector3<f64>>,
    w_norm: Vec<f64>,
    residual: DVector<f64>,
}

/// Nonlinear lifting-line circulation solver.
///
/// Owns the discretization for a fixed wing geometry; the influence tensor
/// is rebuilt per solve from that call's reference free-stream direction and
/// reused across its Newton iterations. Instances are `Send + Sync` and can
/// be shared read-only across parallel solves at different flight
/// conditions.
pub struct CirculationSolver {
    disc: SpanDiscretization,
    section: Arc<dyn SectionCoefficients>,
    config: SolverConfig,
}

impl CirculationSolver {
    /// Discretize `geometry` into `segments` segments and build a solver.
    pub fn new(
        geometry: &dyn SpanGeometry,
        segments: usize,
        section: Arc<dyn SectionCoefficients>,
        config: SolverConfig,
    ) -> SolverResult<Self> {
        let disc = SpanDiscretization::new(geometry, segments)?;
        Ok(Self::with_discretization(disc, section, config))
    }

    /// Build a solver around an existing discretization.
    pub fn with_discretization(
        disc: SpanDiscretization,
        section: Arc<dyn SectionCoefficients>,
        config: SolverConfig,
    ) -> Self {
        Self {
            disc,
            section,
            config,
        }
    }

    pub fn discretization(&self) -> &SpanDiscretization {
        &self.disc
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve for the circulation distribution.
    ///
    /// `v_rel` is the relative wind at each control point in body
    /// coordinates (absent circulation effects); `delta` the control
    /// deflection per control point. The reference free-stream direction for
    /// the trailing vortex legs is the normalized mid-span `v_rel`, held
    /// fixed for the duration of the solve.
    pub fn solve(&self, v_rel: &[Vector3<f64>], delta: &[f64]) -> SolverResult<Solution> {
        let k = self.disc.len();
        self.check_inputs(v_rel, delta)?;

        let u_inf = reference_direction(v_rel)?;
        let influence = InfluenceTensor::build(&self.disc, &u_inf)?;

        let mut gamma = self.elliptical_guess();
        let mut omega = self.config.relaxation_initial;
        let mut iterations = 0;

        for iteration in 0..self.config.max_iterations {
            let state = self.evaluate(&gamma, v_rel, delta, &influence, iteration)?;
            let residual_norm = state.residual.norm();
            debug!(iteration, residual_norm, relaxation = omega, "newton iteration");

            if let Some(tolerance) = self.config.residual_tolerance {
                if residual_norm < tolerance {
                    return Ok(Solution {
                        gamma,
                        v_local: state.v_local,
                        alpha: state.alpha,
                        status: SolveStatus::Converged,
                        iterations: iteration,
                        residual_norm,
                    });
                }
            }

            let jacobian = self.jacobian(&gamma, &state, &influence);
            let step = jacobian
                .lu()
                .solve(&(-state.residual.clone()))
                .ok_or(SolverError::LinearSolve { iteration })?;

            gamma += omega * step;
            if gamma.iter().any(|g| !g.is_finite()) {
                return Err(SolverError::Diverged {
                    what: "non-finite circulation after update",
                    report: Box::new(DivergenceReport {
                        iteration,
                        control_point: None,
                        gamma,
                        alpha: state.alpha,
                        residual: Some(state.residual),
                    }),
                });
            }

            omega += (1.0 - omega) * self.config.relaxation_anneal;
            iterations = iteration + 1;
        }

        let state = self.evaluate(&gamma, v_rel, delta, &influence, iterations)?;
        let residual_norm = state.residual.norm();
        let status = match self.config.residual_tolerance {
            Some(tolerance) if residual_norm < tolerance => SolveStatus::Converged,
            Some(tolerance) => {
                warn!(
                    residual_norm,
                    tolerance, "iteration budget exhausted before tolerance"
                );
                SolveStatus::MaxIterationsReached
            }
            None => SolveStatus::MaxIterationsReached,
        };

        debug_assert_eq!(gamma.len(), k);
        Ok(Solution {
            gamma,
            v_local: state.v_local,
            alpha: state.alpha,
            status,
            iterations,
            residual_norm,
        })
    }

    /// Solve and assemble per-segment Kutta-Joukowski forces.
    pub fn forces(
        &self,
        v_rel: &[Vector3<f64>],
        delta: &[f64],
    ) -> SolverResult<(Solution, crate::forces::SegmentLoads)> {
        let solution = self.solve(v_rel, delta)?;
        let loads = crate::forces::kutta_joukowski(&self.disc, &solution.gamma, &solution.v_local);
        Ok((solution, loads))
    }

    fn check_inputs(&self, v_rel: &[Vector3<f64>], delta: &[f64]) -> SolverResult<()> {
        let k = self.disc.len();
        if v_rel.len() != k {
            return Err(SolverError::Input {
                what: format!("v_rel length {} != segment count {k}", v_rel.len()),
            });
        }
        if delta.len() != k {
            return Err(SolverError::Input {
                what: format!("delta length {} != segment count {k}", delta.len()),
            });
        }
        for (j, v) in v_rel.iter().enumerate() {
            if !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()) {
                return Err(SolverError::Input {
                    what: format!("non-finite relative wind at control point {j}"),
                });
            }
        }
        Ok(())
    }

    /// Elliptical circulation proposal scaled by `gamma_ref`.
    fn elliptical_guess(&self) -> DVector<f64> {
        let b = self.disc.span();
        DVector::from_iterator(
            self.disc.len(),
            self.disc.stations().iter().map(|&y| {
                let t = 2.0 * y / b;
                self.config.gamma_ref * (1.0 - t * t).sqrt()
            }),
        )
    }

    /// Evaluate the local flow, section coefficients, and residual for the
    /// current circulation.
    fn evaluate(
        &self,
        gamma: &DVector<f64>,
        v_rel: &[Vector3<f64>],
        delta: &[f64],
        influence: &InfluenceTensor,
        iteration: usize,
    ) -> SolverResult<IterationState> {
        let k = self.disc.len();
        let stations = self.disc.stations();
        let chordwise = self.disc.chordwise();
        let normal = self.disc.normal();
        let dl = self.disc.segments();
        let da = self.disc.areas();

        let mut v_local = Vec::with_capacity(k);
        let mut alpha = Vec::with_capacity(k);
        for j in 0..k {
            let mut v = v_rel[j];
            for i in 0..k {
                v += gamma[i] * influence.at(i, j);
            }
            alpha.push(v.dot(&normal[j]).atan2(v.dot(&chordwise[j])));
            v_local.push(v);
        }

        let diverged = |what, control_point, alpha: &[f64], residual: Option<DVector<f64>>| {
            SolverError::Diverged {
                what,
                report: Box::new(DivergenceReport {
                    iteration,
                    control_point,
                    gamma: gamma.clone(),
                    alpha: alpha.to_vec(),
                    residual,
                }),
            }
        };

        for (j, &a) in alpha.iter().enumerate() {
            if a < self.config.alpha_floor {
                return Err(diverged(
                    "local angle of attack below floor",
                    Some(j),
                    &alpha,
                    None,
                ));
            }
        }

        let mut cl = Vec::with_capacity(k);
        let mut cl_alpha = Vec::with_capacity(k);
        for j in 0..k {
            let c = self.section.cl(stations[j], alpha[j], delta[j]);
            let ca = self.section.cl_alpha(stations[j], alpha[j], delta[j]);
            if !c.is_finite() || !ca.is_finite() {
                return Err(diverged(
                    "non-finite section lift coefficient",
                    Some(j),
                    &alpha,
                    None,
                ));
            }
            cl.push(c);
            cl_alpha.push(ca);
        }

        let mut w = Vec::with_capacity(k);
        let mut w_norm = Vec::with_capacity(k);
        let mut residual = DVector::zeros(k);
        for j in 0..k {
            let wj = v_local[j].cross(&dl[j]);
            let wn = wj.norm();
            if wn <= f64::EPSILON {
                return Err(diverged(
                    "local velocity parallel to bound segment",
                    Some(j),
                    &alpha,
                    None,
                ));
            }
            residual[j] = 2.0 * gamma[j] * wn - v_local[j].norm_squared() * da[j] * cl[j];
            w.push(wj);
            w_norm.push(wn);
        }

        Ok(IterationState {
            v_local,
            alpha,
            cl,
            cl_alpha,
            w,
            w_norm,
            residual,
        })
    }

    /// Assemble the Jacobian `J[j][k] = df[j]/dGamma[k]` in closed form.
    ///
    /// Four contributions: the direct `2|V x dl|` diagonal; the sensitivity
    /// of `|V x dl|` to the induced velocity; the lift-slope term through
    /// the local angle of attack; and the dynamic-pressure term through
    /// `|V|^2`.
    fn jacobian(
        &self,
        gamma: &DVector<f64>,
        state: &IterationState,
        influence: &InfluenceTensor,
    ) -> DMatrix<f64> {
        let k = self.disc.len();
        let chordwise = self.disc.chordwise();
        let normal = self.disc.normal();
        let dl = self.disc.segments();
        let da = self.disc.areas();

        let mut jacobian = DMatrix::zeros(k, k);
        for j in 0..k {
            let v = state.v_local[j];
            let va = v.dot(&chordwise[j]);
            let vn = v.dot(&normal[j]);
            let plane = va * va + vn * vn;

            for col in 0..k {
                let vk = influence.at(col, j);
                let d_alpha = (va * vk.dot(&normal[j]) - vn * vk.dot(&chordwise[j])) / plane;

                let mut value =
                    2.0 * gamma[j] * state.w[j].dot(&vk.cross(&dl[j])) / state.w_norm[j];
                value -= da[j]
                    * (2.0 * v.dot(vk) * state.cl[j]
                        + v.norm_squared() * state.cl_alpha[j] * d_alpha);
                if col == j {
                    value += 2.0 * state.w_norm[j];
                }
                jacobian[(j, col)] = value;
            }
        }
        jacobian
    }
}

/// Reference free-stream direction: the normalized mid-span relative wind.
/// A source approximation of uncertain validity under large sideslip,
/// preserved as-is.
fn reference_direction(v_rel: &[Vector3<f64>]) -> SolverResult<Vector3<f64>> {
    let mid = v_rel[v_rel.len() / 2];
    let norm = mid.norm();
    if norm <= f64::EPSILON {
        return Err(SolverError::Input {
            what: "mid-span relative wind has zero magnitude".into(),
        });
    }
    Ok(mid / norm)
}
