//! End-to-end properties of the circulation solver on representative wings.

use ll_core::units::{deg, m, m2};
use ll_core::{nearly_equal, Tolerances};
use ll_geom::elliptical::TorsionShape;
use ll_geom::{EllipticalPlanform, FlatPlanform, SpanGeometry};
use ll_section::{LinearSection, SectionCoefficients, TableSection};
use ll_solver::{
    forces, CirculationSolver, SolveStatus, SolverConfig, SolverError,
};
use nalgebra::Vector3;
use std::sync::Arc;

/// Reference canopy: span 8.84 m, projected area 19.55 m².
fn reference_wing() -> EllipticalPlanform {
    EllipticalPlanform::from_span_and_area(
        m(8.84),
        m2(19.55),
        0.4,
        deg(0.0),
        deg(0.0),
        deg(-10.0),
        deg(-25.0),
        deg(0.0),
        TorsionShape::Linear,
    )
    .unwrap()
}

fn thin_section() -> Arc<dyn SectionCoefficients> {
    Arc::new(
        LinearSection::thin_airfoil(-0.2, 0.35)
            .unwrap()
            .with_drag(0.01, 0.03),
    )
}

fn uniform_wind(k: usize, speed: f64, alpha: f64, beta: f64) -> Vec<Vector3<f64>> {
    let v = Vector3::new(
        speed * alpha.cos() * beta.cos(),
        speed * beta.sin(),
        speed * alpha.sin() * beta.cos(),
    );
    vec![v; k]
}

#[test]
fn symmetric_wing_gives_symmetric_circulation() {
    let solver = CirculationSolver::new(
        &reference_wing(),
        51,
        thin_section(),
        SolverConfig::default(),
    )
    .unwrap();

    let wind = uniform_wind(51, 10.0, 6.0_f64.to_radians(), 0.0);
    let delta = vec![0.0; 51];
    let solution = solver.solve(&wind, &delta).unwrap();

    let k = solution.gamma.len();
    let scale = solution.gamma.amax();
    let tol = Tolerances {
        abs: 1e-9 * scale,
        rel: 1e-6,
    };
    for j in 0..k / 2 {
        let left = solution.gamma[j];
        let right = solution.gamma[k - 1 - j];
        assert!(
            nearly_equal(left, right, tol),
            "asymmetry at station {j}: {left} vs {right}"
        );
    }
}

#[test]
fn circulation_is_unimodal_on_elliptical_planform() {
    let solver = CirculationSolver::new(
        &reference_wing(),
        51,
        thin_section(),
        SolverConfig::default(),
    )
    .unwrap();

    let wind = uniform_wind(51, 10.0, 6.0_f64.to_radians(), 0.0);
    let delta = vec![0.0; 51];
    let solution = solver.solve(&wind, &delta).unwrap();

    // dGamma/dy changes sign at most once across the span
    let gamma = &solution.gamma;
    let scale = gamma.amax();
    let mut last_sign = 0i8;
    let mut sign_changes = 0;
    for j in 1..gamma.len() {
        let diff = gamma[j] - gamma[j - 1];
        if diff.abs() < 1e-9 * scale {
            continue;
        }
        let sign = if diff > 0.0 { 1 } else { -1 };
        if last_sign != 0 && sign != last_sign {
            sign_changes += 1;
        }
        last_sign = sign;
    }
    assert!(sign_changes <= 1, "{sign_changes} sign changes in dGamma/dy");
    assert!(gamma.iter().all(|&g| g > 0.0));
}

#[test]
fn converged_state_satisfies_lift_equivalence() {
    // The design has no internal convergence check, so re-derive the
    // residual from the returned circulation and velocities and require it
    // to be small against the characteristic force scale.
    let wing = reference_wing();
    let section = thin_section();
    let solver =
        CirculationSolver::new(&wing, 51, Arc::clone(&section), SolverConfig::default()).unwrap();

    let wind = uniform_wind(51, 10.0, 6.0_f64.to_radians(), 0.0);
    let delta = vec![0.0; 51];
    let solution = solver.solve(&wind, &delta).unwrap();

    let disc = solver.discretization();
    let mut max_residual = 0.0_f64;
    let mut force_scale = 0.0_f64;
    for j in 0..disc.len() {
        let v = solution.v_local[j];
        let alpha = v
            .dot(&disc.normal()[j])
            .atan2(v.dot(&disc.chordwise()[j]));
        let cl = section.cl(disc.stations()[j], alpha, 0.0);
        let circulatory = 2.0 * solution.gamma[j] * v.cross(&disc.segments()[j]).norm();
        let sectional = v.norm_squared() * disc.areas()[j] * cl;
        max_residual = max_residual.max((circulatory - sectional).abs());
        force_scale = force_scale.max(sectional.abs());
    }
    assert!(
        max_residual < 1e-6 * force_scale,
        "residual {max_residual} vs scale {force_scale}"
    );
}

#[test]
fn end_to_end_reference_case_produces_plausible_lift() {
    // K=51, 6 degrees alpha, 5 degrees sideslip, 10 m/s, zero brake
    let wing = reference_wing();
    let solver =
        CirculationSolver::new(&wing, 51, thin_section(), SolverConfig::default()).unwrap();

    let alpha = 6.0_f64.to_radians();
    let beta = 5.0_f64.to_radians();
    let speed = 10.0;
    let wind = uniform_wind(51, speed, alpha, beta);
    let delta = vec![0.0; 51];

    let (solution, loads) = solver.forces(&wind, &delta).unwrap();
    assert_eq!(solution.status, SolveStatus::MaxIterationsReached);

    let total = loads.total_force();
    let lift = total.x * alpha.sin() - total.z * alpha.cos();
    let cl = lift / (0.5 * speed * speed * wing.area());
    assert!(
        (0.3..1.2).contains(&cl),
        "total lift coefficient {cl} outside the plausible band"
    );
}

#[test]
fn brake_past_table_range_is_divergence_not_nan() {
    let wing = reference_wing();
    // Polar valid to ~11.5 degrees; brake shifts incidence by up to 17
    let alphas: Vec<f64> = (0..21).map(|i| -0.2 + 0.02 * i as f64).collect();
    let cl: Vec<f64> = alphas.iter().map(|a| 6.0 * a).collect();
    let cd = vec![0.01; 21];
    let cm = vec![-0.05; 21];
    let table = TableSection::new(alphas, cl, cd, cm)
        .unwrap()
        .with_delta_gain(0.3);

    let solver =
        CirculationSolver::new(&wing, 31, Arc::new(table), SolverConfig::default()).unwrap();

    let wind = uniform_wind(31, 10.0, 6.0_f64.to_radians(), 0.0);
    let braked = vec![1.0; 31];

    let err = solver.solve(&wind, &braked).unwrap_err();
    match &err {
        SolverError::Diverged { report, .. } => {
            assert!(report.control_point.is_some());
            assert_eq!(report.gamma.len(), 31);
            assert!(report.gamma.iter().all(|g| g.is_finite()));
        }
        other => panic!("expected divergence, got {other}"),
    }

    // The same flight condition without brake solves fine
    let clean = vec![0.0; 31];
    assert!(solver.solve(&wind, &clean).is_ok());
}

#[test]
fn iterative_solve_sees_less_lift_than_uninduced_estimate() {
    // The simplified estimator ignores downwash, so its lift bounds the
    // lifting-line result from above on a clean flat wing.
    let wing = FlatPlanform::new(m(10.0), m(1.0)).unwrap();
    let section = Arc::new(
        LinearSection::thin_airfoil(-0.2, 0.3)
            .unwrap()
            .with_drag(0.0, 0.0),
    );
    let solver =
        CirculationSolver::new(&wing, 32, Arc::clone(&section) as Arc<dyn SectionCoefficients>, SolverConfig::default())
            .unwrap();

    let alpha = 3.0_f64.to_radians();
    let wind = uniform_wind(32, 10.0, alpha, 0.0);
    let delta = vec![0.0; 32];

    let (_, iterative) = solver.forces(&wind, &delta).unwrap();
    let simplified = forces::section_forces(
        solver.discretization(),
        section.as_ref(),
        &wind,
        &delta,
    )
    .unwrap();

    let lift = |f: Vector3<f64>| f.x * alpha.sin() - f.z * alpha.cos();
    let lift_iterative = lift(iterative.total_force());
    let lift_simplified = lift(simplified.total_force());

    assert!(lift_iterative > 0.0);
    assert!(
        lift_iterative < lift_simplified,
        "iterative {lift_iterative} should sit below uninduced {lift_simplified}"
    );
    // Same order of magnitude
    assert!(lift_iterative > 0.5 * lift_simplified);
}

#[test]
fn discretization_is_shareable_across_parallel_solves() {
    // Sweep over alpha with one shared solver; results must match the
    // serial solve exactly (the influence tensor is per-solve state).
    use rayon::prelude::*;

    let wing = reference_wing();
    let solver = Arc::new(
        CirculationSolver::new(&wing, 21, thin_section(), SolverConfig::default()).unwrap(),
    );

    let alphas: Vec<f64> = (2..8).map(|d| (d as f64).to_radians()).collect();
    let parallel: Vec<f64> = alphas
        .par_iter()
        .map(|&a| {
            let wind = uniform_wind(21, 10.0, a, 0.0);
            let delta = vec![0.0; 21];
            solver.solve(&wind, &delta).unwrap().gamma.amax()
        })
        .collect();

    for (i, &a) in alphas.iter().enumerate() {
        let wind = uniform_wind(21, 10.0, a, 0.0);
        let delta = vec![0.0; 21];
        let serial = solver.solve(&wind, &delta).unwrap().gamma.amax();
        assert_eq!(serial, parallel[i]);
    }
}
