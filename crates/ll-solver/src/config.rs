//! Circulation solver configuration.

/// Newton iteration configuration.
///
/// The solver runs a fixed number of iterations by default; there is no
/// internal residual-tolerance stopping rule, and the caller decides whether
/// the returned circulation is acceptable. Setting `residual_tolerance`
/// opts in to early exit once the residual norm drops below it.
#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
    /// Fixed Newton iteration budget
    pub max_iterations: usize,
    /// Initial under-relaxation factor for the Newton update
    pub relaxation_initial: f64,
    /// Annealing rate toward full steps: `omega += (1 - omega) * rate`
    pub relaxation_anneal: f64,
    /// Lowest permitted local angle of attack (radians); anything below is
    /// treated as stall/extrapolation and fails the solve
    pub alpha_floor: f64,
    /// Scale of the elliptical initial circulation proposal (m^2/s)
    pub gamma_ref: f64,
    /// Opt-in residual norm for early exit; `None` preserves the fixed
    /// iteration count
    pub residual_tolerance: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 30,
            relaxation_initial: 0.1,
            relaxation_anneal: 0.25,
            alpha_floor: -11.0_f64.to_radians(),
            gamma_ref: 1.0,
            residual_tolerance: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_tolerance() {
        let config = SolverConfig::default();
        assert_eq!(config.max_iterations, 30);
        assert!(config.residual_tolerance.is_none());
        assert!(config.alpha_floor < 0.0);
    }
}
