//! Capability trait for section coefficient estimation.

/// Section (2-D) aerodynamic coefficients as functions of span position `y`,
/// local angle of attack `alpha` (radians), and control-surface deflection
/// `delta` (brake fraction, `0..=1` per side).
///
/// Implementations are deterministic pure functions, suitable for shared
/// read-only use across parallel solves. An `alpha` outside a model's valid
/// range yields `NaN`; callers decide whether that is fatal (the circulation
/// solver treats it as divergence).
pub trait SectionCoefficients: Send + Sync {
    /// Section lift coefficient.
    fn cl(&self, y: f64, alpha: f64, delta: f64) -> f64;

    /// Lift-curve slope `dCl/dalpha` at the given state.
    fn cl_alpha(&self, y: f64, alpha: f64, delta: f64) -> f64;

    /// Section drag coefficient.
    fn cd(&self, y: f64, alpha: f64, delta: f64) -> f64;

    /// Section pitching-moment coefficient about the quarter chord.
    fn cm(&self, y: f64, alpha: f64, delta: f64) -> f64;
}
