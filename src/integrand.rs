/// A scalar function that can be handed to the Monte Carlo estimators.
///
/// Every `Fn(f64) -> f64` closure is an integrand with an unrestricted domain, which makes it
/// easy to exercise the estimators with synthetic functions whose integral is known.
///
/// # Examples
///
/// ```
/// use betadecay::Integrand;
///
/// let ramp = |x: f64| 2.0 * x;
/// assert_eq!(ramp.density(1.5), 3.0);
/// assert!(ramp.domain().is_none());
/// ```
pub trait Integrand {
    /// Value of the function at `x`.
    ///
    /// Callers guarantee that `x` lies inside [`Integrand::domain`] when one is declared.
    fn density(&self, x: f64) -> f64;

    /// Closed interval on which [`Integrand::density`] is defined, if restricted.
    fn domain(&self) -> Option<(f64, f64)> {
        None
    }
}

impl<F> Integrand for F
where
    F: Fn(f64) -> f64,
{
    fn density(&self, x: f64) -> f64 {
        self(x)
    }
}
