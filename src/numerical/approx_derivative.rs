/// default step of the forward difference
pub const DEFAULT_DX: f64 = 1e-8;

/// Forward finite difference `(f(x + dx) - f(x)) / dx`.
///
/// First order in `dx`. With the default step about half of the significant digits
/// are lost to cancellation.
pub fn approx_derivative<F>(f: F, dx: f64) -> impl Fn(f64) -> f64
where
    F: Fn(f64) -> f64,
{
    move |x: f64| (f(x + dx) - f(x)) / dx
}
