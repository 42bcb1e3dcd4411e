//! Wagner indicial lift functions used as step-response references.
//!
//! All functions take the convective time `τ = U t / (c/2)` and return the
//! lift after a unit step in angle of attack normalised by its final value.

/// R.T. Jones coefficients of the two-term Wagner approximation.
pub const JONES_A1: f64 = 0.165;
pub const JONES_A2: f64 = 0.335;
pub const JONES_B1: f64 = 0.0455;
pub const JONES_B2: f64 = 0.3;

/// Two-exponential approximation `1 − A1 e^(−b1 τ) − A2 e^(−b2 τ)`.
pub fn two_term(a1: f64, a2: f64, b1: f64, b2: f64, tau: f64) -> f64 {
    1.0 - a1 * (-b1 * tau).exp() - a2 * (-b2 * tau).exp()
}

/// R.T. Jones approximation of the Wagner function.
pub fn jones(tau: f64) -> f64 {
    two_term(JONES_A1, JONES_A2, JONES_B1, JONES_B2, tau)
}

/// Garrick's rational approximation `(τ + 2) / (τ + 4)`.
pub fn garrick(tau: f64) -> f64 {
    (tau + 2.0) / (tau + 4.0)
}

/// Convective time `τ = 2 U t / c`.
pub fn convective_time(u: f64, chord: f64, t: f64) -> f64 {
    2.0 * u * t / chord
}

/// Physical time reached after `tau` convective units.
pub fn physical_time(u: f64, chord: f64, tau: f64) -> f64 {
    tau * chord / (2.0 * u)
}
