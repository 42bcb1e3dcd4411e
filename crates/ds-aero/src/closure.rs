//! Core trait for aerodynamic closure functions.

use std::sync::Arc;

/// Quasi-steady airfoil data consumed by the dynamic stall models.
///
/// Every function must return a finite value for any finite angle of attack,
/// including angles outside the range the underlying data was measured on:
/// dynamic excursions routinely go past static stall, so providers
/// extrapolate instead of failing.
///
/// Closures are deterministic functions of the angle, suitable for use from
/// several independent simulations at once.
pub trait AeroClosure: Send + Sync {
    /// Zero-lift angle of attack α0 (rad).
    fn alpha0(&self) -> f64;

    /// Linear lift-curve slope Clα (1/rad).
    fn cl_alpha(&self) -> f64;

    /// Quasi-steady lift coefficient.
    fn cl(&self, alpha: f64) -> f64;

    /// Quasi-steady drag coefficient.
    fn cd(&self, alpha: f64) -> f64;

    /// Inviscid lift, `Clα (α − α0)` by default.
    fn cl_inv(&self, alpha: f64) -> f64 {
        self.cl_alpha() * (alpha - self.alpha0())
    }

    /// Lift coefficient of the fully separated flow.
    fn cl_fs(&self, alpha: f64) -> f64;

    /// Static separation function, nominally in [0, 1].
    fn f_st(&self, alpha: f64) -> f64;
}

impl<T: AeroClosure + ?Sized> AeroClosure for &T {
    fn alpha0(&self) -> f64 {
        (**self).alpha0()
    }
    fn cl_alpha(&self) -> f64 {
        (**self).cl_alpha()
    }
    fn cl(&self, alpha: f64) -> f64 {
        (**self).cl(alpha)
    }
    fn cd(&self, alpha: f64) -> f64 {
        (**self).cd(alpha)
    }
    fn cl_inv(&self, alpha: f64) -> f64 {
        (**self).cl_inv(alpha)
    }
    fn cl_fs(&self, alpha: f64) -> f64 {
        (**self).cl_fs(alpha)
    }
    fn f_st(&self, alpha: f64) -> f64 {
        (**self).f_st(alpha)
    }
}

impl<T: AeroClosure + ?Sized> AeroClosure for Box<T> {
    fn alpha0(&self) -> f64 {
        (**self).alpha0()
    }
    fn cl_alpha(&self) -> f64 {
        (**self).cl_alpha()
    }
    fn cl(&self, alpha: f64) -> f64 {
        (**self).cl(alpha)
    }
    fn cd(&self, alpha: f64) -> f64 {
        (**self).cd(alpha)
    }
    fn cl_inv(&self, alpha: f64) -> f64 {
        (**self).cl_inv(alpha)
    }
    fn cl_fs(&self, alpha: f64) -> f64 {
        (**self).cl_fs(alpha)
    }
    fn f_st(&self, alpha: f64) -> f64 {
        (**self).f_st(alpha)
    }
}

impl<T: AeroClosure + ?Sized> AeroClosure for Arc<T> {
    fn alpha0(&self) -> f64 {
        (**self).alpha0()
    }
    fn cl_alpha(&self) -> f64 {
        (**self).cl_alpha()
    }
    fn cl(&self, alpha: f64) -> f64 {
        (**self).cl(alpha)
    }
    fn cd(&self, alpha: f64) -> f64 {
        (**self).cd(alpha)
    }
    fn cl_inv(&self, alpha: f64) -> f64 {
        (**self).cl_inv(alpha)
    }
    fn cl_fs(&self, alpha: f64) -> f64 {
        (**self).cl_fs(alpha)
    }
    fn f_st(&self, alpha: f64) -> f64 {
        (**self).f_st(alpha)
    }
}

/// Residual of the Kirchhoff blending law `Cl = f·Cl_inv + (1 − f)·Cl_fs` at `alpha`.
///
/// Both dynamic stall models rely on this identity for their steady limit, so
/// providers are expected to keep it small across the operating range.
pub fn blending_residual<C: AeroClosure + ?Sized>(closure: &C, alpha: f64) -> f64 {
    let f = closure.f_st(alpha);
    let blended = f * closure.cl_inv(alpha) + (1.0 - f) * closure.cl_fs(alpha);
    blended - closure.cl(alpha)
}
