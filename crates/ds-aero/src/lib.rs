//! ds-aero: quasi-steady aerodynamic closure functions.
//!
//! Dynamic stall models need more from an airfoil than its static polar. This
//! crate provides the closure contract they consume:
//! - quasi-steady lift and drag
//! - inviscid (attached-flow) lift
//! - fully separated lift
//! - static separation function `f_st`
//! - zero-lift angle and linear lift slope
//!
//! Two providers are included: an analytic Kirchhoff-flow airfoil and a
//! tabulated polar whose separation quantities are derived from (α, Cl, Cd)
//! rows. Angles are in radians everywhere.

pub mod closure;
pub mod error;
pub mod kirchhoff;
pub mod polar;

pub use closure::AeroClosure;
pub use error::{AeroError, AeroResult};
pub use kirchhoff::KirchhoffAirfoil;
pub use polar::{PolarRow, TabulatedPolar};
