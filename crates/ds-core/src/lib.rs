//! ds-core: shared foundation for the dynamic stall workspace.
//!
//! Contains:
//! - numeric (Real + float checks + table interpolation)
//! - units (uom SI types + constructors, angle and convective-time helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
