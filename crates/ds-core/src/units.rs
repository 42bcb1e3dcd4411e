// ds-core/src/units.rs

use uom::si::f64::{
    Angle as UomAngle, AngularVelocity as UomAngularVelocity, Length as UomLength,
    Time as UomTime, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Angle = UomAngle;
pub type AngularVelocity = UomAngularVelocity;
pub type Length = UomLength;
pub type Time = UomTime;
pub type Velocity = UomVelocity;

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
pub fn rad(v: f64) -> Angle {
    use uom::si::angle::radian;
    Angle::new::<radian>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn rad_per_s(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::radian_per_second;
    AngularVelocity::new::<radian_per_second>(v)
}

/// Angle value in radians.
#[inline]
pub fn to_rad(a: Angle) -> f64 {
    use uom::si::angle::radian;
    a.get::<radian>()
}

/// Angle value in degrees.
#[inline]
pub fn to_deg(a: Angle) -> f64 {
    use uom::si::angle::degree;
    a.get::<degree>()
}

#[inline]
pub fn deg_to_rad(v: f64) -> f64 {
    to_rad(deg(v))
}

#[inline]
pub fn rad_to_deg(v: f64) -> f64 {
    to_deg(rad(v))
}

/// Convective time unit `Tu = c / (2U)`: the time the flow needs to travel half a chord.
pub fn convective_time_unit(chord: Length, u: Velocity) -> Time {
    chord / (2.0 * u)
}

/// Angular frequency matching the reduced frequency `k = ω c / (2U)`.
pub fn omega_from_reduced_frequency(k: f64, chord: Length, u: Velocity) -> AngularVelocity {
    use uom::si::length::meter;
    use uom::si::velocity::meter_per_second;
    rad_per_s(2.0 * u.get::<meter_per_second>() * k / chord.get::<meter>())
}

/// Reduced frequency `k = ω c / (2U)` of an oscillation.
pub fn reduced_frequency(omega: AngularVelocity, chord: Length, u: Velocity) -> f64 {
    use uom::si::angular_velocity::radian_per_second;
    use uom::si::length::meter;
    use uom::si::velocity::meter_per_second;
    omega.get::<radian_per_second>() * chord.get::<meter>() / (2.0 * u.get::<meter_per_second>())
}

pub mod constants {
    /// Velocity below which convective time scales are treated as infinite (m/s).
    pub const U_MIN_MPS: f64 = 1e-6;
}
