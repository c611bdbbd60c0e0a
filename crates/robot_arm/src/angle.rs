//! Wrapped angles
//!
//! Every accumulated joint angle lives in the half-open interval (-π, π].
//! [`Angle`] is the only way to hold one, so a raw unwrapped value can never
//! be stored by accident.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::frame::Axis;

/// Reduce an angle in radians into (-π, π].
///
/// Values already in range are returned untouched, which makes the function
/// exactly idempotent. Non-finite input yields NaN.
///
/// # Example
/// ```rust
/// use robot_arm::angle::wrap_to_pi;
/// use std::f64::consts::PI;
///
/// assert_eq!(wrap_to_pi(-PI), PI);
/// assert!((wrap_to_pi(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
/// ```
pub fn wrap_to_pi(radians: f64) -> f64 {
    if radians > -PI && radians <= PI {
        return radians;
    }
    if !radians.is_finite() {
        return f64::NAN;
    }

    let wrapped = PI - (PI - radians).rem_euclid(TAU);
    // rem_euclid may round up to TAU for tiny negative inputs
    if wrapped <= -PI { PI } else { wrapped }
}

/// An angle in radians, always wrapped to (-π, π]
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "f64", into = "f64"))]
pub struct Angle(f64);

impl Angle {
    /// The zero angle
    pub const ZERO: Self = Self(0.0);

    /// Create an angle, wrapping the value into (-π, π]
    pub fn from_radians(radians: f64) -> Self {
        Self(wrap_to_pi(radians))
    }

    /// Create an angle from degrees
    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    /// Get the wrapped value in radians
    pub fn radians(self) -> f64 {
        self.0
    }

    /// Get the wrapped value in degrees
    pub fn degrees(self) -> f64 {
        self.0.to_degrees()
    }

    /// Shortest signed rotation that takes `self` to `target`
    pub fn delta_to(self, target: Angle) -> Angle {
        target - self
    }
}

impl From<f64> for Angle {
    fn from(radians: f64) -> Self {
        Self::from_radians(radians)
    }
}

impl From<Angle> for f64 {
    fn from(angle: Angle) -> Self {
        angle.0
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle::from_radians(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle::from_radians(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle::from_radians(-self.0)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}

/// Accumulated rotation about each principal axis
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotations {
    pub x: Angle,
    pub y: Angle,
    pub z: Angle,
}

impl Rotations {
    /// Get the accumulated angle about an axis
    pub fn get(&self, axis: Axis) -> Angle {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Add a rotation about an axis, wrapping the result
    pub fn accumulate(&mut self, axis: Axis, delta: Angle) {
        let slot = match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        };
        *slot = *slot + delta;
    }

    /// Angles in radians, x, y, z order
    pub fn to_array(&self) -> [f64; 3] {
        [self.x.radians(), self.y.radians(), self.z.radians()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_log::test;

    #[test]
    fn test_wrap_in_range_is_identity() {
        for value in [0.0, 0.1, -0.1, 1.0, -3.0, PI, -PI + 1e-12] {
            assert_eq!(wrap_to_pi(value), value);
        }
    }

    #[test]
    fn test_wrap_negative_pi_maps_to_pi() {
        assert_eq!(wrap_to_pi(-PI), PI);

        for value in [3.0 * PI, -3.0 * PI] {
            let wrapped = wrap_to_pi(value);
            assert!(wrapped > -PI && wrapped <= PI);
            assert_relative_eq!(wrapped.abs(), PI, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_wrap_out_of_range() {
        assert_relative_eq!(wrap_to_pi(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(wrap_to_pi(-3.0 * PI / 2.0), PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(wrap_to_pi(TAU + 0.25), 0.25, epsilon = 1e-12);
        assert_relative_eq!(wrap_to_pi(-10.0 * TAU - 0.25), -0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_wrap_tiny_negative_offset() {
        let wrapped = wrap_to_pi(-PI - 1e-300);
        assert!(wrapped > -PI && wrapped <= PI);
    }

    #[test]
    fn test_wrap_non_finite() {
        assert!(wrap_to_pi(f64::INFINITY).is_nan());
        assert!(wrap_to_pi(f64::NAN).is_nan());
    }

    #[test]
    fn test_angle_arithmetic_wraps() {
        let a = Angle::from_radians(3.0);
        let b = Angle::from_radians(0.5);
        let sum = a + b;
        assert_relative_eq!(sum.radians(), 3.5 - TAU, epsilon = 1e-12);

        let diff = Angle::from_radians(-3.0) - Angle::from_radians(3.0);
        assert_relative_eq!(diff.radians(), TAU - 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_delta_to_takes_short_way() {
        let current = Angle::from_radians(PI - 0.1);
        let target = Angle::from_radians(-PI + 0.1);
        assert_relative_eq!(current.delta_to(target).radians(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_degrees_round_trip() {
        let angle = Angle::from_degrees(270.0);
        assert_relative_eq!(angle.degrees(), -90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotations_accumulate_per_axis() {
        let mut rotations = Rotations::default();
        rotations.accumulate(Axis::Y, Angle::from_radians(3.0));
        rotations.accumulate(Axis::Y, Angle::from_radians(3.0));
        rotations.accumulate(Axis::Z, Angle::from_radians(-0.5));

        assert_relative_eq!(rotations.get(Axis::Y).radians(), 6.0 - TAU, epsilon = 1e-12);
        assert_relative_eq!(rotations.get(Axis::Z).radians(), -0.5, epsilon = 1e-12);
        assert_eq!(rotations.get(Axis::X), Angle::ZERO);
        assert_eq!(rotations.to_array()[2], -0.5);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Angle::ZERO), "0.0000 rad");
    }
}
