//! Six-component spatial vectors.
//!
//! Convention: `[angular; linear]`. As a velocity this is a twist whose
//! linear part is measured at the ground origin; as a force it is a
//! moment/force pair whose moment is taken about a stated point.

use std::ops::{Add, AddAssign, Neg, Sub};

use glam::DVec3;

/// A spatial velocity (twist) or spatial force (wrench).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpatialVec {
    /// Angular velocity, or moment.
    pub angular: DVec3,
    /// Linear velocity, or force.
    pub linear: DVec3,
}

impl SpatialVec {
    pub const ZERO: Self = Self {
        angular: DVec3::ZERO,
        linear: DVec3::ZERO,
    };

    #[inline]
    pub fn new(angular: DVec3, linear: DVec3) -> Self {
        Self { angular, linear }
    }

    /// Velocity of the material point currently at `point` (ground frame).
    #[inline]
    pub fn station_velocity(&self, point: DVec3) -> DVec3 {
        self.linear + self.angular.cross(point)
    }

    /// Re-express a wrench applied at `from` as an equivalent wrench about `to`.
    #[inline]
    pub fn shift_force(&self, from: DVec3, to: DVec3) -> Self {
        Self {
            angular: self.angular + (from - to).cross(self.linear),
            linear: self.linear,
        }
    }

    /// The six scalars in `[angular; linear]` order.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.angular.x,
            self.angular.y,
            self.angular.z,
            self.linear.x,
            self.linear.y,
            self.linear.z,
        ]
    }

    #[inline]
    pub fn abs_diff_eq(&self, other: &Self, eps: f64) -> bool {
        self.angular.abs_diff_eq(other.angular, eps) && self.linear.abs_diff_eq(other.linear, eps)
    }
}

impl Add for SpatialVec {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.angular + rhs.angular, self.linear + rhs.linear)
    }
}

impl AddAssign for SpatialVec {
    fn add_assign(&mut self, rhs: Self) {
        self.angular += rhs.angular;
        self.linear += rhs.linear;
    }
}

impl Sub for SpatialVec {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.angular - rhs.angular, self.linear - rhs.linear)
    }
}

impl Neg for SpatialVec {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.angular, -self.linear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_velocity() {
        let v = SpatialVec::new(DVec3::Z, DVec3::new(1.0, 0.0, 0.0));
        // w x p = z x x = y
        let p = DVec3::X;
        assert!((v.station_velocity(p) - DVec3::new(1.0, 1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_shift_force() {
        let f = SpatialVec::new(DVec3::ZERO, DVec3::Z);
        let shifted = f.shift_force(DVec3::X, DVec3::ZERO);
        // Moment about origin of +z force at +x is x cross z = -y.
        assert!((shifted.angular - DVec3::NEG_Y).length() < 1e-12);
        assert_eq!(shifted.linear, DVec3::Z);

        let back = shifted.shift_force(DVec3::ZERO, DVec3::X);
        assert!(back.abs_diff_eq(&f, 1e-12));
    }

    #[test]
    fn test_ops() {
        let a = SpatialVec::new(DVec3::X, DVec3::Y);
        let b = SpatialVec::new(DVec3::Y, DVec3::Z);
        let mut c = a + b;
        assert_eq!(c.to_array(), [1.0, 1.0, 0.0, 0.0, 1.0, 1.0]);
        c += -b;
        assert_eq!(c, a);
        assert_eq!(a - a, SpatialVec::ZERO);
    }
}
