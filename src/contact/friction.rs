//! Regularized Stribeck friction.
//!
//! The friction coefficient as a function of slip speed `v` is
//!
//! ```text
//! μ(v) = min(v/vt, 1) · (μd + 2(μs - μd) / (1 + (v/vt)²)) + μv·v
//! ```
//!
//! Below the transition velocity `vt` the coefficient ramps linearly from
//! zero, so the friction force changes direction smoothly through zero slip
//! instead of flipping sign. It peaks at `μs` when `v = vt` and decays toward
//! `μd` (plus the viscous term) for fast sliding.

use glam::DVec3;

use super::material::FrictionCoefficients;

/// Slip speeds below this are treated as exactly zero.
const SLIP_EPSILON: f64 = 1e-14;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StribeckFriction {
    pub coefficients: FrictionCoefficients,
    /// Transition velocity `vt` in m/s (> 0).
    pub transition_velocity: f64,
}

impl StribeckFriction {
    pub fn new(coefficients: FrictionCoefficients, transition_velocity: f64) -> Self {
        Self {
            coefficients,
            transition_velocity,
        }
    }

    /// Effective friction coefficient at slip speed `speed`.
    pub fn coefficient(&self, speed: f64) -> f64 {
        let FrictionCoefficients {
            static_friction: us,
            dynamic_friction: ud,
            viscous_friction: uv,
        } = self.coefficients;
        let x = speed / self.transition_velocity;
        x.min(1.0) * (ud + 2.0 * (us - ud) / (1.0 + x * x)) + uv * speed
    }

    /// Friction force opposing the slip velocity `slip` for normal force
    /// magnitude `normal_force`.
    pub fn force(&self, slip: DVec3, normal_force: f64) -> DVec3 {
        let speed = slip.length();
        if normal_force <= 0.0 || speed < SLIP_EPSILON {
            return DVec3::ZERO;
        }
        slip * (-self.coefficient(speed) * normal_force / speed)
    }
}
