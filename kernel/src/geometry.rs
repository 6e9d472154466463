//! Vector helpers and the angular cost function.
//!
//! Node coordinates are read as-is; the only geometry the engine performs is
//! comparing a branch direction (parent → child) with a reference direction.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};

/// A 3D point or direction.
pub type Vec3 = [f64; 3];

/// Component-wise `a - b`.
#[must_use]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[must_use]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Euclidean length.
#[must_use]
pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// Whether every component is finite and the vector has non-zero length.
#[must_use]
pub fn is_usable_direction(a: Vec3) -> bool {
    a.iter().all(|c| c.is_finite()) && norm(a) > 0.0
}

/// Angle in radians between two directions, in `[0, π]`.
///
/// The cosine is clipped to `[-1, 1]` before `acos` so rounding on
/// (anti-)parallel vectors never produces `NaN`. A zero-length input has no
/// direction and is treated as orthogonal (`π/2`).
#[must_use]
pub fn angle_between(v: Vec3, t: Vec3) -> f64 {
    let denom = norm(v) * norm(t);
    if denom == 0.0 || !denom.is_finite() {
        return FRAC_PI_2;
    }
    (dot(v, t) / denom).clamp(-1.0, 1.0).acos()
}

/// Parameterised angular cost: `(angle / div) ^ exp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularCost {
    pub exp: f64,
    pub div: f64,
}

impl AngularCost {
    /// Used to score permutations during search: the raw angle in radians.
    pub const SEARCH: Self = Self { exp: 1.0, div: 1.0 };

    /// Stored as a node's final `cost` and read by quality reporting.
    pub const DIAGNOSTIC: Self = Self {
        exp: 2.0,
        div: FRAC_PI_3,
    };

    /// Cost of the angle between the actual direction `v` and target `t`.
    #[must_use]
    pub fn cost(&self, v: Vec3, t: Vec3) -> f64 {
        self.cost_of_angle(angle_between(v, t))
    }

    #[must_use]
    pub fn cost_of_angle(&self, angle: f64) -> f64 {
        (angle / self.div).powf(self.exp)
    }
}

impl Default for AngularCost {
    fn default() -> Self {
        Self::DIAGNOSTIC
    }
}
