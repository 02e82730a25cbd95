// Copyright @yucwang 2026

use super::constants::{Float, Vector3f};

/// Value-type helpers on top of nalgebra's `Vector3`.
///
/// Addition, subtraction, scaling, `dot` and `cross` come straight from
/// nalgebra; this trait fills in the operations the tracer relies on with
/// degenerate-input behavior that never produces NaN.
pub trait VectorOps: Sized {
    /// Unit vector in the same direction, or the zero vector for zero length.
    fn normalize_or_zero(&self) -> Self;
    fn lerp_to(&self, target: &Self, alpha: Float) -> Self;
    fn component_min(&self, other: &Self) -> Self;
    fn component_max(&self, other: &Self) -> Self;
    fn midpoint(&self, other: &Self) -> Self;
    fn distance(&self, other: &Self) -> Float;
    fn distance_squared(&self, other: &Self) -> Float;
    /// Division by a scalar; `None` when the divisor is zero.
    fn divide(&self, scalar: Float) -> Option<Self>;
}

impl VectorOps for Vector3f {
    fn normalize_or_zero(&self) -> Self {
        let len = self.norm();
        if len > 0.0 {
            self / len
        } else {
            Vector3f::zeros()
        }
    }

    fn lerp_to(&self, target: &Self, alpha: Float) -> Self {
        self + (target - self) * alpha
    }

    fn component_min(&self, other: &Self) -> Self {
        Vector3f::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    fn component_max(&self, other: &Self) -> Self {
        Vector3f::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    fn midpoint(&self, other: &Self) -> Self {
        (self + other) * 0.5
    }

    fn distance(&self, other: &Self) -> Float {
        self.distance_squared(other).sqrt()
    }

    fn distance_squared(&self, other: &Self) -> Float {
        (self - other).norm_squared()
    }

    fn divide(&self, scalar: Float) -> Option<Self> {
        if scalar == 0.0 {
            None
        } else {
            Some(self / scalar)
        }
    }
}
