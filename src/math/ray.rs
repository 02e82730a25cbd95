// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};
use super::vector::VectorOps;

/// A ray with an origin and a direction. The direction is kept exactly as
/// given; call `normalized` when a unit direction is required.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
}

impl Ray3f {
    pub fn new(o: Vector3f, d: Vector3f) -> Self {
        Self { origin: o, dir: d }
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    pub fn normalized(&self) -> Self {
        Self { origin: self.origin, dir: self.dir.normalize_or_zero() }
    }

    /// Ray leaving `point` along `dir`, nudged forward by `bias` so it
    /// does not immediately re-hit the surface it starts on.
    pub fn offset_from(point: Vector3f, dir: Vector3f, bias: Float) -> Self {
        Self { origin: point + dir * bias, dir }
    }
}

/* Tests for Ray */

#[cfg(test)]
mod tests {
    use super::Vector3f;
    use super::Ray3f;

    #[test]
    fn test_ray3f() {
        let o = Vector3f::new(0.0, 0.0, 0.0);
        let d = Vector3f::new(1.0, 0.0, 1.0);
        let ray = Ray3f::new(o, d);
        assert_eq!(o, ray.origin());
        assert_eq!(d, ray.dir());

        let v1 = ray.at(2.0);
        assert_eq!(v1, Vector3f::new(2.0, 0.0, 2.0));

        let unit = ray.normalized();
        assert!((unit.dir().norm() - 1.0).abs() < 1e-12);
        assert!((unit.dir()[0] - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_offset_ray() {
        let ray = Ray3f::offset_from(Vector3f::new(1.0, 1.0, 1.0), Vector3f::new(0.0, 1.0, 0.0), 0.5);
        assert_eq!(ray.origin(), Vector3f::new(1.0, 1.5, 1.0));
        assert_eq!(ray.dir(), Vector3f::new(0.0, 1.0, 0.0));
    }
}
