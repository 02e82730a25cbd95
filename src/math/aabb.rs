// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

/// Axis-aligned bounding box. Every constructor sorts the corners, so
/// `p_min <= p_max` holds component-wise for every value of this type.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    p_min: Vector3f,
    p_max: Vector3f
}

impl AABB {
    pub fn new(a: Vector3f, b: Vector3f) -> Self {
        let mut min = Vector3f::new(0.0, 0.0, 0.0);
        let mut max = Vector3f::new(0.0, 0.0, 0.0);
        for idx in 0..3 {
            min[idx] = a[idx].min(b[idx]);
            max[idx] = a[idx].max(b[idx]);
        }
        Self { p_min: min, p_max: max }
    }

    pub fn from_bounds(min_x: Float, min_y: Float, min_z: Float,
                       max_x: Float, max_y: Float, max_z: Float) -> Self {
        Self::new(Vector3f::new(min_x, min_y, min_z), Vector3f::new(max_x, max_y, max_z))
    }

    pub fn from_center_and_size(center: Vector3f, size: Vector3f) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn min(&self) -> Vector3f {
        self.p_min
    }

    pub fn max(&self) -> Vector3f {
        self.p_max
    }

    pub fn center(&self) -> Vector3f {
        0.5 * self.p_min + 0.5 * self.p_max
    }

    pub fn size(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    pub fn extents(&self) -> Vector3f {
        self.size() * 0.5
    }

    pub fn width(&self) -> Float {
        self.p_max.x - self.p_min.x
    }

    pub fn height(&self) -> Float {
        self.p_max.y - self.p_min.y
    }

    pub fn depth(&self) -> Float {
        self.p_max.z - self.p_min.z
    }

    pub fn volume(&self) -> Float {
        self.width() * self.height() * self.depth()
    }

    pub fn surface_area(&self) -> Float {
        let a = self.width();
        let b = self.height();
        let c = self.depth();

        2.0 * (a*b + a*c + b*c)
    }

    pub fn contains_point(&self, p: &Vector3f) -> bool {
        (0..3).all(|idx| p[idx] >= self.p_min[idx] && p[idx] <= self.p_max[idx])
    }

    pub fn contains_aabb(&self, other: &AABB) -> bool {
        self.contains_point(&other.p_min) && self.contains_point(&other.p_max)
    }

    /// Touching boxes count as intersecting.
    pub fn intersects(&self, other: &AABB) -> bool {
        (0..3).all(|idx| other.p_min[idx] <= self.p_max[idx] && other.p_max[idx] >= self.p_min[idx])
    }

    pub fn intersection(&self, other: &AABB) -> Option<AABB> {
        if !self.intersects(other) {
            return None;
        }

        let mut min = self.p_min;
        let mut max = self.p_max;
        for idx in 0..3 {
            min[idx] = self.p_min[idx].max(other.p_min[idx]);
            max[idx] = self.p_max[idx].min(other.p_max[idx]);
        }
        Some(AABB::new(min, max))
    }

    pub fn union(&self, other: &AABB) -> AABB {
        let mut min = self.p_min;
        let mut max = self.p_max;
        for idx in 0..3 {
            min[idx] = self.p_min[idx].min(other.p_min[idx]);
            max[idx] = self.p_max[idx].max(other.p_max[idx]);
        }
        AABB::new(min, max)
    }

    pub fn expand(&self, amount: Float) -> AABB {
        self.expand_by_vector(&Vector3f::new(amount, amount, amount))
    }

    /// Grows each side by `amount`; negative amounts past the center flip
    /// through the constructor and stay normalized.
    pub fn expand_by_vector(&self, amount: &Vector3f) -> AABB {
        AABB::new(self.p_min - amount, self.p_max + amount)
    }

    pub fn closest_point(&self, p: &Vector3f) -> Vector3f {
        let mut closest = *p;
        for idx in 0..3 {
            closest[idx] = p[idx].min(self.p_max[idx]).max(self.p_min[idx]);
        }
        closest
    }

    /// Zero for points inside the box.
    pub fn distance_to_point(&self, p: &Vector3f) -> Float {
        let mut sum = 0.0;
        for idx in 0..3 {
            let d = (self.p_min[idx] - p[idx]).max(p[idx] - self.p_max[idx]).max(0.0);
            sum += d * d;
        }
        sum.sqrt()
    }

    pub fn translate(&self, translation: &Vector3f) -> AABB {
        AABB::new(self.p_min + translation, self.p_max + translation)
    }

    /// Uniform scaling about the center.
    pub fn scale(&self, factor: Float) -> AABB {
        AABB::from_center_and_size(self.center(), self.size() * factor)
    }

    pub fn scale_by_vector(&self, factors: &Vector3f) -> AABB {
        AABB::from_center_and_size(self.center(), self.size().component_mul(factors))
    }

    pub fn max_extent(&self) -> usize {
        let diagonal = self.size();
        if diagonal[0] > diagonal[1] && diagonal[0] > diagonal[2] {
            0
        } else if diagonal[1] > diagonal[2] {
            1
        } else {
            2
        }
    }
}

/* Test for AABB */
