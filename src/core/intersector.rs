// Copyright @yucwang 2026

use crate::core::interaction::RaycastResult;
use crate::core::scene::{ObjectId, SceneObject};
use crate::math::aabb::AABB;
use crate::math::constants::{EPSILON, Float, SLAB_EPSILON, Vector3f};
use crate::math::ray::Ray3f;

/// One of the six faces of an axis-aligned box.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoxFace {
    NegX,
    PosX,
    NegY,
    PosY,
    NegZ,
    PosZ,
}

impl BoxFace {
    pub const ALL: [BoxFace; 6] = [
        BoxFace::NegX, BoxFace::PosX,
        BoxFace::NegY, BoxFace::PosY,
        BoxFace::NegZ, BoxFace::PosZ,
    ];

    fn on_axis(axis: usize, positive: bool) -> Self {
        match (axis, positive) {
            (0, false) => BoxFace::NegX,
            (0, true) => BoxFace::PosX,
            (1, false) => BoxFace::NegY,
            (1, true) => BoxFace::PosY,
            (_, false) => BoxFace::NegZ,
            (_, true) => BoxFace::PosZ,
        }
    }

    pub fn axis(&self) -> usize {
        match self {
            BoxFace::NegX | BoxFace::PosX => 0,
            BoxFace::NegY | BoxFace::PosY => 1,
            BoxFace::NegZ | BoxFace::PosZ => 2,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, BoxFace::PosX | BoxFace::PosY | BoxFace::PosZ)
    }

    /// Outward unit normal.
    pub fn normal(&self) -> Vector3f {
        let mut n = Vector3f::zeros();
        n[self.axis()] = if self.is_positive() { 1.0 } else { -1.0 };
        n
    }

    fn plane_distance(&self, aabb: &AABB, p: &Vector3f) -> Float {
        let axis = self.axis();
        let plane = if self.is_positive() { aabb.max()[axis] } else { aabb.min()[axis] };
        (p[axis] - plane).abs()
    }

    /// Face whose plane lies closest to `p`; ties resolve in `ALL` order.
    pub fn nearest_to(aabb: &AABB, p: &Vector3f) -> Self {
        let mut best = BoxFace::NegX;
        let mut best_dist = Float::MAX;
        for face in BoxFace::ALL.iter() {
            let dist = face.plane_distance(aabb, p);
            if dist < best_dist {
                best_dist = dist;
                best = *face;
            }
        }
        best
    }
}

/// Forward intersection of a ray with a box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoxHit {
    pub distance: Float,
    pub point: Vector3f,
    pub face: BoxFace,
}

impl BoxHit {
    pub fn normal(&self) -> Vector3f {
        self.face.normal()
    }
}

/// Slab test. Returns the nearest hit farther than the bias epsilon: the
/// entry face when the origin is outside the box, the exit face when it is
/// inside. The direction does not need to be normalized; `distance` is in
/// units of the direction's length.
pub fn intersect_box(ray: &Ray3f, aabb: &AABB) -> Option<BoxHit> {
    let o = ray.origin();
    let d = ray.dir();
    let p_min = aabb.min();
    let p_max = aabb.max();

    let mut t_min = Float::NEG_INFINITY;
    let mut t_max = Float::INFINITY;
    let mut near_face: Option<BoxFace> = None;
    let mut far_face: Option<BoxFace> = None;

    for axis in 0..3 {
        let dir = d[axis];
        if dir.abs() < SLAB_EPSILON {
            // Parallel to this slab: inside it or never.
            if o[axis] < p_min[axis] || o[axis] > p_max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let mut t0 = (p_min[axis] - o[axis]) * inv;
        let mut t1 = (p_max[axis] - o[axis]) * inv;
        // Moving toward +axis enters through the min plane.
        let mut entry = BoxFace::on_axis(axis, false);
        let mut exit = BoxFace::on_axis(axis, true);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
            std::mem::swap(&mut entry, &mut exit);
        }

        if t0 > t_min {
            t_min = t0;
            near_face = Some(entry);
        }
        if t1 < t_max {
            t_max = t1;
            far_face = Some(exit);
        }
    }

    if t_max < t_min - SLAB_EPSILON {
        return None;
    }

    let (distance, face) = if t_min > EPSILON {
        (t_min, near_face)
    } else {
        (t_max, far_face)
    };
    if distance < EPSILON || !distance.is_finite() {
        return None;
    }

    let point = ray.at(distance);
    let face = face.unwrap_or_else(|| BoxFace::nearest_to(aabb, &point));
    Some(BoxHit { distance, point, face })
}

/// Intersects `ray` with one scene object.
pub fn raycast_object<'a>(ray: &Ray3f, id: ObjectId, object: &'a SceneObject) -> Option<RaycastResult<'a>> {
    let hit = intersect_box(ray, &object.bounding_box)?;
    Some(RaycastResult::new(hit.point, hit.normal(), hit.distance, id, object))
}
