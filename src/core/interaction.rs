// Copyright @yucwang 2023

use crate::core::scene::{ObjectId, SceneObject};
use crate::math::constants::{Float, Vector3f};

/// One ray/object intersection. The normal is a unit vector facing the
/// side the ray arrived from once the tracer has oriented it.
#[derive(Debug, Clone, Copy)]
pub struct RaycastResult<'a> {
    point: Vector3f,
    normal: Vector3f,
    distance: Float,
    object_id: ObjectId,
    object: &'a SceneObject,
}

impl<'a> RaycastResult<'a> {
    pub fn new(point: Vector3f,
               normal: Vector3f,
               distance: Float,
               object_id: ObjectId,
               object: &'a SceneObject) -> Self {
        Self { point, normal, distance, object_id, object }
    }

    pub fn point(&self) -> Vector3f {
        self.point
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }

    pub fn distance(&self) -> Float {
        self.distance
    }

    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    pub fn object(&self) -> &'a SceneObject {
        self.object
    }

    pub fn with_normal(&self, normal: Vector3f) -> Self {
        Self { normal, ..*self }
    }
}
