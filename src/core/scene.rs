// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::Float;
use crate::math::spectrum::RGBColor;
use crate::sensors::camera::Camera;

/// Stable handle of an object inside its `Scene`, assigned in insertion order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl ObjectId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An axis-aligned box with a simple reflect/refract/absorb material.
///
/// Material parameters are stored as given. They are clamped when the
/// tracer reads them, so `effective_reflectivity + effective_transparency`
/// never exceeds one and the remainder is absorbed.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub reflectivity: Float,
    pub transparency: Float,
    pub roughness: Float,
    pub refractive_index: Float,
    pub base_color: RGBColor,
    pub bounding_box: AABB,
    pub name: Option<String>,
}

impl SceneObject {
    /// Opaque, perfectly diffuse-looking box with an air-like index.
    pub fn new(bounding_box: AABB, base_color: RGBColor) -> Self {
        Self {
            reflectivity: 0.0,
            transparency: 0.0,
            roughness: 0.0,
            refractive_index: 1.0,
            base_color,
            bounding_box,
            name: None,
        }
    }

    pub fn with_reflectivity(mut self, reflectivity: Float) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    pub fn with_transparency(mut self, transparency: Float) -> Self {
        self.transparency = transparency;
        self
    }

    pub fn with_roughness(mut self, roughness: Float) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_refractive_index(mut self, refractive_index: Float) -> Self {
        self.refractive_index = refractive_index;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn effective_reflectivity(&self) -> Float {
        clamp_unit(self.reflectivity)
    }

    pub fn effective_transparency(&self) -> Float {
        clamp_unit(self.transparency).min(1.0 - self.effective_reflectivity())
    }

    pub fn absorption(&self) -> Float {
        (1.0 - self.effective_reflectivity() - self.effective_transparency()).max(0.0)
    }

    pub fn effective_roughness(&self) -> Float {
        clamp_unit(self.roughness)
    }

    pub fn effective_refractive_index(&self) -> Float {
        if self.refractive_index > 0.0 {
            self.refractive_index
        } else {
            1.0
        }
    }
}

fn clamp_unit(v: Float) -> Float {
    if v.is_nan() {
        0.0
    } else {
        v.max(0.0).min(1.0)
    }
}

/// Ordered object list plus the camera. Objects are never removed or
/// mutated once added, so `ObjectId`s stay valid for the scene's lifetime.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    camera: Camera,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self { objects: Vec::new(), camera }
    }

    pub fn with_objects(camera: Camera, objects: Vec<SceneObject>) -> Self {
        Self { objects, camera }
    }

    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().enumerate().map(|(idx, obj)| (ObjectId(idx), obj))
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn bounds(&self) -> Option<AABB> {
        let mut iter = self.objects.iter();
        let first = iter.next()?.bounding_box;
        Some(iter.fold(first, |acc, obj| acc.union(&obj.bounding_box)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;

    #[test]
    fn test_material_clamping() {
        let bbox = AABB::from_bounds(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let obj = SceneObject::new(bbox, RGBColor::RED)
            .with_reflectivity(0.7)
            .with_transparency(0.6);
        assert!((obj.effective_reflectivity() - 0.7).abs() < 1e-12);
        assert!((obj.effective_transparency() - 0.3).abs() < 1e-12);
        assert!(obj.absorption().abs() < 1e-12);

        let wild = SceneObject::new(bbox, RGBColor::RED)
            .with_reflectivity(-1.0)
            .with_transparency(2.0)
            .with_refractive_index(0.0);
        assert_eq!(wild.effective_reflectivity(), 0.0);
        assert_eq!(wild.effective_transparency(), 1.0);
        assert_eq!(wild.effective_refractive_index(), 1.0);
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut scene = Scene::new(Camera::default());
        assert!(scene.is_empty());
        assert_eq!(scene.bounds(), None);

        let a = scene.add_object(SceneObject::new(AABB::from_bounds(0.0, 0.0, 0.0, 1.0, 1.0, 1.0), RGBColor::RED));
        let b = scene.add_object(SceneObject::new(AABB::from_bounds(2.0, 2.0, 2.0, 3.0, 3.0, 3.0), RGBColor::BLUE));
        assert_eq!(a, ObjectId(0));
        assert_eq!(b, ObjectId(1));
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.object(b).map(|o| o.base_color), Some(RGBColor::BLUE));
        assert_eq!(scene.object(ObjectId(5)), None);
        assert_eq!(scene.iter().map(|(id, _)| id.index()).collect::<Vec<_>>(), vec![0, 1]);

        let bounds = scene.bounds().unwrap();
        assert_eq!(bounds.min(), Vector3f::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max(), Vector3f::new(3.0, 3.0, 3.0));
    }
}
