// Copyright @yucwang 2026

use crate::core::scene::{Scene, SceneObject};
use crate::math::aabb::AABB;
use crate::math::constants::Vector3f;
use crate::math::spectrum::RGBColor;
use crate::sensors::camera::Camera;

/// Camera pose the demo scene opens with.
pub fn demo_camera() -> Camera {
    Camera::new(120.0, 135.0, 0.0, Vector3f::new(3.5, 1.85, 3.0))
}

/// A slightly rough floor, a staircase of three blue glass panes that get
/// more mirror-like toward the top, and a red back wall.
pub fn demo_scene() -> Scene {
    let objects = vec![
        SceneObject::new(AABB::from_bounds(-5.0, 0.0, -5.0, 5.0, 0.01, 5.0), RGBColor::GRAY)
            .with_reflectivity(0.1)
            .with_roughness(0.3)
            .with_name("floor"),
        SceneObject::new(AABB::from_bounds(0.0, 0.5, 0.0, 3.0, 1.5, 0.1), RGBColor::BLUE)
            .with_reflectivity(0.2)
            .with_transparency(0.5)
            .with_roughness(0.1)
            .with_refractive_index(1.5)
            .with_name("pane_low"),
        SceneObject::new(AABB::from_bounds(0.0, 1.5, 0.0, 2.0, 2.5, 0.1), RGBColor::BLUE)
            .with_reflectivity(0.4)
            .with_transparency(0.3)
            .with_roughness(0.3)
            .with_refractive_index(1.5)
            .with_name("pane_mid"),
        SceneObject::new(AABB::from_bounds(0.0, 2.5, 0.0, 1.0, 3.5, 0.1), RGBColor::BLUE)
            .with_reflectivity(0.7)
            .with_transparency(0.1)
            .with_roughness(0.7)
            .with_refractive_index(1.5)
            .with_name("pane_high"),
        SceneObject::new(AABB::from_bounds(-5.0, 0.0, 3.0, 5.0, 3.0, 3.1), RGBColor::RED)
            .with_reflectivity(0.1)
            .with_roughness(0.05)
            .with_name("back_wall"),
    ];
    Scene::with_objects(demo_camera(), objects)
}
