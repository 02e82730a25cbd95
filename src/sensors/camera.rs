// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::vector::VectorOps;

/// First-person pinhole camera. `fov` is the horizontal field of view in
/// degrees; `yaw` and `pitch` are in degrees as well.
///
/// The input layer mutates the pose between frames; renderers copy it once
/// at the start of every pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub fov: Float,
    pub yaw: Float,
    pub pitch: Float,
    pub location: Vector3f,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 90.0,
            yaw: 0.0,
            pitch: 0.0,
            location: Vector3f::zeros(),
        }
    }
}

const PITCH_LIMIT: Float = 89.0;

impl Camera {
    pub fn new(fov: Float, yaw: Float, pitch: Float, location: Vector3f) -> Self {
        Self { fov, yaw, pitch, location }
    }

    /// Direction the camera looks along for the current yaw and pitch.
    pub fn look_direction(&self) -> Vector3f {
        let pitch = self.pitch.to_radians();
        let yaw = self.yaw.to_radians();

        Vector3f::new(
            -yaw.sin() * pitch.cos(),
            -pitch.sin(),
            yaw.cos() * pitch.cos(),
        )
    }

    /// Rotates a camera-space vector (looking down +z) into world space:
    /// yaw about the y axis, then pitch about the x axis.
    pub fn rotate_by_yaw_pitch(&self, v: &Vector3f) -> Vector3f {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let rx = v.x * cos_yaw - v.z * sin_yaw;
        let rz = v.x * sin_yaw + v.z * cos_yaw;

        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();
        let ry = v.y * cos_pitch - rz * sin_pitch;
        let rz2 = v.y * sin_pitch + rz * cos_pitch;

        Vector3f::new(rx, ry, rz2)
    }

    /// Primary ray through the image-plane point `(sample_x, sample_y)`,
    /// given in pixel units where `(0, 0)` is the top-left corner.
    pub fn primary_ray(&self, sample_x: Float, sample_y: Float, width: usize, height: usize) -> Ray3f {
        let width = width.max(1) as Float;
        let height = height.max(1) as Float;
        let aspect = width / height;
        let horizontal_half_tan = (self.fov.to_radians() * 0.5).tan();
        let vertical_half_tan = horizontal_half_tan / aspect;

        let ndc_x = (2.0 * sample_x / width) - 1.0;
        let ndc_y = 1.0 - (2.0 * sample_y / height);

        let dir_camera = Vector3f::new(ndc_x * horizontal_half_tan, ndc_y * vertical_half_tan, 1.0)
            .normalize_or_zero();
        Ray3f::new(self.location, self.rotate_by_yaw_pitch(&dir_camera))
    }

    pub fn translate(&mut self, delta: &Vector3f) {
        self.location += delta;
    }

    /// Turns the camera; pitch is clamped short of straight up/down.
    pub fn rotate(&mut self, d_yaw: Float, d_pitch: Float) {
        self.yaw = (self.yaw + d_yaw) % 360.0;
        self.pitch = (self.pitch + d_pitch).max(-PITCH_LIMIT).min(PITCH_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_without_rotation() {
        let cam = Camera::new(90.0, 0.0, 0.0, Vector3f::new(1.0, 2.0, 3.0));
        let ray = cam.primary_ray(2.0, 2.0, 4, 4);
        let dir = ray.dir();

        assert_eq!(ray.origin(), Vector3f::new(1.0, 2.0, 3.0));
        assert!(dir.x.abs() < 1e-12);
        assert!(dir.y.abs() < 1e-12);
        assert!((dir.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_corner_ray_spans_fov() {
        let cam = Camera::new(90.0, 0.0, 0.0, Vector3f::zeros());
        let dir = cam.primary_ray(0.0, 2.0, 4, 4).dir();

        // Left edge of a 90 degree horizontal fov sits at 45 degrees.
        assert!((dir.x + dir.z).abs() < 1e-12);
        assert!(dir.x < 0.0);
    }

    #[test]
    fn test_top_rows_look_up() {
        let cam = Camera::new(90.0, 0.0, 0.0, Vector3f::zeros());
        assert!(cam.primary_ray(2.0, 0.0, 4, 4).dir().y > 0.0);
        assert!(cam.primary_ray(2.0, 4.0, 4, 4).dir().y < 0.0);
    }

    #[test]
    fn test_yaw_rotation() {
        let cam = Camera::new(90.0, 90.0, 0.0, Vector3f::zeros());
        let forward = cam.rotate_by_yaw_pitch(&Vector3f::new(0.0, 0.0, 1.0));
        assert!((forward.x + 1.0).abs() < 1e-12);
        assert!(forward.z.abs() < 1e-12);

        let look = cam.look_direction();
        assert!((look - forward).norm() < 1e-12);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.rotate(370.0, 120.0);
        assert!((cam.yaw - 10.0).abs() < 1e-9);
        assert_eq!(cam.pitch, PITCH_LIMIT);
        cam.translate(&Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(cam.location, Vector3f::new(0.0, 1.0, 0.0));
    }
}
