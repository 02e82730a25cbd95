// Copyright @yucwang 2026

use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBColor;

/// Turns one camera ray into a displayable color. Shared across render workers.
pub trait Integrator: Sync {
    fn trace_color(&self, scene: &Scene, ray: &Ray3f, rng: &mut LcgRng) -> RGBColor;
}
