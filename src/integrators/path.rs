// Copyright @yucwang 2026

use crate::core::integrator::Integrator;
use crate::core::interaction::RaycastResult;
use crate::core::intersector::raycast_object;
use crate::core::rng::LcgRng;
use crate::core::scene::{ObjectId, Scene};
use crate::core::settings::TracerSettings;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world};
use crate::math::constants::{Float, PI, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBColor;
use crate::math::vector::VectorOps;

const EXCLUSION_WORDS: usize = 4;

/// Energy below which color resolution stops walking the hit sequence.
const RESOLVE_ENERGY_FLOOR: Float = 0.001;

/// Objects a ray must not hit next, stored as a bitset over `ObjectId`s.
/// Ids past the capacity are never excluded; the origin bias still keeps
/// those rays off the surface they start on.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    words: [u64; EXCLUSION_WORDS],
}

impl ExclusionSet {
    pub const CAPACITY: usize = EXCLUSION_WORDS * 64;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(id: ObjectId) -> Self {
        Self::new().with(id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        let idx = id.index();
        idx < Self::CAPACITY && self.words[idx / 64] & (1u64 << (idx % 64)) != 0
    }

    pub fn with(mut self, id: ObjectId) -> Self {
        let idx = id.index();
        if idx < Self::CAPACITY {
            self.words[idx / 64] |= 1u64 << (idx % 64);
        }
        self
    }

    pub fn without(mut self, id: ObjectId) -> Self {
        let idx = id.index();
        if idx < Self::CAPACITY {
            self.words[idx / 64] &= !(1u64 << (idx % 64));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }
}

/// Hits produced by one primary ray, in depth-first order: a reflected
/// branch is fully walked before the transmitted branch of the same hit.
#[derive(Debug, Clone, Default)]
pub struct RaycastPath<'a> {
    hits: Vec<RaycastResult<'a>>,
}

impl<'a> RaycastPath<'a> {
    pub fn new(hits: Vec<RaycastResult<'a>>) -> Self {
        Self { hits }
    }

    pub fn hits(&self) -> &[RaycastResult<'a>] {
        &self.hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Front-to-back blend of base colors. Each hit keeps its absorbed share
    /// of the remaining energy; the last hit absorbs everything left.
    pub fn resolve_color(&self) -> RGBColor {
        if self.hits.is_empty() {
            return RGBColor::BLACK;
        }

        let last = self.hits.len() - 1;
        let mut accum = Vector3f::zeros();
        let mut remaining: Float = 1.0;
        for (i, hit) in self.hits.iter().enumerate() {
            let object = hit.object();
            let absorption = if i == last { 1.0 } else { object.absorption() };

            accum += object.base_color.to_vector() * (remaining * absorption);
            remaining *= 1.0 - absorption;
            if remaining < RESOLVE_ENERGY_FLOOR {
                break;
            }
        }

        RGBColor::from_vector(&accum)
    }
}

/// State carried down one branch of the walk.
#[derive(Debug, Copy, Clone)]
struct Branch {
    ray: Ray3f,
    energy: Float,
    medium_index: Float,
    depth: u32,
    excluded: ExclusionSet,
}

/// Recursive reflect/refract walk over a brute-force scanned scene.
#[derive(Debug, Clone, Default)]
pub struct PathTracer {
    settings: TracerSettings,
}

impl PathTracer {
    pub fn new(settings: TracerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TracerSettings {
        &self.settings
    }

    /// Walks every reflect/refract branch spawned by `ray`.
    pub fn trace<'a>(&self, scene: &'a Scene, ray: &Ray3f, rng: &mut LcgRng) -> RaycastPath<'a> {
        let mut hits = Vec::new();
        let primary = Branch {
            ray: ray.normalized(),
            energy: 1.0,
            medium_index: self.settings.ambient_refractive_index,
            depth: 0,
            excluded: ExclusionSet::new(),
        };
        self.trace_branch(scene, primary, rng, &mut hits);
        RaycastPath::new(hits)
    }

    /// Closest hit farther than the bias among objects not in `excluded`.
    /// Equal distances resolve to the object added to the scene first.
    pub fn closest_hit<'a>(&self, scene: &'a Scene, ray: &Ray3f,
                           excluded: &ExclusionSet) -> Option<RaycastResult<'a>> {
        let mut best: Option<RaycastResult<'a>> = None;
        for (id, object) in scene.iter() {
            if excluded.contains(id) {
                continue;
            }
            if let Some(hit) = raycast_object(ray, id, object) {
                if hit.distance() <= self.settings.bias {
                    continue;
                }
                if best.map_or(true, |b| hit.distance() < b.distance()) {
                    best = Some(hit);
                }
            }
        }
        best
    }

    fn trace_branch<'a>(&self, scene: &'a Scene, branch: Branch,
                        rng: &mut LcgRng, out: &mut Vec<RaycastResult<'a>>) {
        if branch.depth >= self.settings.max_depth || branch.energy < self.settings.energy_floor {
            return;
        }

        let hit = match self.closest_hit(scene, &branch.ray, &branch.excluded) {
            Some(hit) => hit,
            None => return,
        };

        let dir = branch.ray.dir();
        let entering = dir.dot(&hit.normal()) < 0.0;
        let normal = if entering { hit.normal() } else { -hit.normal() };
        let hit = hit.with_normal(normal);
        out.push(hit);

        let id = hit.object_id();
        let object = hit.object();
        let reflected_energy = branch.energy * object.effective_reflectivity();
        let refracted_energy = branch.energy * object.effective_transparency();
        // Branches that may legitimately meet this object again.
        let released = branch.excluded.without(id);

        if reflected_energy > self.settings.energy_floor {
            let excluded = if entering { ExclusionSet::single(id) } else { released };
            let next = Branch {
                ray: branch.ray,
                energy: reflected_energy,
                medium_index: branch.medium_index,
                depth: branch.depth + 1,
                excluded,
            };
            self.reflect_branch(scene, &hit, next, rng, out);
        }

        if refracted_energy > self.settings.energy_floor {
            let next_index = if entering {
                object.effective_refractive_index()
            } else {
                self.settings.ambient_refractive_index
            };
            let eta = branch.medium_index / next_index;
            let next = Branch {
                ray: branch.ray,
                energy: refracted_energy,
                medium_index: branch.medium_index,
                depth: branch.depth + 1,
                excluded: released,
            };

            match refract(&dir, &normal, eta) {
                Some(transmitted) => {
                    let ray = Ray3f::offset_from(hit.point(), transmitted, self.settings.bias);
                    self.trace_branch(scene, Branch { ray, medium_index: next_index, ..next }, rng, out);
                }
                // Total internal reflection: the transmitted budget bounces instead.
                None => self.reflect_branch(scene, &hit, next, rng, out),
            }
        }
    }

    /// Mirror reflection at `hit`, roughened, continuing as `next`.
    fn reflect_branch<'a>(&self, scene: &'a Scene, hit: &RaycastResult<'a>, next: Branch,
                          rng: &mut LcgRng, out: &mut Vec<RaycastResult<'a>>) {
        let normal = hit.normal();
        let mirror = reflect(&next.ray.dir(), &normal);
        let roughness = hit.object().effective_roughness();
        let dir = self.perturb(&mirror, &normal, roughness, rng);
        let ray = Ray3f::offset_from(hit.point(), dir, self.settings.bias);
        self.trace_branch(scene, Branch { ray, ..next }, rng, out);
    }

    /// Blends `dir` toward a random direction in a cone around `normal`
    /// whose half-angle grows with roughness.
    fn perturb(&self, dir: &Vector3f, normal: &Vector3f, roughness: Float, rng: &mut LcgRng) -> Vector3f {
        if roughness <= self.settings.roughness_threshold {
            return *dir;
        }

        let (tangent, bitangent) = build_tangent_frame(normal);
        let phi = 2.0 * PI * rng.next_float();
        let theta = rng.next_float() * roughness * PI * 0.5;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let local = Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);
        let scattered = local_to_world(&local, &tangent, &bitangent, normal);

        let blended = dir.lerp_to(&scattered, roughness).normalize_or_zero();
        if blended == Vector3f::zeros() {
            *dir
        } else {
            blended
        }
    }
}

impl Integrator for PathTracer {
    fn trace_color(&self, scene: &Scene, ray: &Ray3f, rng: &mut LcgRng) -> RGBColor {
        self.trace(scene, ray, rng).resolve_color()
    }
}

/// Mirror `dir` about `normal`.
pub fn reflect(dir: &Vector3f, normal: &Vector3f) -> Vector3f {
    dir - normal * (2.0 * dir.dot(normal))
}

/// Snell refraction of the unit direction `dir` through a surface whose
/// unit `normal` faces the incoming ray; `eta` is `n_incident / n_transmitted`.
/// `None` on total internal reflection.
pub fn refract(dir: &Vector3f, normal: &Vector3f, eta: Float) -> Option<Vector3f> {
    let cos_i = (-dir.dot(normal)).max(-1.0).min(1.0);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some((dir * eta + normal * (eta * cos_i - k.sqrt())).normalize_or_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::aabb::AABB;
    use crate::core::scene::SceneObject;
    use crate::sensors::camera::Camera;

    fn floor() -> SceneObject {
        SceneObject::new(AABB::from_bounds(-5.0, 0.0, -5.0, 5.0, 0.01, 5.0), RGBColor::GRAY)
    }

    fn down_ray() -> Ray3f {
        Ray3f::new(Vector3f::new(0.0, 5.0, 0.0), Vector3f::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn test_opaque_floor_resolves_to_base_color() {
        let mut scene = Scene::new(Camera::default());
        scene.add_object(floor());
        let tracer = PathTracer::default();

        let path = tracer.trace(&scene, &down_ray(), &mut LcgRng::new(1));
        assert_eq!(path.len(), 1);
        assert_eq!(path.hits()[0].normal(), Vector3f::new(0.0, 1.0, 0.0));
        assert!((path.hits()[0].distance() - 4.99).abs() < 1e-9);
        assert_eq!(path.resolve_color(), RGBColor::GRAY);
    }

    #[test]
    fn test_empty_space_is_black() {
        let mut scene = Scene::new(Camera::default());
        scene.add_object(floor());
        let tracer = PathTracer::default();

        let up = Ray3f::new(Vector3f::new(0.0, 5.0, 0.0), Vector3f::new(0.0, 1.0, 0.0));
        let path = tracer.trace(&scene, &up, &mut LcgRng::new(1));
        assert!(path.is_empty());
        assert_eq!(path.resolve_color(), RGBColor::BLACK);
    }

    #[test]
    fn test_single_hit_returns_base_color_for_any_material() {
        let materials = [(0.0, 0.0), (0.3, 0.2), (0.5, 0.5), (0.9, 0.0), (0.0, 1.0)];
        for (reflectivity, transparency) in materials.iter() {
            let object = SceneObject::new(AABB::from_bounds(0.0, 0.0, 0.0, 1.0, 1.0, 1.0), RGBColor::new(10, 200, 90))
                .with_reflectivity(*reflectivity)
                .with_transparency(*transparency);
            let hit = RaycastResult::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), 1.0, ObjectId(0), &object);
            assert_eq!(RaycastPath::new(vec![hit]).resolve_color(), RGBColor::new(10, 200, 90));
        }
    }

    #[test]
    fn test_mirror_blends_reflected_color() {
        let mut scene = Scene::new(Camera::default());
        let mirror = scene.add_object(
            SceneObject::new(AABB::from_bounds(-10.0, -1.0, -10.0, 10.0, 0.0, 10.0), RGBColor::BLACK)
                .with_reflectivity(0.5));
        let wall = scene.add_object(
            SceneObject::new(AABB::from_bounds(-10.0, 0.0, 5.0, 10.0, 10.0, 6.0), RGBColor::RED));
        let tracer = PathTracer::default();

        let ray = Ray3f::new(Vector3f::new(0.0, 5.0, -5.0), Vector3f::new(0.0, -1.0, 1.0));
        let path = tracer.trace(&scene, &ray, &mut LcgRng::new(3));
        let ids: Vec<ObjectId> = path.hits().iter().map(|h| h.object_id()).collect();
        assert_eq!(ids, vec![mirror, wall]);
        assert!((path.hits()[1].point() - Vector3f::new(0.0, 5.0, 5.0)).norm() < 1e-3);
        assert_eq!(path.resolve_color(), RGBColor::new(128, 0, 0));
    }

    #[test]
    fn test_clear_slab_is_seen_through() {
        let mut scene = Scene::new(Camera::default());
        let glass = scene.add_object(
            SceneObject::new(AABB::from_bounds(-2.0, 2.0, -2.0, 2.0, 3.0, 2.0), RGBColor::BLUE)
                .with_transparency(1.0));
        let ground = scene.add_object(floor());
        let tracer = PathTracer::default();

        let path = tracer.trace(&scene, &down_ray(), &mut LcgRng::new(5));
        let ids: Vec<ObjectId> = path.hits().iter().map(|h| h.object_id()).collect();
        assert_eq!(ids, vec![glass, glass, ground]);
        for hit in path.hits() {
            assert!(hit.normal().dot(&Vector3f::new(0.0, -1.0, 0.0)) < 0.0);
        }
        assert!((path.hits()[1].point().y - 2.0).abs() < 1e-6);
        assert_eq!(path.resolve_color(), RGBColor::GRAY);
    }

    #[test]
    fn test_depth_limit_between_parallel_mirrors() {
        let mut scene = Scene::new(Camera::default());
        let left = scene.add_object(
            SceneObject::new(AABB::from_bounds(-2.0, -10.0, -10.0, -1.0, 10.0, 10.0), RGBColor::RED)
                .with_reflectivity(1.0));
        let right = scene.add_object(
            SceneObject::new(AABB::from_bounds(1.0, -10.0, -10.0, 2.0, 10.0, 10.0), RGBColor::BLUE)
                .with_reflectivity(1.0));
        let tracer = PathTracer::default();

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0));
        let path = tracer.trace(&scene, &ray, &mut LcgRng::new(9));
        let ids: Vec<ObjectId> = path.hits().iter().map(|h| h.object_id()).collect();
        assert_eq!(ids, vec![right, left, right, left, right]);
        assert_eq!(path.resolve_color(), RGBColor::BLUE);
    }

    #[test]
    fn test_weak_reflection_is_not_followed() {
        let mut scene = Scene::new(Camera::default());
        scene.add_object(floor().with_reflectivity(0.005));
        scene.add_object(SceneObject::new(AABB::from_bounds(-5.0, 6.0, -5.0, 5.0, 7.0, 5.0), RGBColor::RED));
        let tracer = PathTracer::default();

        let path = tracer.trace(&scene, &down_ray(), &mut LcgRng::new(1));
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_rough_scene_is_deterministic() {
        let mut scene = Scene::new(Camera::default());
        scene.add_object(floor().with_reflectivity(0.4).with_roughness(0.6));
        scene.add_object(
            SceneObject::new(AABB::from_bounds(-1.0, 0.5, -1.0, 1.0, 1.5, 1.0), RGBColor::BLUE)
                .with_reflectivity(0.3)
                .with_transparency(0.5)
                .with_roughness(0.3)
                .with_refractive_index(1.5));
        scene.add_object(SceneObject::new(AABB::from_bounds(-5.0, 0.0, 3.0, 5.0, 3.0, 3.1), RGBColor::RED)
            .with_reflectivity(0.5)
            .with_roughness(0.8));
        let tracer = PathTracer::default();
        let ray = Ray3f::new(Vector3f::new(0.3, 4.0, -3.0), Vector3f::new(-0.05, -1.0, 0.9));

        let first = tracer.trace(&scene, &ray, &mut LcgRng::new(1234));
        let second = tracer.trace(&scene, &ray, &mut LcgRng::new(1234));
        assert!(!first.is_empty());
        assert_eq!(first.len(), second.len());
        for (a, b) in first.hits().iter().zip(second.hits()) {
            assert_eq!(a.object_id(), b.object_id());
            assert_eq!(a.point(), b.point());
            assert_eq!(a.normal(), b.normal());
        }
        assert_eq!(first.resolve_color(), second.resolve_color());
    }

    #[test]
    fn test_refract_and_total_internal_reflection() {
        let normal = Vector3f::new(0.0, 1.0, 0.0);
        let straight = Vector3f::new(0.0, -1.0, 0.0);
        let t = refract(&straight, &normal, 1.0 / 1.5).unwrap();
        assert!((t - straight).norm() < 1e-12);

        // Leaving glass at a grazing angle cannot transmit.
        let grazing = Vector3f::new(0.95, -0.2, 0.0).normalize();
        assert!(refract(&grazing, &normal, 1.5).is_none());

        // Entering a denser medium bends toward the normal.
        let slanted = Vector3f::new(1.0, -1.0, 0.0).normalize();
        let bent = refract(&slanted, &normal, 1.0 / 1.5).unwrap();
        assert!(bent.x > 0.0 && bent.x < slanted.x);
        assert!((bent.norm() - 1.0).abs() < 1e-12);

        let r = reflect(&slanted, &normal);
        assert!((r - Vector3f::new(slanted.x, -slanted.y, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_exclusion_set() {
        let set = ExclusionSet::new().with(ObjectId(3)).with(ObjectId(70));
        assert!(set.contains(ObjectId(3)));
        assert!(set.contains(ObjectId(70)));
        assert!(!set.contains(ObjectId(4)));
        assert!(!set.without(ObjectId(3)).contains(ObjectId(3)));
        assert!(set.without(ObjectId(3)).without(ObjectId(70)).is_empty());

        let beyond = ExclusionSet::new().with(ObjectId(ExclusionSet::CAPACITY + 1));
        assert!(beyond.is_empty());
        assert!(!beyond.contains(ObjectId(ExclusionSet::CAPACITY + 1)));
    }
}
