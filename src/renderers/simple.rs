// Copyright @yucwang 2021

use crate::core::error::RenderError;
use crate::core::integrator::Integrator;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::surface::Surface;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBColor;
use super::sampling::SamplePattern;
use super::tile::{split_into_tiles, Tile};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

pub use super::renderer::{FrameOutcome, Renderer};

/// One-shot renderer: every call traces the whole frame from scratch with a
/// fixed number of samples per pixel.
pub struct SimpleRenderer {
    integrator: Box<dyn Integrator>,
    samples_per_pixel: u32,
    pattern: SamplePattern,
    seed: u64,
    tile_size: usize,
    threads: usize,
    show_progress: bool,
}

impl Renderer for SimpleRenderer {
    fn render_frame(&self, scene: &Scene, surface: &mut dyn Surface) -> Result<FrameOutcome, RenderError> {
        let (width, height) = (surface.width(), surface.height());
        let spp = self.samples_per_pixel.max(1);
        if width == 0 || height == 0 {
            return Ok(FrameOutcome::Rendered { samples_per_pixel: spp });
        }
        let inv_spp = 1.0 / (spp as Float);

        let tiles = split_into_tiles(width, height, self.tile_size);
        let total_tiles = tiles.len();
        let tiles_ref: &[Tile] = &tiles;
        let integrator_ref: &dyn Integrator = self.integrator.as_ref();
        let camera = *scene.camera();

        let progress = if self.show_progress {
            let bar = ProgressBar::new(total_tiles as u64);
            bar.set_style(
                ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} tiles")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let next_tile = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel::<(Tile, Vec<RGBColor>)>();
        let mut received = 0usize;
        let mut panicked = false;

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.threads);
            for _ in 0..self.threads.max(1) {
                let next_tile = Arc::clone(&next_tile);
                let tx = tx.clone();
                handles.push(scope.spawn(move || {
                    loop {
                        let tile_index = next_tile.fetch_add(1, Ordering::Relaxed);
                        if tile_index >= total_tiles {
                            break;
                        }
                        let tile = tiles_ref[tile_index];

                        let mut block = Vec::with_capacity(tile.pixel_count());
                        for (x, y) in tile.pixels() {
                            let mut rng = LcgRng::for_pixel(self.seed, 0, x, y);
                            let mut color = Vector3f::zeros();
                            for s in 0..spp {
                                let (ox, oy) = self.pattern.offset(s, spp, &mut rng);
                                let ray = camera.primary_ray(x as Float + ox, y as Float + oy, width, height);
                                color += integrator_ref.trace_color(scene, &ray, &mut rng).to_vector();
                            }
                            block.push(RGBColor::from_vector(&(color * inv_spp)));
                        }
                        if tx.send((tile, block)).is_err() {
                            break;
                        }
                    }
                }));
            }

            drop(tx);
            while received < total_tiles {
                match rx.recv() {
                    Ok((tile, block)) => {
                        for (i, (x, y)) in tile.pixels().enumerate() {
                            surface.set_pixel(x, y, block[i]);
                        }
                        received += 1;
                        progress.inc(1);
                    }
                    Err(_) => break,
                }
            }

            for handle in handles {
                if handle.join().is_err() {
                    panicked = true;
                }
            }
        });
        progress.finish_and_clear();

        if panicked {
            log::warn!("Render worker panicked after {} of {} tiles.", received, total_tiles);
            return Err(RenderError::WorkerPanicked);
        }
        if received < total_tiles {
            return Err(RenderError::TileChannelClosed { received, expected: total_tiles });
        }

        log::info!("Rendered {}x{} at {} spp over {} tiles.", width, height, spp, total_tiles);
        Ok(FrameOutcome::Rendered { samples_per_pixel: spp })
    }
}

impl SimpleRenderer {
    pub fn new(integrator: Box<dyn Integrator>, samples_per_pixel: u32, seed: u64) -> Self {
        Self {
            integrator,
            samples_per_pixel,
            pattern: SamplePattern::RegularGrid,
            seed,
            tile_size: 128,
            threads: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            show_progress: false,
        }
    }

    pub fn with_pattern(mut self, pattern: SamplePattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = tile_size.max(1);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_progress_bar(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::SceneObject;
    use crate::integrators::path::PathTracer;
    use crate::math::aabb::AABB;
    use crate::math::bitmap::Bitmap;
    use crate::math::ray::Ray3f;
    use crate::sensors::camera::Camera;

    struct Flat(RGBColor);

    impl Integrator for Flat {
        fn trace_color(&self, _scene: &Scene, _ray: &Ray3f, _rng: &mut LcgRng) -> RGBColor {
            self.0
        }
    }

    struct Exploding;

    impl Integrator for Exploding {
        fn trace_color(&self, _scene: &Scene, _ray: &Ray3f, _rng: &mut LcgRng) -> RGBColor {
            panic!("integrator failure");
        }
    }

    #[test]
    fn test_fills_every_pixel() {
        let scene = Scene::new(Camera::default());
        let renderer = SimpleRenderer::new(Box::new(Flat(RGBColor::RED)), 4, 0)
            .with_tile_size(8)
            .with_threads(3);
        let mut bitmap = Bitmap::new(21, 13);

        let outcome = renderer.render_frame(&scene, &mut bitmap).unwrap();
        assert_eq!(outcome, FrameOutcome::Rendered { samples_per_pixel: 4 });
        assert!(bitmap.pixels().iter().all(|c| *c == RGBColor::RED));
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let scene = Scene::new(Camera::default());
        let renderer = SimpleRenderer::new(Box::new(Exploding), 1, 0).with_threads(2);
        let mut bitmap = Bitmap::new(8, 8);

        let result = renderer.render_frame(&scene, &mut bitmap);
        assert!(matches!(result, Err(RenderError::WorkerPanicked)));
    }

    #[test]
    fn test_same_seed_same_image() {
        let camera = Camera::new(90.0, 0.0, 30.0, Vector3f::new(0.0, 3.0, -4.0));
        let mut scene = Scene::new(camera);
        scene.add_object(
            SceneObject::new(AABB::from_bounds(-5.0, 0.0, -5.0, 5.0, 0.01, 5.0), RGBColor::GRAY)
                .with_reflectivity(0.4)
                .with_roughness(0.5));
        scene.add_object(SceneObject::new(AABB::from_bounds(-1.0, 0.0, -1.0, 1.0, 2.0, 1.0), RGBColor::BLUE));

        let render = |threads: usize| {
            let renderer = SimpleRenderer::new(Box::new(PathTracer::default()), 3, 11)
                .with_pattern(SamplePattern::Jittered)
                .with_tile_size(5)
                .with_threads(threads);
            let mut bitmap = Bitmap::new(24, 16);
            renderer.render_frame(&scene, &mut bitmap).unwrap();
            bitmap
        };

        let single = render(1);
        let many = render(4);
        assert_eq!(single.pixels(), many.pixels());
        assert!(single.pixels().iter().any(|c| !c.is_black()));
    }
}
