// Copyright @yucwang 2026

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::core::error::RenderError;
use crate::core::integrator::Integrator;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::settings::RenderSettings;
use crate::core::surface::Surface;
use crate::math::constants::Float;
use crate::math::spectrum::RGBColor;
use crate::sensors::camera::Camera;
use super::sampling::SamplePattern;
use super::tile::{split_into_tiles, Tile};

pub use super::renderer::{FrameOutcome, Renderer};

/// Spacing of the coarse grid used for the sample-cap check and the
/// displayed average sample count.
const SPARSE_STEP: usize = 10;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// One sample per frame, accumulation restarted every frame.
    Fast,
    /// Accumulates across frames, ramping the per-frame sample count.
    Progressive,
    /// A single heavy pass, then idle.
    HighQuality,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RenderMode::Fast => "Fast mode",
            RenderMode::Progressive => "Progressive",
            RenderMode::HighQuality => "High quality",
        };
        f.write_str(label)
    }
}

/// Snapshot for overlays and logs.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStats {
    pub mode: RenderMode,
    pub average_samples: u32,
    pub percent_complete: u32,
    pub elapsed_time_ms: u64,
    pub status_message: String,
    pub is_rendering: bool,
}

/// Running average of one pixel.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
struct PixelState {
    color: RGBColor,
    count: u32,
}

impl PixelState {
    /// Folds `drawn` new samples whose channel sums are `sum` into the
    /// average. Integer division truncates.
    fn fold(&mut self, sum: [u64; 3], drawn: u32) {
        if drawn == 0 {
            return;
        }
        let old = self.count as u64;
        let total = old + drawn as u64;
        let channel = |prev: u8, added: u64| ((prev as u64 * old + added) / total).min(255) as u8;
        self.color = RGBColor::new(
            channel(self.color.r, sum[0]),
            channel(self.color.g, sum[1]),
            channel(self.color.b, sum[2]),
        );
        self.count += drawn;
    }
}

/// Accumulation cells of one tile, row-major inside the tile.
#[derive(Debug, Clone)]
struct TileState {
    tile: Tile,
    cells: Vec<PixelState>,
}

/// Parameters fixed for the duration of one frame.
#[derive(Debug, Copy, Clone)]
struct FramePlan {
    mode: RenderMode,
    camera: Camera,
    width: usize,
    height: usize,
    samples: u32,
    cap: u32,
    iteration: u32,
    seed: u64,
}

#[derive(Debug)]
struct RendererState {
    mode: RenderMode,
    iteration: u32,
    first_frame: bool,
    last_movement: Option<Instant>,
    width: usize,
    height: usize,
    tiles_x: usize,
    tiles: Vec<TileState>,
    reset_pending: bool,
    in_flight: bool,
    status: String,
    average_samples: u32,
    render_start: Option<Instant>,
}

impl RendererState {
    fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            iteration: 0,
            first_frame: true,
            last_movement: None,
            width: 0,
            height: 0,
            tiles_x: 0,
            tiles: Vec::new(),
            reset_pending: false,
            in_flight: false,
            status: String::from("Initializing..."),
            average_samples: 0,
            render_start: None,
        }
    }

    fn reallocate(&mut self, width: usize, height: usize, tile_size: usize) {
        let tile_size = tile_size.max(1);
        self.width = width;
        self.height = height;
        self.tiles_x = (width + tile_size - 1) / tile_size;
        self.tiles = split_into_tiles(width, height, tile_size)
            .into_iter()
            .map(|tile| TileState { tile, cells: vec![PixelState::default(); tile.pixel_count()] })
            .collect();
        self.apply_reset();
    }

    fn apply_reset(&mut self) {
        self.iteration = 0;
        self.first_frame = true;
        self.average_samples = 0;
        for tile in self.tiles.iter_mut() {
            for cell in tile.cells.iter_mut() {
                *cell = PixelState::default();
            }
        }
        self.status = String::from("Ready");
    }

    fn is_stable(&self, now: Instant, delay: Duration) -> bool {
        self.last_movement
            .map_or(true, |moved| now.saturating_duration_since(moved) >= delay)
    }

    fn cell(&self, x: usize, y: usize, tile_size: usize) -> Option<&PixelState> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let size = tile_size.max(1);
        let tile = self.tiles.get((y / size) * self.tiles_x + x / size)?;
        tile.cells.get(tile.tile.local_index(x, y))
    }

    fn sparse_counts<'a>(&'a self, tile_size: usize) -> impl Iterator<Item = u32> + 'a {
        (0..self.width).step_by(SPARSE_STEP).flat_map(move |x| {
            (0..self.height)
                .step_by(SPARSE_STEP)
                .filter_map(move |y| self.cell(x, y, tile_size).map(|c| c.count))
        })
    }

    fn max_samples_reached(&self, cap: u32, tile_size: usize) -> bool {
        self.sparse_counts(tile_size).all(|count| count >= cap)
    }

    fn sparse_average(&self, tile_size: usize) -> u32 {
        let (sum, n) = self.sparse_counts(tile_size)
            .fold((0u64, 0u64), |(sum, n), count| (sum + count as u64, n + 1));
        if n == 0 { 0 } else { (sum / n) as u32 }
    }

    /// Samples per pixel for the next frame and the status that goes with
    /// it. `None` means the frame should idle.
    fn plan_samples(&mut self, stable: bool, high_quality_samples: u32) -> Option<u32> {
        if self.mode == RenderMode::Fast || !stable {
            // Moving or fast: only the newest pose is worth showing.
            self.apply_reset();
            self.status = String::from("Fast mode");
            return Some(1);
        }

        if self.mode == RenderMode::HighQuality {
            if !self.first_frame {
                self.status = String::from("High quality render complete");
                return None;
            }
            self.status = String::from("Rendering in high quality...");
            return Some(high_quality_samples.max(1));
        }

        let (samples, status) = match self.iteration {
            0 => (1, String::from("Progressive: Initial pass")),
            i if i < 5 => (1, format!("Progressive: Refinement pass {}", i)),
            i if i < 10 => (2, format!("Progressive: Refinement pass {}", i)),
            _ => (4, String::from("Progressive: Deep refinement")),
        };
        self.status = status;
        Some(samples)
    }
}

/// Accumulating tile-parallel renderer. Every entry point takes `&self`, so
/// one instance can be shared between the thread that renders and the
/// input layer that reports movement and mode changes.
pub struct ProgressiveRenderer {
    integrator: Box<dyn Integrator>,
    settings: RenderSettings,
    state: Mutex<RendererState>,
    completed_tiles: AtomicUsize,
    total_tiles: AtomicUsize,
}

impl ProgressiveRenderer {
    pub fn new(integrator: Box<dyn Integrator>, settings: RenderSettings) -> Self {
        let state = RendererState::new(settings.initial_mode);
        Self {
            integrator,
            settings,
            state: Mutex::new(state),
            completed_tiles: AtomicUsize::new(0),
            total_tiles: AtomicUsize::new(0),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RendererState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Clears all accumulation. Deferred to the next frame when one is in flight.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        if state.in_flight {
            state.reset_pending = true;
        } else {
            state.apply_reset();
        }
        log::debug!("Accumulation reset requested.");
    }

    pub fn set_mode(&self, mode: RenderMode) {
        let mut state = self.lock_state();
        state.mode = mode;
        if state.in_flight {
            state.reset_pending = true;
        } else {
            state.apply_reset();
        }
        log::info!("Render mode set to {}.", mode);
    }

    /// Records a camera move. Progressive accumulation restarts because every
    /// earlier sample was taken from another pose.
    pub fn notify_movement(&self) {
        let mut state = self.lock_state();
        state.last_movement = Some(Instant::now());
        if state.mode == RenderMode::Progressive {
            if state.in_flight {
                state.reset_pending = true;
            } else {
                state.apply_reset();
            }
            log::debug!("Camera moved, progressive accumulation restarted.");
        }
    }

    pub fn stats(&self) -> RenderStats {
        let state = self.lock_state();
        let (completed, total) = self.progress();
        RenderStats {
            mode: state.mode,
            average_samples: state.average_samples,
            percent_complete: if total > 0 { (completed * 100 / total) as u32 } else { 0 },
            elapsed_time_ms: state.render_start.map_or(0, |t| t.elapsed().as_millis() as u64),
            status_message: state.status.clone(),
            is_rendering: state.in_flight,
        }
    }

    /// Tiles finished in the current (or last) frame, out of its tile count.
    pub fn progress(&self) -> (usize, usize) {
        (self.completed_tiles.load(Ordering::SeqCst), self.total_tiles.load(Ordering::SeqCst))
    }

    pub fn mode(&self) -> RenderMode {
        self.lock_state().mode
    }

    /// Frames accumulated since the last reset.
    pub fn iteration(&self) -> u32 {
        self.lock_state().iteration
    }

    pub fn dimensions(&self) -> (usize, usize) {
        let state = self.lock_state();
        (state.width, state.height)
    }

    /// Samples accumulated at `(x, y)`. `None` outside the buffer or while a
    /// frame is in flight.
    pub fn sample_count(&self, x: usize, y: usize) -> Option<u32> {
        let state = self.lock_state();
        state.cell(x, y, self.settings.tile_size).map(|c| c.count)
    }

    /// Running average at `(x, y)`, `None` if the pixel has no samples yet.
    pub fn accumulated_color(&self, x: usize, y: usize) -> Option<RGBColor> {
        let state = self.lock_state();
        state.cell(x, y, self.settings.tile_size)
            .filter(|c| c.count > 0)
            .map(|c| c.color)
    }

    fn set_status(&self, status: String) {
        self.lock_state().status = status;
    }

    fn render_tile(&self, scene: &Scene, plan: &FramePlan, tile: &mut TileState) -> Vec<RGBColor> {
        let TileState { tile, cells } = tile;
        let mut block = Vec::with_capacity(cells.len());
        for ((x, y), cell) in tile.pixels().zip(cells.iter_mut()) {
            if cell.count < plan.cap {
                let drawn = plan.samples.min(plan.cap - cell.count);
                let mut rng = LcgRng::for_pixel(plan.seed, plan.iteration as u64, x, y);
                let mut sum = [0u64; 3];
                for s in 0..drawn {
                    let (ox, oy) = SamplePattern::Stratified.offset(s, plan.samples, &mut rng);
                    let ray = plan.camera.primary_ray(x as Float + ox, y as Float + oy, plan.width, plan.height);
                    let color = self.integrator.trace_color(scene, &ray, &mut rng);
                    sum[0] += color.r as u64;
                    sum[1] += color.g as u64;
                    sum[2] += color.b as u64;
                }
                cell.fold(sum, drawn);
            }
            block.push(cell.color);
        }
        block
    }

    /// Traces every tile, blocking until all workers have joined. Finished
    /// tiles are copied to `surface` on the calling thread.
    fn run_tiles(&self, scene: &Scene, plan: &FramePlan, tiles: &mut [TileState],
                 surface: &mut dyn Surface) -> Result<(), RenderError> {
        let total_tiles = tiles.len();
        let thread_count = self.settings.thread_count().min(total_tiles.max(1));
        let queue = Mutex::new(tiles.iter_mut());
        let (tx, rx) = mpsc::channel::<(Tile, Vec<RGBColor>)>();
        let mut received = 0usize;
        let mut panicked = false;

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(thread_count);
            for _ in 0..thread_count {
                let tx = tx.clone();
                let queue = &queue;
                handles.push(scope.spawn(move || loop {
                    let next = queue.lock().unwrap_or_else(PoisonError::into_inner).next();
                    let tile = match next {
                        Some(tile) => tile,
                        None => break,
                    };
                    let block = self.render_tile(scene, plan, tile);
                    self.completed_tiles.fetch_add(1, Ordering::SeqCst);
                    if tx.send((tile.tile, block)).is_err() {
                        break;
                    }
                }));
            }

            drop(tx);
            while received < total_tiles {
                match rx.recv() {
                    Ok((tile, block)) => {
                        for ((x, y), color) in tile.pixels().zip(block) {
                            surface.set_pixel(x, y, color);
                        }
                        received += 1;
                        if received % 10 == 0 || received == total_tiles {
                            self.set_status(format!("{}: {}% complete", plan.mode, received * 100 / total_tiles));
                        }
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

        if panicked {
            Err(RenderError::WorkerPanicked)
        } else if received < total_tiles {
            Err(RenderError::TileChannelClosed { received, expected: total_tiles })
        } else {
            Ok(())
        }
    }
}

impl Renderer for ProgressiveRenderer {
    /// Advances accumulation by one frame. Returns `Skipped` without touching
    /// anything if another frame is still running.
    fn render_frame(&self, scene: &Scene, surface: &mut dyn Surface) -> Result<FrameOutcome, RenderError> {
        let (width, height) = (surface.width(), surface.height());
        let tile_size = self.settings.tile_size;
        let now = Instant::now();

        let (plan, mut tiles) = {
            let mut state = self.lock_state();
            if state.in_flight {
                return Ok(FrameOutcome::Skipped);
            }
            if state.width != width || state.height != height {
                log::debug!("Accumulation buffer resized to {}x{}.", width, height);
                state.reallocate(width, height, tile_size);
            }
            if state.reset_pending {
                state.reset_pending = false;
                state.apply_reset();
            }

            let stable = state.is_stable(now, self.settings.stability_delay());
            let samples = match state.plan_samples(stable, self.settings.high_quality_samples) {
                Some(samples) => samples,
                None => return Ok(FrameOutcome::Idle),
            };

            let cap = self.settings.max_total_samples;
            if !state.first_frame && state.max_samples_reached(cap, tile_size) {
                state.status = String::from("Maximum quality reached");
                return Ok(FrameOutcome::Idle);
            }

            state.in_flight = true;
            state.render_start = Some(now);
            let plan = FramePlan {
                mode: state.mode,
                camera: *scene.camera(),
                width,
                height,
                samples,
                cap,
                iteration: state.iteration,
                seed: self.settings.seed,
            };
            (plan, std::mem::take(&mut state.tiles))
        };

        self.completed_tiles.store(0, Ordering::SeqCst);
        self.total_tiles.store(tiles.len(), Ordering::SeqCst);
        log::debug!("Frame {} started: {} samples per pixel over {} tiles.",
                    plan.iteration, plan.samples, tiles.len());

        let result = self.run_tiles(scene, &plan, &mut tiles, surface);

        let mut state = self.lock_state();
        state.tiles = tiles;
        state.in_flight = false;
        match result {
            Ok(()) => {
                state.iteration += 1;
                state.first_frame = false;
                state.average_samples = state.sparse_average(tile_size);
                let elapsed = now.elapsed().as_secs_f64();
                state.status = format!("{}: {} samples, rendered in {:.1}s",
                                       state.mode, state.average_samples, elapsed);
                log::debug!("{}", state.status);
                Ok(FrameOutcome::Rendered { samples_per_pixel: plan.samples })
            }
            Err(err) => {
                log::warn!("Frame {} failed: {}", plan.iteration, err);
                state.reset_pending = false;
                state.apply_reset();
                state.status = format!("Render failed: {}", err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_truncates() {
        let mut cell = PixelState::default();
        cell.fold([255, 100, 3], 1);
        assert_eq!(cell.color, RGBColor::new(255, 100, 3));
        assert_eq!(cell.count, 1);

        // (255 * 1 + 0) / 2 = 127, (100 + 101) / 2 = 100, (3 + 0) / 2 = 1
        cell.fold([0, 101, 0], 1);
        assert_eq!(cell.color, RGBColor::new(127, 100, 1));
        assert_eq!(cell.count, 2);

        cell.fold([0, 0, 0], 0);
        assert_eq!(cell.count, 2);
    }

    #[test]
    fn test_progressive_ramp() {
        let mut state = RendererState::new(RenderMode::Progressive);
        let mut plan = Vec::new();
        for iteration in 0..12 {
            state.iteration = iteration;
            plan.push(state.plan_samples(true, 256).unwrap());
            if iteration == 3 {
                assert_eq!(state.status, "Progressive: Refinement pass 3");
            }
        }
        assert_eq!(plan, vec![1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 4, 4]);
        assert_eq!(state.status, "Progressive: Deep refinement");

        state.iteration = 0;
        state.plan_samples(true, 256);
        assert_eq!(state.status, "Progressive: Initial pass");
    }

    #[test]
    fn test_unstable_scene_falls_back_to_fast() {
        let mut state = RendererState::new(RenderMode::Progressive);
        state.iteration = 7;
        state.first_frame = false;
        assert_eq!(state.plan_samples(false, 256), Some(1));
        assert_eq!(state.iteration, 0);
        assert!(state.first_frame);
        assert_eq!(state.status, "Fast mode");
    }

    #[test]
    fn test_high_quality_runs_once() {
        let mut state = RendererState::new(RenderMode::HighQuality);
        assert_eq!(state.plan_samples(true, 64), Some(64));
        state.first_frame = false;
        assert_eq!(state.plan_samples(true, 64), None);
        assert_eq!(state.status, "High quality render complete");
    }

    #[test]
    fn test_stability_window() {
        let mut state = RendererState::new(RenderMode::Progressive);
        let now = Instant::now();
        assert!(state.is_stable(now, Duration::from_millis(500)));

        state.last_movement = Some(now);
        assert!(!state.is_stable(now, Duration::from_millis(500)));
        assert!(state.is_stable(now + Duration::from_millis(500), Duration::from_millis(500)));
    }

    #[test]
    fn test_sparse_grid_lookup() {
        let mut state = RendererState::new(RenderMode::Progressive);
        state.reallocate(25, 12, 8);
        assert_eq!(state.tiles.len(), 4 * 2);
        assert_eq!(state.sparse_counts(8).count(), 3 * 2);
        assert!(!state.max_samples_reached(1, 8));
        assert_eq!(state.sparse_average(8), 0);

        for tile in state.tiles.iter_mut() {
            for cell in tile.cells.iter_mut() {
                cell.count = 4;
            }
        }
        assert!(state.max_samples_reached(4, 8));
        assert_eq!(state.sparse_average(8), 4);
        assert!(state.cell(25, 0, 8).is_none());
        assert_eq!(state.cell(24, 11, 8).map(|c| c.count), Some(4));
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(RenderMode::Fast.to_string(), "Fast mode");
        assert_eq!(RenderMode::HighQuality.to_string(), "High quality");
        assert_eq!(RenderMode::Progressive.to_string(), "Progressive");
    }
}
