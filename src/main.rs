// Copyright 2020 TwoCookingMice

mod cli;
mod logger;

use boxlight::core::settings::Settings;
use boxlight::integrators::path::PathTracer;
use boxlight::io::image_output::save_bitmap;
use boxlight::math::bitmap::Bitmap;
use boxlight::renderers::progressive::ProgressiveRenderer;
use boxlight::renderers::renderer::{FrameOutcome, Renderer};
use boxlight::renderers::simple::SimpleRenderer;
use boxlight::scenes::demo::demo_scene;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::time::Instant;

use self::cli::{Args, CliMode};
use self::logger::init_logger;

/// Degrees of yaw added per frame with `--orbit`.
const ORBIT_STEP: f64 = 2.0;

fn main() {
    let args = Args::parse();
    init_logger(args.debug_level.clone().into());

    if let Err(err) = run(&args) {
        log::error!("{}", err);
        eprintln!("{} {}", style("error:").red().bold(), err);
        std::process::exit(1);
    }
}

fn load_settings(args: &Args) -> Result<Settings, Box<dyn Error>> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.render.seed = seed;
    }
    if let Some(threads) = args.threads {
        settings.render.threads = Some(threads);
    }
    if let Some(samples) = args.samples {
        settings.render.simple_samples_per_pixel = samples;
    }
    if let Some(mode) = args.mode.and_then(|m| m.render_mode()) {
        settings.render.initial_mode = mode;
    }
    Ok(settings)
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let settings = load_settings(args)?;
    let mut scene = demo_scene();
    let mut bitmap = Bitmap::new(args.width, args.height);
    let tracer = Box::new(PathTracer::new(settings.tracer.clone()));
    let start = Instant::now();

    log::info!("Rendering {} objects at {}x{} on {} threads.",
               scene.len(), args.width, args.height, settings.render.thread_count());

    let summary = if args.mode == Some(CliMode::Simple) {
        let renderer = SimpleRenderer::new(tracer, settings.render.simple_samples_per_pixel, settings.render.seed)
            .with_pattern(settings.render.simple_pattern)
            .with_tile_size(settings.render.tile_size)
            .with_threads(settings.render.thread_count())
            .with_progress_bar(true);
        renderer.render_frame(&scene, &mut bitmap)?;
        format!("{} samples per pixel", settings.render.simple_samples_per_pixel.max(1))
    } else {
        let renderer = ProgressiveRenderer::new(tracer, settings.render.clone());
        let progress = ProgressBar::new(args.frames as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        for frame in 0..args.frames {
            if args.orbit && frame > 0 {
                scene.camera_mut().rotate(ORBIT_STEP, 0.0);
                renderer.notify_movement();
            }
            let outcome = renderer.render_frame(&scene, &mut bitmap)?;
            progress.set_message(renderer.stats().status_message);
            progress.inc(1);
            if outcome == FrameOutcome::Idle && !args.orbit {
                break;
            }
        }
        progress.finish_and_clear();
        let stats = renderer.stats();
        format!("{} ({}, ~{} samples per pixel)", stats.status_message, stats.mode, stats.average_samples)
    };

    save_bitmap(&bitmap, &args.output)?;
    println!("{} {}", style("done").green().bold(), summary);
    println!("{} {} in {:.2}s",
             style("wrote").cyan(),
             args.output.display(),
             start.elapsed().as_secs_f64());
    Ok(())
}
