// Copyright @yucwang 2026

use std::path::PathBuf;

use boxlight::renderers::progressive::RenderMode;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Renderer driven by the command line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum CliMode {
    Fast,
    Progressive,
    HighQuality,
    /// One-shot render, no accumulation.
    Simple,
}

impl CliMode {
    pub fn render_mode(&self) -> Option<RenderMode> {
        match self {
            CliMode::Fast => Some(RenderMode::Fast),
            CliMode::Progressive => Some(RenderMode::Progressive),
            CliMode::HighQuality => Some(RenderMode::HighQuality),
            CliMode::Simple => None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "boxlight")]
#[command(about = "Progressive ray tracer for axis-aligned box scenes")]
pub struct Args {
    /// TOML settings file; every field is optional
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    #[arg(long, default_value = "640", help = "Image width in pixels")]
    pub width: usize,

    #[arg(long, default_value = "480", help = "Image height in pixels")]
    pub height: usize,

    /// Frames to accumulate before writing the image
    #[arg(short, long, default_value = "24")]
    pub frames: u32,

    /// Overrides `render.initial_mode` from the settings file
    #[arg(short, long, value_enum)]
    pub mode: Option<CliMode>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads; defaults to the available parallelism
    #[arg(long)]
    pub threads: Option<usize>,

    /// Samples per pixel for `--mode simple`
    #[arg(long)]
    pub samples: Option<u32>,

    /// Turn the camera a few degrees before every frame after the first
    #[arg(long)]
    pub orbit: bool,

    /// Output image, `.png` or `.exr`
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,
}
