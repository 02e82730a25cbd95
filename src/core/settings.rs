// Copyright @yucwang 2026

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::core::error::SettingsError;
use crate::math::constants::{EPSILON, Float};
use crate::renderers::progressive::RenderMode;
use crate::renderers::sampling::SamplePattern;

/// Knobs of the recursive reflect/refract walk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TracerSettings {
    pub max_depth: u32,
    /// Branches carrying less energy than this are not followed.
    pub energy_floor: Float,
    /// Offset applied to secondary ray origins and minimum accepted hit distance.
    pub bias: Float,
    pub ambient_refractive_index: Float,
    /// Roughness at or below this value leaves reflections unperturbed.
    pub roughness_threshold: Float,
}

impl Default for TracerSettings {
    fn default() -> Self {
        Self {
            max_depth: 5,
            energy_floor: 0.01,
            bias: EPSILON,
            ambient_refractive_index: 1.0,
            roughness_threshold: 1e-3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub tile_size: usize,
    pub max_total_samples: u32,
    pub high_quality_samples: u32,
    pub stability_delay_ms: u64,
    pub seed: u64,
    /// Worker count; `None` uses the available hardware parallelism.
    pub threads: Option<usize>,
    pub initial_mode: RenderMode,
    pub simple_samples_per_pixel: u32,
    pub simple_pattern: SamplePattern,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tile_size: 32,
            max_total_samples: 256,
            high_quality_samples: 256,
            stability_delay_ms: 500,
            seed: 0,
            threads: None,
            initial_mode: RenderMode::Progressive,
            simple_samples_per_pixel: 3,
            simple_pattern: SamplePattern::RegularGrid,
        }
    }
}

impl RenderSettings {
    pub fn stability_delay(&self) -> Duration {
        Duration::from_millis(self.stability_delay_ms)
    }

    pub fn thread_count(&self) -> usize {
        match self.threads {
            Some(n) if n > 0 => n,
            _ => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// Top-level settings file:
///
/// ```toml
/// [render]
/// tile_size = 32
/// initial_mode = "progressive"
///
/// [tracer]
/// max_depth = 5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub render: RenderSettings,
    pub tracer: TracerSettings,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&text)?;
        log::info!("Loaded render settings from {}.", path.display());
        Ok(settings)
    }
}
