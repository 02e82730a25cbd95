// Copyright @yucwang 2021

use crate::core::error::RenderError;
use crate::core::scene::Scene;
use crate::core::surface::Surface;

/// What a call to `render_frame` did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Every tile was traced with up to this many new samples per pixel.
    Rendered { samples_per_pixel: u32 },
    /// Another frame was still in flight; nothing was touched.
    Skipped,
    /// Nothing left to refine; the surface keeps its current contents.
    Idle,
}

pub trait Renderer: Sync {
    fn render_frame(&self, scene: &Scene, surface: &mut dyn Surface) -> Result<FrameOutcome, RenderError>;
}
