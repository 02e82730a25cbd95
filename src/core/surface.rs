// Copyright @yucwang 2026

use crate::math::spectrum::RGBColor;

/// The pixel target a renderer draws into, normally the window's back
/// buffer. Writes outside `[0, width) x [0, height)` are ignored.
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn set_pixel(&mut self, x: usize, y: usize, color: RGBColor);
}
