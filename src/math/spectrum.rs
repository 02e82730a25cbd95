// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

/// An 8-bit RGB triple, the unit of both scene base colors and displayed pixels.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RGBColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RGBColor {
    pub const BLACK: RGBColor = RGBColor::new(0, 0, 0);
    pub const WHITE: RGBColor = RGBColor::new(255, 255, 255);
    pub const GRAY: RGBColor = RGBColor::new(128, 128, 128);
    pub const RED: RGBColor = RGBColor::new(255, 0, 0);
    pub const BLUE: RGBColor = RGBColor::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn is_black(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    pub fn to_vector(&self) -> Vector3f {
        Vector3f::new(self.r as Float, self.g as Float, self.b as Float)
    }

    /// Rounds each channel and clamps it to `[0, 255]`.
    pub fn from_vector(v: &Vector3f) -> Self {
        Self {
            r: quantize(v.x),
            g: quantize(v.y),
            b: quantize(v.z),
        }
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

fn quantize(c: Float) -> u8 {
    if c.is_nan() {
        return 0;
    }
    c.round().max(0.0).min(255.0) as u8
}

impl From<[u8; 3]> for RGBColor {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}
