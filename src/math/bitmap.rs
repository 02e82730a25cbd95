// Copyright 2020 @TwoCookingMice

use super::spectrum::RGBColor;
use crate::core::surface::Surface;

use std::ops;
use std::vec::Vec;

/// Row-major in-memory image. Serves as the display surface for headless
/// rendering and as the source for image output.
#[derive(Debug, Clone)]
pub struct Bitmap {
    data: Vec<RGBColor>,
    height: usize,
    width: usize
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = RGBColor;

    fn index(&self, index: (usize, usize)) -> &RGBColor {
        assert!(index.0 < self.width && index.1 < self.height);
        &self.data[index.0 + self.width * index.1]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut RGBColor {
        assert!(index.0 < self.width && index.1 < self.height);
        &mut self.data[index.0 + self.width * index.1]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        let pixel_number = width * height;
        Self { data: vec!(RGBColor::BLACK; pixel_number),
               width: width,
               height: height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<RGBColor> {
        if x < self.width && y < self.height {
            Some(self.data[x + self.width * y])
        } else {
            None
        }
    }

    pub fn clear(&mut self, color: RGBColor) {
        for pixel in self.data.iter_mut() {
            *pixel = color;
        }
    }

    pub fn pixels(&self) -> &[RGBColor] {
        &self.data
    }

    /// Packed RGB8 bytes, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.data.iter().flat_map(|c| c.channels()).collect()
    }
}

impl Surface for Bitmap {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: RGBColor) {
        if x < self.width && y < self.height {
            self.data[x + self.width * y] = color;
        }
    }
}

/* Test for Bitmap */
