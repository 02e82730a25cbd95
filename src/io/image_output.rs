/* Copyright 2020 @TwoCookingMice */

use std::fmt;
use std::path::Path;

use exr::prelude::write_rgb_file;
use image::{ImageFormat, RgbImage};

use crate::math::bitmap::Bitmap;

#[derive(Debug)]
pub enum OutputError {
    Io(std::io::Error),
    Image(image::ImageError),
    Exr(exr::error::Error),
    UnsupportedFormat(String),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::Io(err) => write!(f, "i/o error: {}", err),
            OutputError::Image(err) => write!(f, "image encoding failed: {}", err),
            OutputError::Exr(err) => write!(f, "exr encoding failed: {}", err),
            OutputError::UnsupportedFormat(ext) => write!(f, "unsupported output format '{}'", ext),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(err) => Some(err),
            OutputError::Image(err) => Some(err),
            OutputError::Exr(err) => Some(err),
            OutputError::UnsupportedFormat(_) => None,
        }
    }
}

impl From<std::io::Error> for OutputError {
    fn from(err: std::io::Error) -> Self {
        OutputError::Io(err)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(err: image::ImageError) -> Self {
        OutputError::Image(err)
    }
}

impl From<exr::error::Error> for OutputError {
    fn from(err: exr::error::Error) -> Self {
        OutputError::Exr(err)
    }
}

/// Writes `bitmap` as PNG or EXR, picked from the file extension.
pub fn save_bitmap<P: AsRef<Path>>(bitmap: &Bitmap, path: P) -> Result<(), OutputError> {
    let path = path.as_ref();
    let ext = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => write_png(bitmap, path),
        "exr" => write_exr(bitmap, path),
        _ => Err(OutputError::UnsupportedFormat(ext)),
    }
}

pub fn write_png(bitmap: &Bitmap, path: &Path) -> Result<(), OutputError> {
    log::info!("Writing PNG image: {}.", path.display());
    let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
    let image = RgbImage::from_raw(width, height, bitmap.to_rgb8())
        .ok_or_else(|| OutputError::UnsupportedFormat(String::from("png")))?;
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Linear float channels in `[0, 1]`, scaled from the 8-bit values.
pub fn write_exr(bitmap: &Bitmap, path: &Path) -> Result<(), OutputError> {
    log::info!("Writing OpenEXR image: {}.", path.display());
    let width = bitmap.width();
    let pixels = bitmap.pixels();
    write_rgb_file(path, width, bitmap.height(), |x, y| {
        let c = pixels[y * width + x];
        (c.r as f32 / 255.0, c.g as f32 / 255.0, c.b as f32 / 255.0)
    })?;
    Ok(())
}
