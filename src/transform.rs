//! Thumbnail geometry: center-crop to a fixed aspect ratio, then resize to a
//! fixed resolution.
//!
//! The crop is computed by [`crop_rect`], a pure function over dimensions, so
//! the geometry can be tested without touching pixels. [`transform`] applies it
//! and resamples with Lanczos3.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use thiserror::Error;

/// Width:height ratio every thumbnail is cropped to.
pub const TARGET_RATIO: f64 = 1.5;
pub const OUTPUT_WIDTH: u32 = 800;
pub const OUTPUT_HEIGHT: u32 = 534;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransformError {
    #[error("cannot transform a {width}x{height} image")]
    InvalidInput { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// Axis-aligned region; `min` is inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub min: Point,
    pub max: Point,
}

impl Rectangle {
    pub fn new(min: (u32, u32), max: (u32, u32)) -> Self {
        Self {
            min: Point { x: min.0, y: min.1 },
            max: Point { x: max.0, y: max.1 },
        }
    }

    pub fn width(&self) -> u32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> u32 {
        self.max.y - self.min.y
    }
}

/// Crop needed to bring a `width` x `height` image to [`TARGET_RATIO`].
///
/// Returns `None` when the image already has the target ratio. The removed
/// margin is split between both edges; when it is odd the extra pixel comes
/// off the bottom (or right) edge. Ending the crop at `height - offset`
/// instead would keep one extra row (or column) whenever that margin is odd.
///
/// # Examples
/// ```
/// use event_thumbnailer::transform::{crop_rect, Rectangle};
///
/// // 1600x1000 is too wide: keep 1500 columns starting at x=50
/// assert_eq!(crop_rect(1600, 1000), Some(Rectangle::new((50, 0), (1550, 1000))));
///
/// // 1200x800 is exactly 3:2
/// assert_eq!(crop_rect(1200, 800), None);
/// ```
pub fn crop_rect(width: u32, height: u32) -> Option<Rectangle> {
    let source_ratio = width as f64 / height as f64;

    if source_ratio < TARGET_RATIO {
        // Too tall: keep the full width, trim rows
        let target_height = ((width as f64 / TARGET_RATIO).floor() as u32).clamp(1, height);
        let offset = (height - target_height) / 2;
        Some(Rectangle::new((0, offset), (width, offset + target_height)))
    } else if source_ratio > TARGET_RATIO {
        // Too wide: keep the full height, trim columns
        let target_width = ((TARGET_RATIO * height as f64).floor() as u32).clamp(1, width);
        let offset = (width - target_width) / 2;
        Some(Rectangle::new((offset, 0), (offset + target_width, height)))
    } else {
        None
    }
}

/// Produce the `OUTPUT_WIDTH` x `OUTPUT_HEIGHT` thumbnail of `img`.
///
/// Deterministic: the same pixels always produce the same output.
pub fn transform(img: &DynamicImage) -> Result<RgbaImage, TransformError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidInput { width, height });
    }

    let source = img.to_rgba8();
    let cropped = match crop_rect(width, height) {
        Some(rect) => imageops::crop_imm(
            &source,
            rect.min.x,
            rect.min.y,
            rect.width(),
            rect.height(),
        )
        .to_image(),
        None => source,
    };

    Ok(imageops::resize(
        &cropped,
        OUTPUT_WIDTH,
        OUTPUT_HEIGHT,
        FilterType::Lanczos3,
    ))
}
