//! Chainable image operations.
//!
//! [`DaVinci`] wraps an image and applies operations one after another. A
//! step that fails is skipped with a warning and the previous image is kept,
//! so a chain always ends with a usable image.

use tracing::warn;

use crate::context::RenderOptions;
use crate::error::RenderError;
use crate::geometry::{Rect, Size};
use crate::layer::overlay;
use crate::mask;
use crate::path::Path;
use crate::raster::RasterImage;
use crate::resize::{resize, FitMode};
use crate::{Border, Corner};

/// An image plus the render options used by every step applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct DaVinci {
    image: RasterImage,
    options: RenderOptions,
}

impl DaVinci {
    pub fn new(image: RasterImage) -> Self {
        Self {
            image,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    pub fn into_image(self) -> RasterImage {
        self.image
    }

    fn apply<F>(mut self, step: &'static str, op: F) -> Self
    where
        F: FnOnce(&RasterImage, &RenderOptions) -> Result<RasterImage, RenderError>,
    {
        match op(&self.image, &self.options) {
            Ok(image) => self.image = image,
            Err(error) => warn!(step, %error, "Skipping pipeline step, keeping previous image"),
        }
        self
    }

    pub fn resize(self, size: Size, mode: FitMode) -> Self {
        self.apply("resize", |image, options| resize(image, size, mode, options))
    }

    pub fn resize_clipping(self, size: Size) -> Self {
        self.resize(size, FitMode::Clip)
    }

    pub fn resize_cropping(self, size: Size) -> Self {
        self.resize(size, FitMode::Crop)
    }

    pub fn resize_scaling(self, size: Size) -> Self {
        self.resize(size, FitMode::Scale)
    }

    pub fn mask_with_image(self, mask: &RasterImage) -> Self {
        self.apply("mask_with_image", |image, options| {
            mask::mask_with_image(image, mask, options)
        })
    }

    pub fn mask_with_ellipse(self, border: &Border) -> Self {
        self.apply("mask_with_ellipse", |image, options| {
            mask::mask_with_ellipse(image, border, options)
        })
    }

    /// Mask with the path `build` returns for the image's logical rect.
    pub fn mask_with_path<F>(self, build: F) -> Self
    where
        F: FnOnce(Rect) -> Path,
    {
        self.apply("mask_with_path", |image, options| {
            mask::mask_with_path(image, build, options)
        })
    }

    pub fn mask_with_rounded_rect(self, radius: f32, border: &Border) -> Self {
        self.apply("mask_with_rounded_rect", |image, options| {
            mask::mask_with_rounded_rect(image, radius, border, options)
        })
    }

    pub fn mask_with_corners(self, corners: &Corner, border: &Border) -> Self {
        self.apply("mask_with_corners", |image, options| {
            mask::mask_with_corners(image, corners, border, options)
        })
    }

    /// Draw `top` over the current image inside `frame`.
    pub fn overlay(self, top: &RasterImage, frame: Rect) -> Self {
        self.apply("overlay", |image, options| overlay(image, top, frame, options))
    }
}

impl From<RasterImage> for DaVinci {
    fn from(image: RasterImage) -> Self {
        Self::new(image)
    }
}

/// One-shot forms of the pipeline steps with default render options.
impl RasterImage {
    pub fn resized(&self, size: Size, mode: FitMode) -> Result<RasterImage, RenderError> {
        resize(self, size, mode, &RenderOptions::default())
    }

    pub fn masked_with_path<F>(&self, build: F) -> Result<RasterImage, RenderError>
    where
        F: FnOnce(Rect) -> Path,
    {
        mask::mask_with_path(self, build, &RenderOptions::default())
    }

    pub fn overlaid(&self, top: &RasterImage, frame: Rect) -> Result<RasterImage, RenderError> {
        overlay(self, top, frame, &RenderOptions::default())
    }
}
