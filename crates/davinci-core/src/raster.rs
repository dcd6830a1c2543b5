//! Raster image value type and EXIF orientation tags.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
///
/// Describes how the stored pixel buffer must be transformed to display
/// upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Stored upright.
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }

    /// Returns true for the four mirrored variants.
    #[inline]
    pub fn is_mirrored(self) -> bool {
        matches!(
            self,
            Orientation::FlipHorizontal
                | Orientation::FlipVertical
                | Orientation::Transpose
                | Orientation::Transverse
        )
    }

    #[inline]
    pub fn is_upright(self) -> bool {
        self == Orientation::Normal
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// An 8-bit sRGBA pixel buffer with a device scale factor and an orientation
/// tag.
///
/// The pixel buffer is stored as captured; `orientation` says how to turn it
/// upright. All operations in this crate read the image and produce a new,
/// upright image with [`Orientation::Normal`].
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pixels: RgbaImage,
    scale: f32,
    orientation: Orientation,
}

impl RasterImage {
    /// Wrap an upright pixel buffer at scale 1.
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            scale: 1.0,
            orientation: Orientation::Normal,
        }
    }

    /// Wrap a pixel buffer with an explicit scale and orientation.
    ///
    /// A scale that is not a positive finite number falls back to 1.
    pub fn from_parts(pixels: RgbaImage, scale: f32, orientation: Orientation) -> Self {
        Self::new(pixels).with_scale(scale).with_orientation(orientation)
    }

    /// Wrap a row-major RGBA byte buffer at scale 1.
    ///
    /// Returns `None` if `pixels` is shorter than `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, pixels).map(Self::new)
    }

    /// A `width x height` image filled with one color.
    pub fn filled(width: u32, height: u32, color: crate::Color) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, color.to_rgba()))
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            tracing::warn!(scale, "Ignoring invalid image scale, using 1");
            1.0
        };
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// The stored (not orientation-corrected) pixel buffer.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Width of the stored buffer in pixels.
    pub fn pixel_width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height of the stored buffer in pixels.
    pub fn pixel_height(&self) -> u32 {
        self.pixels.height()
    }

    /// Pixel dimensions after orientation correction.
    pub fn upright_dimensions(&self) -> (u32, u32) {
        let (w, h) = self.pixels.dimensions();
        if self.orientation.swaps_dimensions() {
            (h, w)
        } else {
            (w, h)
        }
    }

    /// Logical size: orientation-corrected pixel dimensions divided by scale.
    pub fn size(&self) -> Size {
        let (w, h) = self.upright_dimensions();
        Size::new(w as f32 / self.scale, h as f32 / self.scale)
    }

    /// True when the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.width() == 0 || self.pixels.height() == 0
    }
}

impl From<RgbaImage> for RasterImage {
    fn from(pixels: RgbaImage) -> Self {
        Self::new(pixels)
    }
}
