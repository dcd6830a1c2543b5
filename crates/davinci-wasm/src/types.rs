//! WASM-compatible wrapper types for images and render settings.
//!
//! This module provides JavaScript-friendly types that wrap the core DaVinci
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use davinci_core::{upright, ArrowDirection, Color, FilterType, FitMode, RasterImage, RenderError, RenderOptions};
use wasm_bindgen::prelude::*;

/// An upright RGBA image for JavaScript.
///
/// Pixels are straight (not premultiplied) RGBA, 4 bytes per pixel, row-major.
/// `scale` is the number of pixels per logical unit; logical sizes passed to
/// the compositing functions are multiplied by it.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is
/// made to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsRasterImage {
    width: u32,
    height: u32,
    scale: f32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Create a new JsRasterImage from dimensions, scale and RGBA pixel data.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, scale: f32, pixels: Vec<u8>) -> JsRasterImage {
        JsRasterImage {
            width,
            height,
            scale,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of pixels per logical unit
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsRasterImage {
    /// Turn a core image upright and copy it out.
    pub(crate) fn from_raster(image: RasterImage) -> Result<Self, RenderError> {
        let image = if image.orientation().is_upright() {
            image
        } else {
            upright(&image)?
        };
        let scale = image.scale();
        let pixels = image.into_pixels();
        Ok(Self {
            width: pixels.width(),
            height: pixels.height(),
            scale,
            pixels: pixels.into_raw(),
        })
    }

    /// Convert back to a core image.
    ///
    /// Note: This clones the pixel data.
    pub(crate) fn to_raster(&self) -> Result<RasterImage, RenderError> {
        RasterImage::from_raw(self.width, self.height, self.pixels.clone())
            .map(|image| image.with_scale(self.scale))
            .ok_or(RenderError::EmptyImage)
    }
}

/// Sampling and anti-aliasing settings for JavaScript.
///
/// Build one with the constructor or from a plain object such as
/// `{ filter: "Bicubic", anti_alias: false }` via `fromObject`.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JsRenderOptions {
    inner: RenderOptions,
}

#[wasm_bindgen]
impl JsRenderOptions {
    /// Create options from a filter code (see `filter_from_u8`) and an
    /// anti-aliasing flag.
    #[wasm_bindgen(constructor)]
    pub fn new(filter: u8, anti_alias: bool) -> JsRenderOptions {
        JsRenderOptions {
            inner: RenderOptions {
                filter: filter_from_u8(filter),
                anti_alias,
            },
        }
    }

    /// Parse options from a JavaScript object. Missing fields take their
    /// defaults.
    #[wasm_bindgen(js_name = fromObject)]
    pub fn from_object(value: JsValue) -> Result<JsRenderOptions, JsValue> {
        let inner: RenderOptions = serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Invalid render options: {}", e)))?;
        Ok(JsRenderOptions { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn anti_alias(&self) -> bool {
        self.inner.anti_alias
    }
}

impl JsRenderOptions {
    pub(crate) fn inner(&self) -> &RenderOptions {
        &self.inner
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Bicubic (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Bicubic,
        _ => FilterType::Bilinear, // Default
    }
}

/// Convert a u8 fit mode value: 0 = Clip, 1 = Crop, 2 = Scale.
///
/// Any other value defaults to Clip.
pub(crate) fn fit_mode_from_u8(value: u8) -> FitMode {
    match value {
        1 => FitMode::Crop,
        2 => FitMode::Scale,
        _ => FitMode::Clip,
    }
}

/// Convert a u8 arrow direction: 0 = Left, 1 = Right, 2 = Up, 3 = Down.
///
/// Any other value defaults to Left.
pub(crate) fn direction_from_u8(value: u8) -> ArrowDirection {
    match value {
        1 => ArrowDirection::Right,
        2 => ArrowDirection::Up,
        3 => ArrowDirection::Down,
        _ => ArrowDirection::Left,
    }
}

/// Unpack a `0xRRGGBBAA` color.
pub(crate) fn color_from_u32(rgba: u32) -> Color {
    let [r, g, b, a] = rgba.to_be_bytes();
    Color::rgba(r, g, b, a)
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_render_options_from_object() {
        let value = serde_wasm_bindgen::to_value(&RenderOptions {
            filter: FilterType::Bicubic,
            anti_alias: false,
        })
        .unwrap();
        let options = JsRenderOptions::from_object(value).unwrap();
        assert_eq!(options.inner().filter, FilterType::Bicubic);
        assert!(!options.anti_alias());
    }

    #[wasm_bindgen_test]
    fn test_render_options_from_invalid_object_fails() {
        assert!(JsRenderOptions::from_object(JsValue::from_str("nope")).is_err());
    }
}
