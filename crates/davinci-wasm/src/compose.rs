//! Resizing, masking, layering and arrow WASM bindings.
//!
//! Sizes and rectangles are logical units; each image's `scale` converts them
//! to pixels. Colors are packed `0xRRGGBBAA` numbers.
//!
//! # Example
//!
//! ```typescript
//! import { resize, mask_with_rounded_rect, JsRenderOptions } from '@davinci/wasm';
//!
//! const options = new JsRenderOptions(1, true);
//! const thumb = resize(image, 120, 120, 1, options); // Crop
//! const avatar = mask_with_rounded_rect(thumb, 16, 2, 0xFFFFFFFF, options);
//! ```

use crate::types::{
    color_from_u32, direction_from_u8, fit_mode_from_u8, JsRasterImage, JsRenderOptions,
};
use davinci_core::{Border, Rect, Size};
use wasm_bindgen::prelude::*;

fn to_js_error(e: davinci_core::RenderError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Resize an image to a logical target size.
///
/// # Arguments
///
/// * `image` - The source image
/// * `width` - Target logical width
/// * `height` - Target logical height
/// * `fit_mode` - 0=Clip (fit inside), 1=Crop (fill and crop center), 2=Scale (stretch)
/// * `options` - Resampling settings
///
/// # Errors
///
/// Returns an error if the target or the scaled bounds have a zero dimension.
#[wasm_bindgen]
pub fn resize(
    image: &JsRasterImage,
    width: f32,
    height: f32,
    fit_mode: u8,
    options: &JsRenderOptions,
) -> Result<JsRasterImage, JsValue> {
    image
        .to_raster()
        .and_then(|src| {
            davinci_core::resize(&src, Size::new(width, height), fit_mode_from_u8(fit_mode), options.inner())
        })
        .and_then(JsRasterImage::from_raster)
        .map_err(to_js_error)
}

/// Clip an image to its inscribed ellipse, optionally stroking a border inside
/// the edge.
///
/// A `border_width` of 0 draws no border.
#[wasm_bindgen]
pub fn mask_with_ellipse(
    image: &JsRasterImage,
    border_width: f32,
    border_color: u32,
    options: &JsRenderOptions,
) -> Result<JsRasterImage, JsValue> {
    let border = Border::new(border_width, color_from_u32(border_color));
    image
        .to_raster()
        .and_then(|src| davinci_core::mask_with_ellipse(&src, &border, options.inner()))
        .and_then(JsRasterImage::from_raster)
        .map_err(to_js_error)
}

/// Clip an image to a rounded rectangle with a uniform corner radius.
///
/// A visible border shows `border_width` wide inside the edge.
#[wasm_bindgen]
pub fn mask_with_rounded_rect(
    image: &JsRasterImage,
    radius: f32,
    border_width: f32,
    border_color: u32,
    options: &JsRenderOptions,
) -> Result<JsRasterImage, JsValue> {
    let border = Border::new(border_width, color_from_u32(border_color));
    image
        .to_raster()
        .and_then(|src| davinci_core::mask_with_rounded_rect(&src, radius, &border, options.inner()))
        .and_then(JsRasterImage::from_raster)
        .map_err(to_js_error)
}

/// Mask an image with the luminance of another image.
///
/// Black mask areas keep the source, white areas remove it.
///
/// # Errors
///
/// Returns an error if either image has no pixels.
#[wasm_bindgen]
pub fn mask_with_image(
    image: &JsRasterImage,
    mask: &JsRasterImage,
    options: &JsRenderOptions,
) -> Result<JsRasterImage, JsValue> {
    let src = image.to_raster().map_err(to_js_error)?;
    let mask = mask
        .to_raster()
        .map_err(|_| to_js_error(davinci_core::RenderError::MaskUnavailable))?;
    davinci_core::mask_with_image(&src, &mask, options.inner())
        .and_then(JsRasterImage::from_raster)
        .map_err(to_js_error)
}

/// Draw `top` over `base` inside the logical frame `(x, y, width, height)`.
///
/// The frame is not clamped to the base.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn overlay(
    base: &JsRasterImage,
    top: &JsRasterImage,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    options: &JsRenderOptions,
) -> Result<JsRasterImage, JsValue> {
    let base = base.to_raster().map_err(to_js_error)?;
    let top = top.to_raster().map_err(to_js_error)?;
    davinci_core::overlay(&base, &top, Rect::new(x, y, width, height), options.inner())
        .and_then(JsRasterImage::from_raster)
        .map_err(to_js_error)
}

/// Render a chevron arrow image.
///
/// # Arguments
///
/// * `direction` - 0=Left, 1=Right, 2=Up, 3=Down
/// * `square` - Side length in pixels
/// * `color` - Arrow color
/// * `background` - Background color, or `undefined` for transparent
#[wasm_bindgen]
pub fn arrow(
    direction: u8,
    square: f32,
    color: u32,
    background: Option<u32>,
) -> Result<JsRasterImage, JsValue> {
    davinci_core::arrow(
        direction_from_u8(direction),
        square,
        color_from_u32(color),
        background.map(color_from_u32),
    )
    .and_then(JsRasterImage::from_raster)
    .map_err(to_js_error)
}
