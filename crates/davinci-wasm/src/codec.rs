//! Image decoding and encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, encode_png } from '@davinci/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const png = encode_png(image);
//! ```

use crate::types::JsRasterImage;
use davinci_core::codec;
use wasm_bindgen::prelude::*;

/// Decode a PNG or JPEG image from bytes.
///
/// The EXIF orientation is applied, so the returned pixels are upright. The
/// image has scale 1.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image or are truncated.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterImage, JsValue> {
    codec::decode(bytes)
        .and_then(JsRasterImage::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode an image as PNG bytes.
///
/// # Errors
///
/// Returns an error if the pixel buffer does not match the dimensions.
#[wasm_bindgen]
pub fn encode_png(image: &JsRasterImage) -> Result<Vec<u8>, JsValue> {
    image
        .to_raster()
        .and_then(|raster| codec::encode_png(&raster))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
