//! DaVinci WASM - WebAssembly bindings for DaVinci
//!
//! This crate provides WASM bindings to expose the davinci-core compositing
//! functions to JavaScript/TypeScript view-drawing code.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for images and render options
//! - `codec` - Image decoding (PNG, JPEG with EXIF orientation) and PNG encoding
//! - `compose` - Resize, masks, overlay and arrow rendering
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, resize, JsRenderOptions } from '@davinci/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const thumb = resize(image, 200, 200, 0, new JsRenderOptions(1, true));
//! console.log(`Thumbnail ${thumb.width}x${thumb.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod codec;
mod compose;
mod types;

// Re-export public types
pub use codec::{decode_image, encode_png};
pub use compose::{arrow, mask_with_ellipse, mask_with_image, mask_with_rounded_rect, overlay, resize};
pub use types::{JsRasterImage, JsRenderOptions};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
