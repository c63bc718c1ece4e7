//! Framekit WASM - WebAssembly bindings for Framekit
//!
//! This crate exposes the framekit-core functionality to JavaScript/TypeScript
//! applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings
//! - `encode` - Image encoding bindings (JPEG, PNG, WebP)
//! - `transform` - Render pipeline bindings
//! - `editor` - The interactive editor session
//!
//! # Usage
//!
//! ```typescript
//! import init, { EditorSession } from '@framekit/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const editor = new EditorSession();
//! editor.load(new Uint8Array(await file.arrayBuffer()));
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod editor;
mod encode;
mod transform;
mod types;

// Re-export public types
pub use decode::{decode_image, resize};
pub use editor::JsEditorSession;
pub use encode::{encode_image, output_mime_type};
pub use transform::{render, render_intermediate, transformed_dimensions, JsRenderOutput};
pub use types::{JsDecodedImage, JsEncodedImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    // A second init (e.g. hot reload) finds the logger already installed
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("Framekit WASM {} ready", version());
    }
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
