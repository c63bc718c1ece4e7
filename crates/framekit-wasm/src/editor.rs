//! WASM bindings for the interactive editor session.
//!
//! ```typescript
//! const editor = new EditorSession();
//! editor.set_container_size(canvas.width, canvas.height);
//! editor.load(bytes);
//!
//! function frame() {
//!   if (editor.tick()) redraw(editor.output());
//!   requestAnimationFrame(frame);
//! }
//! ```
//!
//! Time arguments are optional: when omitted, `performance.now()` is used.

use crate::transform::JsRenderOutput;
use crate::types::{config_from_js, to_js_error, JsDecodedImage, JsEncodedImage};
use framekit_core::crop_editor::DragHandle;
use framekit_core::{AnalysisError, AnalysisResult, AnalysisStatus, EditorSession, EditorSettings, Point};
use wasm_bindgen::prelude::*;

/// Host clock in milliseconds.
fn host_now() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map_or_else(js_sys::Date::now, |performance| performance.now())
}

fn handle_name(handle: DragHandle) -> &'static str {
    match handle {
        DragHandle::Move => "move",
        DragHandle::Nw => "nw",
        DragHandle::Ne => "ne",
        DragHandle::Sw => "sw",
        DragHandle::Se => "se",
    }
}

#[wasm_bindgen(js_name = EditorSession)]
pub struct JsEditorSession {
    inner: EditorSession,
}

#[wasm_bindgen(js_class = EditorSession)]
impl JsEditorSession {
    /// Create a session. `settings` is an optional object of editor
    /// tunables (camelCase keys, missing keys take defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<JsEditorSession, JsValue> {
        let settings: EditorSettings = if settings.is_undefined() || settings.is_null() {
            EditorSettings::default()
        } else {
            serde_wasm_bindgen::from_value(settings).map_err(to_js_error)?
        };
        Ok(Self {
            inner: EditorSession::new(settings),
        })
    }

    /// Decode and load an image. Returns `[width, height]`.
    pub fn load(&mut self, bytes: &[u8]) -> Result<Vec<u32>, JsValue> {
        let (width, height) = self.inner.load(bytes).map_err(to_js_error)?;
        Ok(vec![width, height])
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.has_image()
    }

    /// The current configuration as a plain object.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config()).map_err(to_js_error)
    }

    /// Replace the configuration; the render is debounced.
    pub fn update_config(&mut self, config: JsValue, now_ms: Option<f64>) -> Result<(), JsValue> {
        let config = config_from_js(config)?;
        self.inner.update_config(config, now_ms.unwrap_or_else(host_now));
        Ok(())
    }

    /// Run a due render. Returns `true` when the output changed.
    pub fn tick(&mut self, now_ms: Option<f64>) -> bool {
        self.inner.tick(now_ms.unwrap_or_else(host_now))
    }

    pub fn render_now(&mut self) -> Result<(), JsValue> {
        self.inner.render_now().map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn is_render_pending(&self) -> bool {
        self.inner.is_render_pending()
    }

    pub fn rotate_clockwise(&mut self) {
        self.inner.rotate_clockwise();
    }

    pub fn rotate_counter_clockwise(&mut self) {
        self.inner.rotate_counter_clockwise();
    }

    pub fn toggle_flip_horizontal(&mut self) {
        self.inner.toggle_flip_horizontal();
    }

    pub fn toggle_flip_vertical(&mut self) {
        self.inner.toggle_flip_vertical();
    }

    /// Last successful render, if any (a copy).
    pub fn output(&self) -> Option<JsRenderOutput> {
        self.inner.output().cloned().map(JsRenderOutput::from_output)
    }

    /// The rotated and flipped raster shown while cropping (a copy).
    pub fn intermediate(&self) -> Option<JsDecodedImage> {
        self.inner.intermediate().cloned().map(JsDecodedImage::from_decoded)
    }

    #[wasm_bindgen(getter)]
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error().map(str::to_string)
    }

    // Crop mode

    pub fn enter_crop_mode(&mut self) -> bool {
        self.inner.enter_crop_mode()
    }

    pub fn exit_crop_mode(&mut self) -> Result<(), JsValue> {
        self.inner.exit_crop_mode().map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn is_crop_mode(&self) -> bool {
        self.inner.is_crop_mode()
    }

    /// Current crop rectangle as `[x, y, width, height]` in content pixels.
    pub fn crop_rect(&self) -> Option<Vec<f64>> {
        self.inner
            .config()
            .crop_rect
            .map(|r| vec![r.x, r.y, r.width, r.height])
    }

    /// Start a drag at a screen position. Returns the grabbed zone
    /// (`move`, `nw`, `ne`, `sw`, `se`) or `undefined`.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<String> {
        self.inner
            .pointer_down(Point::new(x, y))
            .map(|handle| handle_name(handle).to_string())
    }

    /// Continue a drag. Returns `true` if the crop rectangle changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_move(Point::new(x, y)).is_some()
    }

    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    // Viewport

    /// View transform as `[scale, x, y]`.
    pub fn view(&self) -> Vec<f64> {
        let view = self.inner.view();
        vec![view.scale, view.x, view.y]
    }

    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.inner.set_container_size(width, height);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.inner.pan_by(dx, dy);
    }

    pub fn zoom_at_point(&mut self, x: f64, y: f64, delta_scale: f64) {
        self.inner.zoom_at_point(x, y, delta_scale);
    }

    pub fn zoom_in(&mut self) {
        self.inner.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.inner.zoom_out();
    }

    pub fn zoom_by_wheel(&mut self, x: f64, y: f64, delta_y: f64) {
        self.inner.zoom_by_wheel(Point::new(x, y), delta_y);
    }

    pub fn fit_view(&mut self) {
        self.inner.fit_view();
    }

    pub fn reset_view(&mut self) {
        self.inner.reset_view();
    }

    // Analysis and download

    /// Mark analysis as started and return the artifact to send.
    pub fn begin_analysis(&mut self) -> Option<JsEncodedImage> {
        self.inner.begin_analysis().map(JsEncodedImage::from_encoded)
    }

    /// Record a successful analysis (`{title, description, tags, suggestedFilename}`).
    pub fn set_analysis_result(&mut self, result: JsValue) -> Result<(), JsValue> {
        let result: AnalysisResult = serde_wasm_bindgen::from_value(result).map_err(to_js_error)?;
        self.inner.finish_analysis(Ok(result));
        Ok(())
    }

    pub fn set_analysis_error(&mut self, message: String) {
        self.inner.finish_analysis(Err(AnalysisError::Request(message)));
    }

    /// `idle`, `pending`, `done` or `failed`.
    #[wasm_bindgen(getter)]
    pub fn analysis_state(&self) -> String {
        match self.inner.analysis_status() {
            AnalysisStatus::Idle => "idle",
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Done(_) => "done",
            AnalysisStatus::Failed(_) => "failed",
        }
        .to_string()
    }

    pub fn download_filename(&self) -> String {
        self.inner.download_filename()
    }
}
