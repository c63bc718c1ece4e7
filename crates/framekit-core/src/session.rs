//! Editor session: one loaded image and everything the editor knows about it.
//!
//! The session owns the source raster, the current configuration, the cached
//! intermediate raster and the last good render. Configuration edits are
//! swapped in whole and the expensive render is debounced; the host drives
//! time by calling [`EditorSession::tick`] from its frame loop.
//!
//! In crop mode pointer events only move the crop rectangle over the cached
//! intermediate raster. The crop+resize pass runs once, when crop mode is
//! exited.

use crate::analysis::{download_filename, run_analysis, AnalysisError, AnalysisResult, AnalysisStatus, ImageAnalyzer};
use crate::config::{EditorSettings, ImageConfiguration, Rotation};
use crate::crop_editor::{hit_test, CropEditor, DragHandle, PointerEvent};
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::encode::EncodedImage;
use crate::geometry::{clamp_rect_to_bounds, transformed_dimensions, Point, Rect, Size};
use crate::pipeline::{normalize, render_from_intermediate, render_with_filter, RenderError, RenderOutput};
use crate::scheduler::RenderScheduler;
use crate::viewport::ViewTransform;

/// The part of a configuration the intermediate raster depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OrientationKey {
    rotation: Rotation,
    flip_horizontal: bool,
    flip_vertical: bool,
}

impl OrientationKey {
    fn of(config: &ImageConfiguration) -> Self {
        Self {
            rotation: config.rotation,
            flip_horizontal: config.flip_horizontal,
            flip_vertical: config.flip_vertical,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedIntermediate {
    key: OrientationKey,
    raster: DecodedImage,
}

#[derive(Debug)]
pub struct EditorSession {
    settings: EditorSettings,
    source: Option<DecodedImage>,
    config: ImageConfiguration,
    intermediate: Option<CachedIntermediate>,
    output: Option<RenderOutput>,
    last_error: Option<String>,
    view: ViewTransform,
    container: Size,
    crop: Option<CropEditor>,
    scheduler: RenderScheduler<ImageConfiguration>,
    /// Most recent host time seen, used to schedule discrete actions.
    clock_ms: f64,
    analysis: AnalysisStatus,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl EditorSession {
    pub fn new(settings: EditorSettings) -> Self {
        let scheduler = RenderScheduler::new(settings.debounce_ms as f64);
        Self {
            settings,
            source: None,
            config: ImageConfiguration::new(),
            intermediate: None,
            output: None,
            last_error: None,
            view: ViewTransform::default(),
            container: Size::new(0.0, 0.0),
            crop: None,
            scheduler,
            clock_ms: 0.0,
            analysis: AnalysisStatus::Idle,
        }
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Decode `bytes` and start a fresh session on them.
    ///
    /// On failure the previously loaded image (if any) stays as it was and
    /// the error is recorded.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
        match decode_image(bytes) {
            Ok(image) => self.load_image(image),
            Err(e) => {
                log::warn!("failed to load image: {e}");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Start a fresh session on an already decoded raster.
    pub fn load_image(&mut self, image: DecodedImage) -> Result<(u32, u32), DecodeError> {
        if image.is_empty() {
            let e = DecodeError::InvalidDimensions {
                width: image.width,
                height: image.height,
            };
            self.last_error = Some(e.to_string());
            return Err(e);
        }

        let dimensions = image.dimensions();
        self.scheduler.cancel();
        self.crop = None;
        self.output = None;
        self.last_error = None;
        self.analysis = AnalysisStatus::Idle;
        self.config = ImageConfiguration::new();
        self.source = Some(image);
        self.intermediate = None;
        self.refresh_intermediate();

        // A failed first render is recorded in `last_error`; the image itself loaded.
        let _ = self.render_now();
        self.fit_view();

        log::info!("loaded {}x{} image", dimensions.0, dimensions.1);
        Ok(dimensions)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<&DecodedImage> {
        self.source.as_ref()
    }

    pub fn config(&self) -> &ImageConfiguration {
        &self.config
    }

    /// The rotated and flipped raster, before crop and resize.
    pub fn intermediate(&self) -> Option<&DecodedImage> {
        self.intermediate.as_ref().map(|cached| &cached.raster)
    }

    /// The last successful render.
    pub fn output(&self) -> Option<&RenderOutput> {
        self.output.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_render_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Size of the intermediate raster for the current orientation.
    pub fn intermediate_size(&self) -> Option<Size> {
        let source = self.source.as_ref()?;
        let (w, h) = transformed_dimensions(source.width, source.height, self.config.rotation);
        Some(Size::from_pixels(w, h))
    }

    /// Size of whatever the display surface currently shows: the
    /// intermediate raster in crop mode, otherwise the final render.
    pub fn display_size(&self) -> Option<Size> {
        match (&self.crop, &self.output) {
            (None, Some(output)) => {
                let (w, h) = output.dimensions();
                Some(Size::from_pixels(w, h))
            }
            _ => self.intermediate_size(),
        }
    }

    // ------------------------------------------------------------------
    // Configuration and rendering
    // ------------------------------------------------------------------

    /// Swap in a new configuration and schedule a render for it.
    ///
    /// Outside crop mode the render fires once `now_ms` plus the debounce
    /// window passes without another change. In crop mode nothing is
    /// scheduled; the crop editor follows orientation and ratio changes.
    ///
    /// A `crop_rect` that does not fit the intermediate raster is dropped
    /// when the orientation changed, and clamped into it otherwise.
    pub fn update_config(&mut self, config: ImageConfiguration, now_ms: f64) {
        self.clock_ms = now_ms;

        let reoriented = OrientationKey::of(&config) != OrientationKey::of(&self.config);
        let ratio_changed = config.crop_ratio != self.config.crop_ratio;
        self.config = config;

        if reoriented {
            self.refresh_intermediate();
        }

        if self.crop.is_some() {
            self.sync_crop_editor(reoriented, ratio_changed);
            return;
        }

        self.fit_crop_rect(reoriented);
        if self.source.is_some() {
            self.scheduler.schedule(self.config.clone(), now_ms);
        }
    }

    /// Run a render whose debounce window has elapsed.
    ///
    /// Returns `true` if a render ran and succeeded.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.clock_ms = now_ms;
        match self.scheduler.poll(now_ms) {
            Some(config) if self.source.is_some() => self.render_config(&config).is_ok(),
            _ => false,
        }
    }

    /// Render the current configuration immediately, dropping any pending
    /// debounced render.
    pub fn render_now(&mut self) -> Result<(), RenderError> {
        self.scheduler.cancel();
        let config = self.config.clone();
        self.render_config(&config)
    }

    pub fn rotate_clockwise(&mut self) {
        let config = self.config.rotated_clockwise();
        self.update_config(config, self.clock_ms);
    }

    pub fn rotate_counter_clockwise(&mut self) {
        let config = self.config.rotated_counter_clockwise();
        self.update_config(config, self.clock_ms);
    }

    /// Mirror left-right. A committed crop is mirrored with the image.
    pub fn toggle_flip_horizontal(&mut self) {
        let mut config = self
            .config
            .with_flips(!self.config.flip_horizontal, self.config.flip_vertical);
        if let (Some(rect), Some(bounds)) = (config.crop_rect, self.intermediate_size()) {
            config = config.with_crop_rect(Some(Rect {
                x: bounds.width - rect.right(),
                ..rect
            }));
        }
        self.update_config(config, self.clock_ms);
    }

    /// Mirror top-bottom. A committed crop is mirrored with the image.
    pub fn toggle_flip_vertical(&mut self) {
        let mut config = self
            .config
            .with_flips(self.config.flip_horizontal, !self.config.flip_vertical);
        if let (Some(rect), Some(bounds)) = (config.crop_rect, self.intermediate_size()) {
            config = config.with_crop_rect(Some(Rect {
                y: bounds.height - rect.bottom(),
                ..rect
            }));
        }
        self.update_config(config, self.clock_ms);
    }

    fn fit_crop_rect(&mut self, reoriented: bool) {
        let (Some(rect), Some(bounds)) = (self.config.crop_rect, self.intermediate_size()) else {
            return;
        };

        let clamped = clamp_rect_to_bounds(rect, bounds, self.settings.min_crop_size);
        if clamped == rect {
            return;
        }

        let fitted = if reoriented || !clamped.width.is_finite() || !clamped.height.is_finite() {
            None
        } else {
            Some(clamped)
        };
        log::debug!("crop {rect:?} does not fit {bounds:?}, using {fitted:?}");
        self.config = self.config.with_crop_rect(fitted);
    }

    fn refresh_intermediate(&mut self) {
        let Some(source) = &self.source else {
            self.intermediate = None;
            return;
        };

        let key = OrientationKey::of(&self.config);
        if self.intermediate.as_ref().is_some_and(|cached| cached.key == key) {
            return;
        }

        self.intermediate = Some(CachedIntermediate {
            key,
            raster: normalize(source, &self.config),
        });
    }

    /// Render `config`, keeping the previous output on failure.
    fn render_config(&mut self, config: &ImageConfiguration) -> Result<(), RenderError> {
        let Some(source) = &self.source else {
            return Ok(());
        };

        let filter = self.settings.resize_filter;
        let key = OrientationKey::of(config);
        let result = match &self.intermediate {
            Some(cached) if cached.key == key => render_from_intermediate(&cached.raster, config, filter),
            _ => render_with_filter(source, config, filter),
        };

        match result {
            Ok(output) => {
                self.output = Some(output);
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("render failed, keeping previous output: {e}");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Crop mode
    // ------------------------------------------------------------------

    pub fn is_crop_mode(&self) -> bool {
        self.crop.is_some()
    }

    pub fn crop_editor(&self) -> Option<&CropEditor> {
        self.crop.as_ref()
    }

    /// Start interactive cropping over the intermediate raster.
    ///
    /// Returns `false` if no image is loaded.
    pub fn enter_crop_mode(&mut self) -> bool {
        if self.crop.is_some() {
            return true;
        }
        let Some(bounds) = self.intermediate_size() else {
            return false;
        };

        self.scheduler.cancel();
        let editor = CropEditor::with_min_size(
            bounds,
            self.config.crop_ratio,
            self.config.crop_rect,
            self.settings.min_crop_size,
        );
        self.config = self.config.with_crop_rect(Some(editor.rect()));
        self.crop = Some(editor);
        true
    }

    /// Commit the crop rectangle and run the full render once.
    pub fn exit_crop_mode(&mut self) -> Result<(), RenderError> {
        let Some(editor) = self.crop.take() else {
            return Ok(());
        };

        self.config = self.config.with_crop_rect(Some(editor.rect()));
        self.render_now()
    }

    fn sync_crop_editor(&mut self, reoriented: bool, ratio_changed: bool) {
        let bounds = self.intermediate_size();
        let Some(editor) = self.crop.as_mut() else {
            return;
        };

        if reoriented {
            if let Some(bounds) = bounds {
                *editor = CropEditor::with_min_size(
                    bounds,
                    self.config.crop_ratio,
                    self.config.crop_rect,
                    self.settings.min_crop_size,
                );
            }
        } else if ratio_changed {
            editor.set_ratio(self.config.crop_ratio);
        }
        let rect = editor.rect();
        self.config = self.config.with_crop_rect(Some(rect));
    }

    /// Start a drag if `screen` is over the crop rectangle or one of its
    /// corner handles. Returns the grabbed handle.
    pub fn pointer_down(&mut self, screen: Point) -> Option<DragHandle> {
        let scale = self.view.scale;
        let content = self.view.screen_to_content(screen);
        let radius = self.settings.handle_radius / scale;

        let editor = self.crop.as_mut()?;
        let handle = hit_test(editor.rect(), content, radius)?;
        editor.handle_event(PointerEvent::Down { handle, position: screen }, scale);
        Some(handle)
    }

    pub fn pointer_move(&mut self, screen: Point) -> Option<Rect> {
        self.pointer_event(PointerEvent::Move { position: screen })
    }

    pub fn pointer_up(&mut self) {
        self.pointer_event(PointerEvent::Up);
    }

    /// Dispatch a pointer event into the crop editor. Returns the new crop
    /// rectangle when it changed. Does nothing outside crop mode.
    pub fn pointer_event(&mut self, event: PointerEvent) -> Option<Rect> {
        let editor = self.crop.as_mut()?;
        let rect = editor.handle_event(event, self.view.scale)?;
        self.config = self.config.with_crop_rect(Some(rect));
        Some(rect)
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.container = Size::new(width, height);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.view.pan_by(dx, dy);
    }

    pub fn zoom_at_point(&mut self, pointer_x: f64, pointer_y: f64, delta_scale: f64) {
        self.view.zoom_at_point(pointer_x, pointer_y, delta_scale);
    }

    pub fn zoom_in(&mut self) {
        self.view
            .zoom_at_center(self.container.width, self.container.height, self.settings.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.view
            .zoom_at_center(self.container.width, self.container.height, -self.settings.zoom_step);
    }

    pub fn zoom_by_wheel(&mut self, pointer: Point, delta_y: f64) {
        self.view
            .zoom_by_wheel(pointer, delta_y, self.settings.wheel_sensitivity);
    }

    /// Fit whatever is displayed into the container.
    pub fn fit_view(&mut self) {
        if let Some(size) = self.display_size() {
            self.view.fit_to_container(
                size.width,
                size.height,
                self.container.width,
                self.container.height,
                self.settings.fit_padding,
            );
        }
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    // ------------------------------------------------------------------
    // Analysis and download
    // ------------------------------------------------------------------

    pub fn analysis_status(&self) -> &AnalysisStatus {
        &self.analysis
    }

    /// Mark an analysis request as started and hand out the artifact to
    /// analyse. `None` if nothing has been rendered yet.
    pub fn begin_analysis(&mut self) -> Option<EncodedImage> {
        let encoded = self.output.as_ref()?.encoded.clone();
        self.analysis = AnalysisStatus::Pending;
        Some(encoded)
    }

    pub fn finish_analysis(&mut self, result: Result<AnalysisResult, AnalysisError>) {
        self.analysis = AnalysisStatus::from_result(result);
    }

    /// Run a synchronous analyzer over the last render.
    pub fn analyze_with<A: ImageAnalyzer + ?Sized>(&mut self, analyzer: &A, language: &str) -> &AnalysisStatus {
        self.analysis = match &self.output {
            Some(output) => run_analysis(analyzer, &output.encoded, language),
            None => AnalysisStatus::Failed(AnalysisError::Unavailable.to_string()),
        };
        &self.analysis
    }

    /// Filename for downloading the last render, using the analysis
    /// suggestion when there is one.
    pub fn download_filename(&self) -> String {
        let format = self
            .output
            .as_ref()
            .map_or(self.config.format, |output| output.encoded.format);
        let suggested = self
            .analysis
            .result()
            .map(|analysis| analysis.suggested_filename.as_str());
        download_filename(suggested, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 128, 255]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    fn loaded(width: u32, height: u32) -> EditorSession {
        let mut session = EditorSession::default();
        session.load_image(test_image(width, height)).unwrap();
        session
    }

    fn output_dims(session: &EditorSession) -> (u32, u32) {
        session.output().unwrap().dimensions()
    }

    #[test]
    fn test_load_renders_immediately() {
        let session = loaded(80, 60);
        assert_eq!(output_dims(&session), (80, 60));
        assert_eq!(session.intermediate().unwrap().dimensions(), (80, 60));
        assert!(session.last_error().is_none());
        assert!(!session.is_render_pending());
    }

    #[test]
    fn test_load_garbage_keeps_previous_image() {
        let mut session = loaded(20, 10);
        assert!(session.load(b"definitely not an image").is_err());
        assert!(session.last_error().is_some());
        assert_eq!(session.source().unwrap().dimensions(), (20, 10));
    }

    #[test]
    fn test_load_empty_bytes() {
        let mut session = EditorSession::default();
        assert!(matches!(session.load(&[]), Err(DecodeError::EmptyInput)));
        assert!(!session.has_image());
    }

    #[test]
    fn test_update_config_is_debounced() {
        let mut session = loaded(80, 60);
        let config = session
            .config()
            .with_crop_rect(Some(Rect::new(10.0, 10.0, 40.0, 30.0)));
        session.update_config(config, 1000.0);

        assert!(session.is_render_pending());
        assert!(!session.tick(1100.0));
        assert_eq!(output_dims(&session), (80, 60));

        assert!(session.tick(1300.0));
        assert_eq!(output_dims(&session), (40, 30));
        assert!(!session.is_render_pending());
    }

    #[test]
    fn test_burst_renders_last_config_only() {
        let mut session = loaded(80, 60);
        for (i, t) in [0.0, 100.0, 200.0].into_iter().enumerate() {
            let size = 10 * (i as u32 + 1);
            let config = session.config().with_target_size(size, size);
            session.update_config(config, t);
        }

        assert!(!session.tick(350.0));
        assert!(session.tick(500.0));
        assert_eq!(output_dims(&session), (30, 30));
    }

    #[test]
    fn test_rotate_updates_intermediate_and_output() {
        let mut session = loaded(80, 60);
        session.rotate_clockwise();
        assert_eq!(session.config().rotation, Rotation::Deg90);
        assert_eq!(session.intermediate().unwrap().dimensions(), (60, 80));

        session.render_now().unwrap();
        assert_eq!(output_dims(&session), (60, 80));

        session.rotate_counter_clockwise();
        session.render_now().unwrap();
        assert_eq!(output_dims(&session), (80, 60));
    }

    #[test]
    fn test_crop_mode_defers_render_until_exit() {
        let mut session = loaded(80, 60);
        assert!(session.enter_crop_mode());
        assert_eq!(session.config().crop_rect, Some(Rect::new(4.0, 3.0, 72.0, 54.0)));

        // Identity view: screen space equals content space
        assert_eq!(session.pointer_down(Point::new(76.0, 57.0)), Some(DragHandle::Se));
        let rect = session.pointer_move(Point::new(66.0, 47.0)).unwrap();
        session.pointer_up();

        assert_eq!(rect, Rect::new(4.0, 3.0, 62.0, 44.0));
        assert_eq!(session.config().crop_rect, Some(rect));
        assert_eq!(output_dims(&session), (80, 60));
        assert!(!session.is_render_pending());

        session.exit_crop_mode().unwrap();
        assert!(!session.is_crop_mode());
        assert_eq!(output_dims(&session), (62, 44));
    }

    #[test]
    fn test_pointer_down_outside_rect() {
        let mut session = loaded(80, 60);
        session.enter_crop_mode();
        session.update_config(session.config().with_crop_ratio(Some(1.0)), 0.0);
        // Square crop is centred: (10, 0, 60, 60)
        assert_eq!(session.config().crop_rect, Some(Rect::new(10.0, 0.0, 60.0, 60.0)));
        assert_eq!(session.pointer_down(Point::new(-30.0, 30.0)), None);
        assert_eq!(session.pointer_down(Point::new(40.0, 30.0)), Some(DragHandle::Move));
    }

    #[test]
    fn test_pointer_events_ignored_outside_crop_mode() {
        let mut session = loaded(80, 60);
        assert_eq!(session.pointer_down(Point::new(1.0, 1.0)), None);
        assert_eq!(session.pointer_move(Point::new(5.0, 5.0)), None);
        assert!(session.config().crop_rect.is_none());
    }

    #[test]
    fn test_failed_render_keeps_previous_output() {
        let mut session = loaded(50, 50);
        let before = session.output().cloned();

        // Wider than a JPEG frame header can describe
        let config = session.config().with_target_size(70_000, 1);
        session.update_config(config, 0.0);
        assert!(session.render_now().is_err());

        assert!(session.last_error().is_some());
        assert_eq!(session.output().cloned(), before);
    }

    #[test]
    fn test_host_rotation_drops_crop_that_no_longer_fits() {
        let mut session = loaded(80, 60);
        let config = session
            .config()
            .with_crop_rect(Some(Rect::new(50.0, 0.0, 30.0, 60.0)));
        session.update_config(config, 0.0);

        let rotated = session.config().with_rotation(Rotation::Deg90);
        session.update_config(rotated, 0.0);
        assert_eq!(session.config().crop_rect, None);

        assert!(session.tick(1_000.0));
        assert_eq!(output_dims(&session), (60, 80));
    }

    #[test]
    fn test_host_rotation_keeps_crop_that_fits() {
        let mut session = loaded(80, 60);
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        let config = session
            .config()
            .with_crop_rect(Some(rect))
            .with_rotation(Rotation::Deg90);
        session.update_config(config, 0.0);

        assert_eq!(session.config().crop_rect, Some(rect));
        assert!(session.tick(1_000.0));
        assert_eq!(output_dims(&session), (40, 40));
    }

    #[test]
    fn test_out_of_bounds_crop_is_clamped() {
        let mut session = loaded(80, 60);
        let config = session
            .config()
            .with_crop_rect(Some(Rect::new(70.0, -5.0, 30.0, 70.0)));
        session.update_config(config, 0.0);

        let rect = session.config().crop_rect.unwrap();
        assert_eq!(rect, Rect::new(70.0, 0.0, 10.0, 60.0));
        assert!(rect.is_within(Size::new(80.0, 60.0), session.settings().min_crop_size));

        assert!(session.tick(1_000.0));
        assert_eq!(output_dims(&session), (10, 60));
    }

    #[test]
    fn test_non_finite_crop_is_dropped() {
        let mut session = loaded(80, 60);
        let config = session
            .config()
            .with_crop_rect(Some(Rect::new(f64::NAN, 0.0, 20.0, 20.0)));
        session.update_config(config, 0.0);
        assert_eq!(session.config().crop_rect, None);
    }

    #[test]
    fn test_crop_mode_leaves_view_alone() {
        let mut session = EditorSession::default();
        session.set_container_size(440.0, 340.0);
        session.load_image(test_image(800, 600)).unwrap();
        session.zoom_in();
        session.pan_by(15.0, -10.0);
        let view = session.view();

        assert!(session.enter_crop_mode());
        assert_eq!(session.view(), view);
        session.exit_crop_mode().unwrap();
        assert_eq!(session.view(), view);
    }

    #[test]
    fn test_flip_mirrors_committed_crop() {
        let mut session = loaded(80, 60);
        let config = session
            .config()
            .with_crop_rect(Some(Rect::new(10.0, 5.0, 20.0, 40.0)));
        session.update_config(config, 0.0);

        session.toggle_flip_horizontal();
        assert_eq!(session.config().crop_rect, Some(Rect::new(50.0, 5.0, 20.0, 40.0)));

        session.toggle_flip_vertical();
        assert_eq!(session.config().crop_rect, Some(Rect::new(50.0, 15.0, 20.0, 40.0)));
        assert!(session.config().flip_horizontal && session.config().flip_vertical);
    }

    #[test]
    fn test_rotation_in_crop_mode_reseeds_editor() {
        let mut session = loaded(80, 60);
        session.enter_crop_mode();
        session.rotate_clockwise();

        let editor = session.crop_editor().unwrap();
        assert_eq!(editor.bounds(), Size::new(60.0, 80.0));
        assert!(editor.rect().is_within(editor.bounds(), 10.0));
        assert!(!session.is_render_pending());
    }

    #[test]
    fn test_tick_without_image() {
        let mut session = EditorSession::default();
        session.update_config(ImageConfiguration::new().with_format(OutputFormat::Png), 0.0);
        assert!(!session.is_render_pending());
        assert!(!session.tick(10_000.0));
    }

    #[test]
    fn test_fit_and_zoom() {
        let mut session = EditorSession::default();
        session.set_container_size(440.0, 340.0);
        session.load_image(test_image(800, 600)).unwrap();

        let view = session.view();
        assert!((view.scale - 0.5).abs() < 1e-9);
        assert!((view.x - 20.0).abs() < 1e-9);
        assert!((view.y - 20.0).abs() < 1e-9);

        session.zoom_in();
        assert!((session.view().scale - 0.6).abs() < 1e-9);
        session.reset_view();
        assert_eq!(session.view(), ViewTransform::default());
    }

    #[test]
    fn test_download_filename_uses_analysis() {
        let mut session = loaded(16, 16);
        assert_eq!(session.download_filename(), "edited-image.jpg");

        assert!(session.begin_analysis().is_some());
        assert!(session.analysis_status().is_pending());

        session.finish_analysis(Ok(AnalysisResult {
            suggested_filename: "Quiet Street.png".to_string(),
            ..AnalysisResult::default()
        }));
        assert_eq!(session.download_filename(), "quiet-street.jpg");
    }

    #[test]
    fn test_analysis_failure_does_not_touch_output() {
        let mut session = loaded(16, 16);
        let before = session.output().cloned();
        session.finish_analysis(Err(AnalysisError::Unavailable));
        assert!(matches!(session.analysis_status(), AnalysisStatus::Failed(_)));
        assert_eq!(session.output().cloned(), before);
    }
}
