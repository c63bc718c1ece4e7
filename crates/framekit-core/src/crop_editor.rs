//! Interactive crop-rectangle editor.
//!
//! The editor is a small state machine driven by a stream of pointer events.
//! It works in content space (the intermediate raster), takes pointer
//! positions in screen space, and converts the pointer travel with the
//! current view scale so that handles follow the pointer at any zoom level.
//!
//! ```text
//!            Down(handle)              Move / emit rect
//!   Idle ----------------> Dragging ------------------+
//!    ^                        |  ^                    |
//!    +-------- Up ------------+  +--------------------+
//! ```
//!
//! Every rectangle the editor emits satisfies the crop invariant: inside
//! the content bounds and at least `min_size` on each axis.

use serde::{Deserialize, Serialize};

use crate::geometry::{
    center_crop_for_ratio, clamp_rect_to_bounds, screen_delta_to_content_delta, Point, Rect, Size,
    MIN_CROP_SIZE,
};

/// Which part of the crop rectangle a drag grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragHandle {
    /// The rectangle body: translate.
    Move,
    Nw,
    Ne,
    Sw,
    Se,
}

impl DragHandle {
    pub fn is_corner(self) -> bool {
        !matches!(self, DragHandle::Move)
    }

    fn moves_left_edge(self) -> bool {
        matches!(self, DragHandle::Nw | DragHandle::Sw)
    }

    fn moves_top_edge(self) -> bool {
        matches!(self, DragHandle::Nw | DragHandle::Ne)
    }
}

/// A pointer event dispatched into the editor. Positions are in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { handle: DragHandle, position: Point },
    Move { position: Point },
    Up,
}

/// State captured when a drag starts. Lives until the pointer is released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropDragSession {
    pub handle: DragHandle,
    pub anchor_pointer: Point,
    pub anchor_rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CropEditorState {
    #[default]
    Idle,
    Dragging(CropDragSession),
}

/// Find the zone under a content-space point. Corners win over the body.
pub fn hit_test(rect: Rect, point: Point, handle_radius: f64) -> Option<DragHandle> {
    let near = |cx: f64, cy: f64| (point.x - cx).abs() <= handle_radius && (point.y - cy).abs() <= handle_radius;

    if near(rect.x, rect.y) {
        Some(DragHandle::Nw)
    } else if near(rect.right(), rect.y) {
        Some(DragHandle::Ne)
    } else if near(rect.x, rect.bottom()) {
        Some(DragHandle::Sw)
    } else if near(rect.right(), rect.bottom()) {
        Some(DragHandle::Se)
    } else if rect.contains(point) {
        Some(DragHandle::Move)
    } else {
        None
    }
}

/// Translate `anchor` by `(dx, dy)`, keeping its size and staying in bounds.
pub fn move_rect(anchor: Rect, dx: f64, dy: f64, bounds: Size) -> Rect {
    let max_x = (bounds.width - anchor.width).max(0.0);
    let max_y = (bounds.height - anchor.height).max(0.0);
    Rect {
        x: (anchor.x + dx).clamp(0.0, max_x),
        y: (anchor.y + dy).clamp(0.0, max_y),
        ..anchor
    }
}

/// Drag one corner of `anchor` by `(dx, dy)`; the opposite corner stays fixed.
///
/// With a `ratio` the width is dominant: height follows from it, and when
/// that height would not fit on the fixed axis the size is re-derived from
/// the available height instead. The result keeps the ratio exactly unless
/// the bounds are too small to hold a `min_size` rectangle of that ratio.
pub fn resize_rect(
    anchor: Rect,
    handle: DragHandle,
    dx: f64,
    dy: f64,
    bounds: Size,
    ratio: Option<f64>,
    min_size: f64,
) -> Rect {
    if !handle.is_corner() {
        return move_rect(anchor, dx, dy, bounds);
    }

    let west = handle.moves_left_edge();
    let north = handle.moves_top_edge();

    // Fixed corner and the room available from it on each axis
    let fixed_x = if west { anchor.right() } else { anchor.x };
    let fixed_y = if north { anchor.bottom() } else { anchor.y };
    let max_w = if west { fixed_x } else { bounds.width - fixed_x }.max(0.0);
    let max_h = if north { fixed_y } else { bounds.height - fixed_y }.max(0.0);
    let min_w = min_size.min(max_w);
    let min_h = min_size.min(max_h);

    // Move the two adjacent edges by the delta
    let mut width = if west { anchor.width - dx } else { anchor.width + dx }.clamp(min_w, max_w);
    let mut height = if north { anchor.height - dy } else { anchor.height + dy }.clamp(min_h, max_h);

    if let Some(ratio) = ratio.filter(|r| r.is_finite() && *r > 0.0) {
        let lo = min_size.max(min_size * ratio);
        let hi = max_w.min(max_h * ratio);
        width = if lo <= hi { width.clamp(lo, hi) } else { hi };
        height = width / ratio;
        if height > max_h {
            height = max_h;
            width = height * ratio;
        }
    }

    let rect = Rect {
        x: if west { fixed_x - width } else { fixed_x },
        y: if north { fixed_y - height } else { fixed_y },
        width,
        height,
    };

    if rect.is_within(bounds, min_size) {
        rect
    } else {
        clamp_rect_to_bounds(rect, bounds, min_size)
    }
}

/// Crop-rectangle editor over a fixed content size.
#[derive(Debug, Clone, PartialEq)]
pub struct CropEditor {
    bounds: Size,
    ratio: Option<f64>,
    rect: Rect,
    min_size: f64,
    state: CropEditorState,
}

impl CropEditor {
    /// Start editing inside `bounds`, seeding from `existing` when given,
    /// otherwise from a centred crop for `ratio`.
    pub fn enter(bounds: Size, ratio: Option<f64>, existing: Option<Rect>) -> Self {
        Self::with_min_size(bounds, ratio, existing, MIN_CROP_SIZE)
    }

    pub fn with_min_size(bounds: Size, ratio: Option<f64>, existing: Option<Rect>, min_size: f64) -> Self {
        let ratio = ratio.filter(|r| r.is_finite() && *r > 0.0);
        let seed = existing.unwrap_or_else(|| center_crop_for_ratio(bounds.width, bounds.height, ratio));
        Self {
            bounds,
            ratio,
            rect: clamp_rect_to_bounds(seed, bounds, min_size),
            min_size,
            state: CropEditorState::Idle,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn ratio(&self) -> Option<f64> {
        self.ratio
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn state(&self) -> &CropEditorState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, CropEditorState::Dragging(_))
    }

    /// Switch aspect ratio; the rectangle is re-seeded centred for it.
    pub fn set_ratio(&mut self, ratio: Option<f64>) -> Rect {
        self.ratio = ratio.filter(|r| r.is_finite() && *r > 0.0);
        self.state = CropEditorState::Idle;
        let seed = center_crop_for_ratio(self.bounds.width, self.bounds.height, self.ratio);
        self.rect = clamp_rect_to_bounds(seed, self.bounds, self.min_size);
        self.rect
    }

    /// Feed one pointer event. Returns the updated rectangle when the event
    /// changed it; `scale` is the current view scale (screen px per content px).
    pub fn handle_event(&mut self, event: PointerEvent, scale: f64) -> Option<Rect> {
        match (event, self.state) {
            (PointerEvent::Down { handle, position }, _) => {
                self.state = CropEditorState::Dragging(CropDragSession {
                    handle,
                    anchor_pointer: position,
                    anchor_rect: self.rect,
                });
                None
            }
            (PointerEvent::Move { position }, CropEditorState::Dragging(session)) => {
                let (dx, dy) = screen_delta_to_content_delta(
                    position.x - session.anchor_pointer.x,
                    position.y - session.anchor_pointer.y,
                    scale,
                );
                self.rect = match session.handle {
                    DragHandle::Move => move_rect(session.anchor_rect, dx, dy, self.bounds),
                    corner => resize_rect(
                        session.anchor_rect,
                        corner,
                        dx,
                        dy,
                        self.bounds,
                        self.ratio,
                        self.min_size,
                    ),
                };
                Some(self.rect)
            }
            (PointerEvent::Move { .. }, CropEditorState::Idle) => None,
            (PointerEvent::Up, _) => {
                self.state = CropEditorState::Idle;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn bounds() -> Size {
        Size::new(800.0, 600.0)
    }

    fn drag(editor: &mut CropEditor, handle: DragHandle, from: (f64, f64), to: (f64, f64), scale: f64) -> Option<Rect> {
        editor.handle_event(
            PointerEvent::Down {
                handle,
                position: Point::new(from.0, from.1),
            },
            scale,
        );
        let rect = editor.handle_event(
            PointerEvent::Move {
                position: Point::new(to.0, to.1),
            },
            scale,
        );
        editor.handle_event(PointerEvent::Up, scale);
        rect
    }

    #[test]
    fn test_scenario_d_se_drag_at_scale_two() {
        let mut editor = CropEditor::enter(bounds(), None, Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let rect = drag(&mut editor, DragHandle::Se, (200.0, 200.0), (220.0, 220.0), 2.0);
        assert_eq!(rect, Some(Rect::new(0.0, 0.0, 110.0, 110.0)));
        assert!(!editor.is_dragging());
    }

    #[test]
    fn test_enter_seeds_from_ratio() {
        let editor = CropEditor::enter(bounds(), Some(1.0), None);
        assert_eq!(editor.rect(), Rect::new(100.0, 0.0, 600.0, 600.0));
    }

    #[test]
    fn test_enter_free_seed() {
        let editor = CropEditor::enter(bounds(), None, None);
        let rect = editor.rect();
        assert!((rect.x - 40.0).abs() < EPS);
        assert!((rect.width - 720.0).abs() < EPS);
    }

    #[test]
    fn test_enter_clamps_existing_rect() {
        let editor = CropEditor::enter(bounds(), None, Some(Rect::new(700.0, 500.0, 300.0, 300.0)));
        assert!(editor.rect().is_within(bounds(), MIN_CROP_SIZE));
    }

    #[test]
    fn test_move_translates_within_bounds() {
        let mut editor = CropEditor::enter(bounds(), None, Some(Rect::new(100.0, 100.0, 200.0, 100.0)));
        let rect = drag(&mut editor, DragHandle::Move, (0.0, 0.0), (1000.0, -1000.0), 1.0).unwrap();
        assert_eq!(rect, Rect::new(600.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_move_is_relative_to_anchor() {
        let mut editor = CropEditor::enter(bounds(), None, Some(Rect::new(100.0, 100.0, 50.0, 50.0)));
        editor.handle_event(
            PointerEvent::Down {
                handle: DragHandle::Move,
                position: Point::new(10.0, 10.0),
            },
            1.0,
        );
        editor.handle_event(PointerEvent::Move { position: Point::new(30.0, 10.0) }, 1.0);
        let rect = editor
            .handle_event(PointerEvent::Move { position: Point::new(15.0, 20.0) }, 1.0)
            .unwrap();
        assert_eq!(rect, Rect::new(105.0, 110.0, 50.0, 50.0));
    }

    #[test]
    fn test_nw_resize_keeps_opposite_corner() {
        let mut editor = CropEditor::enter(bounds(), None, Some(Rect::new(100.0, 100.0, 200.0, 200.0)));
        let rect = drag(&mut editor, DragHandle::Nw, (0.0, 0.0), (-50.0, 30.0), 1.0).unwrap();
        assert_eq!(rect, Rect::new(50.0, 130.0, 250.0, 170.0));
        assert_eq!(rect.right(), 300.0);
        assert_eq!(rect.bottom(), 300.0);
    }

    #[test]
    fn test_resize_enforces_min_size() {
        let mut editor = CropEditor::enter(bounds(), None, Some(Rect::new(100.0, 100.0, 50.0, 50.0)));
        let rect = drag(&mut editor, DragHandle::Ne, (0.0, 0.0), (-500.0, 500.0), 1.0).unwrap();
        assert_eq!(rect.width, MIN_CROP_SIZE);
        assert_eq!(rect.height, MIN_CROP_SIZE);
        assert_eq!(rect.x, 100.0);
        assert_eq!(rect.bottom(), 150.0);
    }

    #[test]
    fn test_resize_clamps_to_bounds() {
        let mut editor = CropEditor::enter(bounds(), None, Some(Rect::new(700.0, 500.0, 50.0, 50.0)));
        let rect = drag(&mut editor, DragHandle::Se, (0.0, 0.0), (900.0, 900.0), 1.0).unwrap();
        assert_eq!(rect, Rect::new(700.0, 500.0, 100.0, 100.0));
    }

    #[test]
    fn test_locked_ratio_follows_width() {
        let mut editor = CropEditor::enter(bounds(), Some(2.0), Some(Rect::new(0.0, 0.0, 200.0, 100.0)));
        let rect = drag(&mut editor, DragHandle::Se, (0.0, 0.0), (100.0, 0.0), 1.0).unwrap();
        assert!((rect.width - 300.0).abs() < EPS);
        assert!((rect.height - 150.0).abs() < EPS);
    }

    #[test]
    fn test_locked_ratio_falls_back_to_height_bound() {
        // Tall ratio near the bottom edge: width-derived height would overflow.
        let mut editor = CropEditor::enter(bounds(), Some(0.5), Some(Rect::new(0.0, 300.0, 100.0, 200.0)));
        let rect = drag(&mut editor, DragHandle::Se, (0.0, 0.0), (300.0, 0.0), 1.0).unwrap();
        assert!((rect.height - 300.0).abs() < EPS);
        assert!((rect.width - 150.0).abs() < EPS);
        assert!((rect.bottom() - 600.0).abs() < EPS);
    }

    #[test]
    fn test_locked_ratio_north_west() {
        let mut editor = CropEditor::enter(bounds(), Some(16.0 / 9.0), None);
        let start = editor.rect();
        let rect = drag(&mut editor, DragHandle::Nw, (0.0, 0.0), (120.0, 40.0), 1.0).unwrap();
        assert!((rect.width / rect.height - 16.0 / 9.0).abs() < 1e-6);
        assert!((rect.right() - start.right()).abs() < EPS);
        assert!((rect.bottom() - start.bottom()).abs() < EPS);
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut editor = CropEditor::enter(bounds(), None, None);
        let before = editor.rect();
        assert_eq!(
            editor.handle_event(PointerEvent::Move { position: Point::new(50.0, 50.0) }, 1.0),
            None
        );
        assert_eq!(editor.rect(), before);
    }

    #[test]
    fn test_up_discards_session() {
        let mut editor = CropEditor::enter(bounds(), None, None);
        editor.handle_event(
            PointerEvent::Down {
                handle: DragHandle::Move,
                position: Point::new(0.0, 0.0),
            },
            1.0,
        );
        assert!(matches!(editor.state(), CropEditorState::Dragging(s) if s.handle == DragHandle::Move));
        editor.handle_event(PointerEvent::Up, 1.0);
        assert_eq!(*editor.state(), CropEditorState::Idle);
    }

    #[test]
    fn test_set_ratio_reseeds() {
        let mut editor = CropEditor::enter(bounds(), None, Some(Rect::new(0.0, 0.0, 20.0, 20.0)));
        let rect = editor.set_ratio(Some(4.0 / 3.0));
        assert_eq!(rect, Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(editor.ratio(), Some(4.0 / 3.0));
    }

    #[test]
    fn test_hit_test_zones() {
        let rect = Rect::new(100.0, 100.0, 200.0, 100.0);
        assert_eq!(hit_test(rect, Point::new(102.0, 98.0), 8.0), Some(DragHandle::Nw));
        assert_eq!(hit_test(rect, Point::new(300.0, 100.0), 8.0), Some(DragHandle::Ne));
        assert_eq!(hit_test(rect, Point::new(95.0, 205.0), 8.0), Some(DragHandle::Sw));
        assert_eq!(hit_test(rect, Point::new(301.0, 199.0), 8.0), Some(DragHandle::Se));
        assert_eq!(hit_test(rect, Point::new(200.0, 150.0), 8.0), Some(DragHandle::Move));
        assert_eq!(hit_test(rect, Point::new(50.0, 50.0), 8.0), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
