//! Pointer driven gestures: moving the frame and resizing it from a corner.

use eframe::egui;

use crate::crop_state::CropState;
use crate::geometry::{self, CropRect, DisplayGeometry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    pub const ALL: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    pub fn is_left(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::BottomLeft)
    }

    pub fn is_top(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::TopRight)
    }

    /// Position of this corner on `rect`.
    pub fn corner(self, rect: &CropRect) -> egui::Pos2 {
        let (min, max) = (rect.min(), rect.max());
        egui::pos2(
            if self.is_left() { min.x } else { max.x },
            if self.is_top() { min.y } else { max.y },
        )
    }

    /// The diagonally opposite corner, which stays put while this one is dragged.
    pub fn opposite(self, rect: &CropRect) -> egui::Pos2 {
        let (min, max) = (rect.min(), rect.max());
        egui::pos2(
            if self.is_left() { max.x } else { min.x },
            if self.is_top() { max.y } else { min.y },
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Body,
    Handle(Handle),
}

/// Classifies a pointer-down. Corners win over the body.
pub fn hit_test(pos: egui::Pos2, rect: &CropRect, tolerance: f32) -> Option<HitTarget> {
    for handle in Handle::ALL {
        if pos.distance(handle.corner(rect)) < tolerance {
            return Some(HitTarget::Handle(handle));
        }
    }

    if rect.contains(pos) {
        return Some(HitTarget::Body);
    }

    None
}

/// Modifier keys as seen by the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Restrict a move to the axis of the first movement.
    pub axis_lock: bool,
    /// Resize around the frame's center instead of the opposite corner.
    pub center_anchor: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisLock {
    /// No movement seen yet.
    Pending,
    Free,
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub start: egui::Pos2,
    pub origin: CropRect,
    pub axis: AxisLock,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResizeAnchor {
    Corner(egui::Pos2),
    Center(egui::Pos2),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeSession {
    pub handle: Handle,
    pub anchor: ResizeAnchor,
}

/// The gesture in progress, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum InteractionSession {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
}

impl InteractionSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionSession::Idle)
    }
}

/// Owns the gesture state and writes every intermediate frame through
/// [`CropState::commit`].
///
/// A gesture only ends on [`InteractionController::pointer_up`]. If the input
/// source never delivers it the controller stays in the gesture until the
/// next pointer-down resets it.
#[derive(Debug, Clone)]
pub struct InteractionController {
    session: InteractionSession,
    handle_tolerance: f32,
}

impl InteractionController {
    pub fn new(handle_tolerance: f32) -> Self {
        Self {
            session: InteractionSession::Idle,
            handle_tolerance,
        }
    }

    pub fn session(&self) -> &InteractionSession {
        &self.session
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.session, InteractionSession::Dragging(_))
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.session, InteractionSession::Resizing(_))
    }

    /// Starts a gesture if `pos` lands on the frame or one of its handles.
    /// Returns whether a gesture started.
    pub fn pointer_down(
        &mut self,
        pos: egui::Pos2,
        modifiers: Modifiers,
        crop: &CropState,
    ) -> bool {
        if !self.session.is_idle() {
            log::debug!("Discarding stale gesture {:?}", self.session);
        }
        self.session = InteractionSession::Idle;

        let Some(rect) = crop.get() else {
            return false;
        };

        self.session = match hit_test(pos, &rect, self.handle_tolerance) {
            Some(HitTarget::Body) => InteractionSession::Dragging(DragSession {
                start: pos,
                origin: rect,
                axis: AxisLock::Pending,
            }),
            Some(HitTarget::Handle(handle)) => {
                let anchor = if modifiers.center_anchor {
                    ResizeAnchor::Center(rect.center())
                } else {
                    ResizeAnchor::Corner(handle.opposite(&rect))
                };
                InteractionSession::Resizing(ResizeSession {
                    handle,
                    anchor,
                })
            }
            None => return false,
        };

        log::debug!("Gesture started: {:?}", self.session);
        true
    }

    /// Feeds a pointer position into the active gesture and commits the
    /// resulting frame. Returns the frame now stored, if it changed.
    pub fn pointer_move(
        &mut self,
        pos: egui::Pos2,
        modifiers: Modifiers,
        crop: &mut CropState,
        bounds: &DisplayGeometry,
    ) -> Option<CropRect> {
        let min_size = crop.min_size();
        let target = match &mut self.session {
            InteractionSession::Idle => return None,
            InteractionSession::Dragging(drag) => drag_to(drag, pos, modifiers, bounds),
            InteractionSession::Resizing(resize) => match resize.anchor {
                ResizeAnchor::Corner(anchor) => {
                    resize_from_corner(resize.handle, anchor, pos, bounds, min_size)
                }
                ResizeAnchor::Center(center) => resize_from_center(center, pos, bounds, min_size),
            },
        };

        match crop.commit(target, bounds) {
            Ok(rect) => Some(rect),
            Err(e) => {
                log::debug!("Gesture update rejected: {e}");
                None
            }
        }
    }

    /// Ends the active gesture. Returns whether one was active.
    pub fn pointer_up(&mut self) -> bool {
        let was_active = !self.session.is_idle();
        if was_active {
            log::debug!("Gesture ended: {:?}", self.session);
        }
        self.session = InteractionSession::Idle;
        was_active
    }
}

fn drag_to(
    drag: &mut DragSession,
    pos: egui::Pos2,
    modifiers: Modifiers,
    bounds: &DisplayGeometry,
) -> CropRect {
    let mut delta = pos - drag.start;

    if drag.axis == AxisLock::Pending && delta != egui::Vec2::ZERO {
        drag.axis = if !modifiers.axis_lock {
            AxisLock::Free
        } else if delta.x.abs() > delta.y.abs() {
            AxisLock::Horizontal
        } else {
            AxisLock::Vertical
        };
    }

    match drag.axis {
        AxisLock::Horizontal => delta.y = 0.0,
        AxisLock::Vertical => delta.x = 0.0,
        AxisLock::Pending | AxisLock::Free => {}
    }

    let moved = CropRect {
        x: drag.origin.x + delta.x,
        y: drag.origin.y + delta.y,
        ..drag.origin
    };
    geometry::clamp_position(moved, bounds)
}

/// Square resize with the corner opposite `handle` pinned at `anchor`.
pub fn resize_from_corner(
    handle: Handle,
    anchor: egui::Pos2,
    pointer: egui::Pos2,
    bounds: &DisplayGeometry,
    min_size: f32,
) -> CropRect {
    // Signed extents: positive while the pointer is on the handle's side of the anchor.
    let width = if handle.is_left() {
        anchor.x - pointer.x
    } else {
        pointer.x - anchor.x
    };
    let height = if handle.is_top() {
        anchor.y - pointer.y
    } else {
        pointer.y - anchor.y
    };

    let max_x = if handle.is_left() {
        anchor.x - bounds.left()
    } else {
        bounds.right() - anchor.x
    };
    let max_y = if handle.is_top() {
        anchor.y - bounds.top()
    } else {
        bounds.bottom() - anchor.y
    };
    let max_size = max_x.min(max_y).max(min_size);

    let size = width.max(height).max(min_size).min(max_size);

    let x = if handle.is_left() { anchor.x - size } else { anchor.x };
    let y = if handle.is_top() { anchor.y - size } else { anchor.y };
    geometry::clamp_position(CropRect::new(x, y, size), bounds)
}

/// Square resize that keeps `center` fixed and moves all edges together.
pub fn resize_from_center(
    center: egui::Pos2,
    pointer: egui::Pos2,
    bounds: &DisplayGeometry,
    min_size: f32,
) -> CropRect {
    let max_half = (center.x - bounds.left())
        .min(bounds.right() - center.x)
        .min(center.y - bounds.top())
        .min(bounds.bottom() - center.y);

    let half = (pointer.x - center.x)
        .abs()
        .max((pointer.y - center.y).abs())
        .min(max_half)
        .max(min_size / 2.0);

    geometry::clamp_position(
        CropRect::new(center.x - half, center.y - half, half * 2.0),
        bounds,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HANDLE_TOLERANCE, MIN_SIZE};
    use approx::assert_abs_diff_eq;

    fn bounds() -> DisplayGeometry {
        DisplayGeometry {
            width: 400.0,
            height: 300.0,
            offset_x: 0.0,
            offset_y: 50.0,
        }
    }

    fn state_with(rect: CropRect) -> CropState {
        let mut crop = CropState::new(MIN_SIZE);
        crop.commit(rect, &bounds()).unwrap();
        crop
    }

    #[test]
    fn hit_test_prefers_corners() {
        let rect = CropRect::new(100.0, 100.0, 100.0);
        let t = HANDLE_TOLERANCE;
        assert_eq!(
            hit_test(egui::pos2(102.0, 103.0), &rect, t),
            Some(HitTarget::Handle(Handle::TopLeft))
        );
        assert_eq!(
            hit_test(egui::pos2(199.0, 198.0), &rect, t),
            Some(HitTarget::Handle(Handle::BottomRight))
        );
        assert_eq!(
            hit_test(egui::pos2(150.0, 150.0), &rect, t),
            Some(HitTarget::Body)
        );
        assert_eq!(hit_test(egui::pos2(20.0, 20.0), &rect, t), None);
    }

    #[test]
    fn pointer_down_on_background_is_ignored() {
        let crop = state_with(CropRect::new(100.0, 100.0, 100.0));
        let mut controller = InteractionController::new(HANDLE_TOLERANCE);
        assert!(!controller.pointer_down(egui::pos2(5.0, 60.0), Modifiers::default(), &crop));
        assert!(controller.session().is_idle());
    }

    #[test]
    fn pointer_down_resets_stale_gesture() {
        let crop = state_with(CropRect::new(100.0, 100.0, 100.0));
        let mut controller = InteractionController::new(HANDLE_TOLERANCE);
        assert!(controller.pointer_down(egui::pos2(150.0, 150.0), Modifiers::default(), &crop));
        assert!(controller.is_dragging());

        // pointer-up lost; a background press must not keep the old drag alive
        assert!(!controller.pointer_down(egui::pos2(5.0, 60.0), Modifiers::default(), &crop));
        assert!(controller.session().is_idle());
    }

    #[test]
    fn drag_moves_and_clamps() {
        let mut crop = state_with(CropRect::new(100.0, 100.0, 100.0));
        let mut controller = InteractionController::new(HANDLE_TOLERANCE);
        controller.pointer_down(egui::pos2(150.0, 150.0), Modifiers::default(), &crop);

        let r = controller
            .pointer_move(egui::pos2(170.0, 130.0), Modifiers::default(), &mut crop, &bounds())
            .unwrap();
        assert_eq!(r, CropRect::new(120.0, 80.0, 100.0));

        let r = controller
            .pointer_move(egui::pos2(1000.0, -500.0), Modifiers::default(), &mut crop, &bounds())
            .unwrap();
        assert_eq!(r, CropRect::new(300.0, 50.0, 100.0));

        assert!(controller.pointer_up());
        assert!(!controller.pointer_up());
    }

    #[test]
    fn axis_lock_follows_first_movement_for_whole_gesture() {
        let mut crop = state_with(CropRect::new(100.0, 100.0, 100.0));
        let mut controller = InteractionController::new(HANDLE_TOLERANCE);
        let locked = Modifiers {
            axis_lock: true,
            ..Default::default()
        };
        controller.pointer_down(egui::pos2(150.0, 150.0), locked, &crop);

        let r = controller
            .pointer_move(egui::pos2(160.0, 153.0), locked, &mut crop, &bounds())
            .unwrap();
        assert_eq!(r, CropRect::new(110.0, 100.0, 100.0));

        // Later vertical motion is ignored, even with the modifier released.
        let r = controller
            .pointer_move(egui::pos2(165.0, 220.0), Modifiers::default(), &mut crop, &bounds())
            .unwrap();
        assert_eq!(r, CropRect::new(115.0, 100.0, 100.0));
        controller.pointer_up();

        // A fresh gesture evaluates the lock again.
        controller.pointer_down(egui::pos2(150.0, 150.0), locked, &crop);
        let r = controller
            .pointer_move(egui::pos2(151.0, 170.0), locked, &mut crop, &bounds())
            .unwrap();
        assert_eq!(r, CropRect::new(115.0, 120.0, 100.0));
    }

    #[test]
    fn top_left_onto_anchor_floors_at_min_size() {
        let anchor = egui::pos2(200.0, 200.0);
        let r = resize_from_corner(Handle::TopLeft, anchor, anchor, &bounds(), MIN_SIZE);
        assert_eq!(r, CropRect::new(150.0, 150.0, MIN_SIZE));
    }

    #[test]
    fn corner_resize_grows_to_larger_extent() {
        let anchor = egui::pos2(100.0, 100.0);
        let r = resize_from_corner(
            Handle::BottomRight,
            anchor,
            egui::pos2(180.0, 230.0),
            &bounds(),
            MIN_SIZE,
        );
        assert_eq!(r, CropRect::new(100.0, 100.0, 130.0));
    }

    #[test]
    fn corner_resize_stops_at_tighter_image_edge() {
        let anchor = egui::pos2(100.0, 300.0);
        let r = resize_from_corner(
            Handle::TopRight,
            anchor,
            egui::pos2(600.0, -200.0),
            &bounds(),
            MIN_SIZE,
        );
        // right edge allows 300, top edge only 250
        assert_eq!(r, CropRect::new(100.0, 50.0, 250.0));
    }

    #[test]
    fn center_resize_caps_at_image_edge() {
        let center = egui::pos2(350.0, 200.0);
        let r = resize_from_center(center, egui::pos2(900.0, 210.0), &bounds(), MIN_SIZE);
        assert_abs_diff_eq!(r.x + r.size, bounds().right());
        assert_abs_diff_eq!(r.center().x, center.x);
        assert_abs_diff_eq!(r.center().y, center.y);
        assert_abs_diff_eq!(r.size, 100.0);
    }

    #[test]
    fn center_mode_is_sampled_at_gesture_start() {
        let mut crop = state_with(CropRect::new(100.0, 100.0, 100.0));
        let mut controller = InteractionController::new(HANDLE_TOLERANCE);
        let center = Modifiers {
            center_anchor: true,
            ..Default::default()
        };
        assert!(controller.pointer_down(egui::pos2(200.0, 200.0), center, &crop));

        let r = controller
            .pointer_move(egui::pos2(220.0, 210.0), Modifiers::default(), &mut crop, &bounds())
            .unwrap();
        assert_eq!(r, CropRect::new(80.0, 80.0, 140.0));
    }

    #[test]
    fn move_without_gesture_does_nothing() {
        let mut crop = state_with(CropRect::new(100.0, 100.0, 100.0));
        let mut controller = InteractionController::new(HANDLE_TOLERANCE);
        assert_eq!(
            controller.pointer_move(egui::pos2(10.0, 10.0), Modifiers::default(), &mut crop, &bounds()),
            None
        );
        assert_eq!(crop.get(), Some(CropRect::new(100.0, 100.0, 100.0)));
    }
}
