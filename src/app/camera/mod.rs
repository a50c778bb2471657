mod gesture;
mod orbit;
mod viewport;

use eframe::egui::{Pos2, Vec2};

use crate::dataset::DomainPoint;

pub(in crate::app) use gesture::{GestureEnd, PointerGesture};
pub(in crate::app) use orbit::OrbitCamera;
pub(in crate::app) use viewport::{ViewportController, ViewportState};

/// A domain point placed on the canvas. `depth` grows away from the viewer and
/// `size_scale` multiplies marker radii.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Projection {
    pub(in crate::app) pos: Pos2,
    pub(in crate::app) depth: f32,
    pub(in crate::app) size_scale: f32,
}

/// Shared navigation surface of the flat viewport and the orbit camera.
///
/// Canvas positions are local to the drawing surface. `now` is in seconds.
pub(in crate::app) trait CameraController {
    fn set_surface(&mut self, surface: Vec2);

    fn begin_drag(&mut self, secondary: bool);

    /// `offset` is the total pointer travel since `begin_drag`.
    fn drag_to(&mut self, offset: Vec2);

    fn end_drag(&mut self);

    fn zoom_at(&mut self, scroll_delta: f32, anchor: Pos2);

    fn focus(&mut self, target: DomainPoint, scale_hint: f32, now: f64);

    fn release_focus(&mut self, now: f64);

    fn reset(&mut self, now: f64);

    /// Advances animation or tracking. Returns `true` while the view is still moving.
    fn tick(&mut self, now: f64) -> bool;

    fn project(&self, point: DomainPoint) -> Option<Projection>;

    fn zoom_level(&self) -> f32;
}

pub(in crate::app) fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
