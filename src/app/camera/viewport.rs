use eframe::egui::{Pos2, Vec2};

use crate::dataset::DomainPoint;

use super::super::transform::CoordinateTransform;
use super::{CameraController, Projection, ease_in_out_cubic};

pub(in crate::app) const ZOOM_IN_FACTOR: f32 = 1.09;
pub(in crate::app) const ZOOM_OUT_FACTOR: f32 = 0.92;
pub(in crate::app) const DEFAULT_MIN_SCALE: f32 = 0.18;
pub(in crate::app) const DEFAULT_MAX_SCALE: f32 = 7.0;
pub(in crate::app) const CENTRE_ON_SECS: f64 = 0.75;

/// Affine map from transformed canvas space to the screen: `screen = pan + canvas * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ViewportState {
    pub(in crate::app) pan: Vec2,
    pub(in crate::app) scale: f32,
}

impl ViewportState {
    pub(in crate::app) const IDENTITY: Self = Self {
        pan: Vec2::ZERO,
        scale: 1.0,
    };

    pub(in crate::app) fn apply(&self, canvas: Pos2) -> Pos2 {
        (self.pan + (canvas.to_vec2() * self.scale)).to_pos2()
    }

    pub(in crate::app) fn invert(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.pan) / self.scale).to_pos2()
    }

    fn lerp(from: Self, to: Self, t: f64) -> Self {
        let mix = |a: f32, b: f32| (a as f64 + ((b as f64 - a as f64) * t)) as f32;
        Self {
            pan: Vec2::new(mix(from.pan.x, to.pan.x), mix(from.pan.y, to.pan.y)),
            scale: mix(from.scale, to.scale),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Animation {
    from: ViewportState,
    to: ViewportState,
    start: f64,
    duration: f64,
}

impl Animation {
    fn sample(&self, now: f64) -> (ViewportState, bool) {
        let elapsed = now - self.start;
        if !(self.duration > 0.0) || elapsed >= self.duration {
            return (self.to, true);
        }
        if !(elapsed > 0.0) {
            return (self.from, false);
        }

        let eased = ease_in_out_cubic(elapsed / self.duration);
        (ViewportState::lerp(self.from, self.to, eased), false)
    }
}

fn sanitize_scale_range(min_scale: f32, max_scale: f32) -> (f32, f32) {
    let valid = |value: f32| value.is_finite() && value > 0.0;
    let min_scale = if valid(min_scale) {
        min_scale
    } else {
        DEFAULT_MIN_SCALE
    };
    let max_scale = if valid(max_scale) {
        max_scale
    } else {
        DEFAULT_MAX_SCALE
    };

    if min_scale <= max_scale {
        (min_scale, max_scale)
    } else {
        (max_scale, min_scale)
    }
}

/// Pan/zoom state of the flat scene plus the animated centre-on transition.
#[derive(Clone, Debug)]
pub(in crate::app) struct ViewportController {
    state: ViewportState,
    transform: CoordinateTransform,
    min_scale: f32,
    max_scale: f32,
    duration: f64,
    animation: Option<Animation>,
    drag_origin: Option<Vec2>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SCALE, DEFAULT_MAX_SCALE)
    }
}

impl ViewportController {
    pub(in crate::app) fn new(min_scale: f32, max_scale: f32) -> Self {
        let (min_scale, max_scale) = sanitize_scale_range(min_scale, max_scale);
        Self {
            state: ViewportState {
                pan: Vec2::ZERO,
                scale: 1.0_f32.clamp(min_scale, max_scale),
            },
            transform: CoordinateTransform::default(),
            min_scale,
            max_scale,
            duration: CENTRE_ON_SECS,
            animation: None,
            drag_origin: None,
        }
    }

    pub(in crate::app) fn state(&self) -> ViewportState {
        self.state
    }

    #[cfg(test)]
    pub(in crate::app) fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    #[cfg(test)]
    pub(in crate::app) fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        if scale.is_finite() {
            scale.clamp(self.min_scale, self.max_scale)
        } else {
            self.state.scale
        }
    }

    /// Rescales around `cursor` so the point under it stays put. Cancels any transition.
    pub(in crate::app) fn zoom_to(&mut self, requested_scale: f32, cursor: Pos2) {
        self.animation = None;

        let current = self.state.scale;
        let next = self.clamp_scale(requested_scale);
        let ratio = next / current;
        let cursor = cursor.to_vec2();

        self.state.pan = cursor - ((cursor - self.state.pan) * ratio);
        self.state.scale = next;
    }

    pub(in crate::app) fn zoom_step(&mut self, scroll_delta: f32, cursor: Pos2) {
        if !scroll_delta.is_finite() || scroll_delta == 0.0 {
            return;
        }

        let factor = if scroll_delta > 0.0 {
            ZOOM_IN_FACTOR
        } else {
            ZOOM_OUT_FACTOR
        };
        self.zoom_to(self.state.scale * factor, cursor);
    }

    /// Viewport that puts `point` at the surface center. Never zooms out.
    pub(in crate::app) fn centre_target(
        &self,
        point: DomainPoint,
        requested_scale: f32,
    ) -> ViewportState {
        let scale = self.clamp_scale(requested_scale.max(self.state.scale));
        let canvas = self.transform.to_screen(point).to_vec2();
        let center = self.transform.center().to_vec2();

        ViewportState {
            pan: center - (canvas * scale),
            scale,
        }
    }

    pub(in crate::app) fn animate_to(&mut self, target: ViewportState, now: f64) {
        self.animation = Some(Animation {
            from: self.state,
            to: target,
            start: now,
            duration: self.duration,
        });
    }

    pub(in crate::app) fn centre_on(&mut self, point: DomainPoint, requested_scale: f32, now: f64) {
        let target = self.centre_target(point, requested_scale);
        self.animate_to(target, now);
    }

    pub(in crate::app) fn domain_at(&self, screen: Pos2) -> DomainPoint {
        self.transform.to_domain(self.state.invert(screen))
    }
}

impl CameraController for ViewportController {
    fn set_surface(&mut self, surface: Vec2) {
        self.transform.set_surface(surface);
    }

    fn begin_drag(&mut self, _secondary: bool) {
        self.animation = None;
        self.drag_origin = Some(self.state.pan);
    }

    fn drag_to(&mut self, offset: Vec2) {
        if let Some(origin) = self.drag_origin {
            self.state.pan = origin + offset;
        }
    }

    fn end_drag(&mut self) {
        self.drag_origin = None;
    }

    fn zoom_at(&mut self, scroll_delta: f32, anchor: Pos2) {
        self.zoom_step(scroll_delta, anchor);
    }

    fn focus(&mut self, target: DomainPoint, scale_hint: f32, now: f64) {
        self.centre_on(target, scale_hint, now);
    }

    // The flat view keeps its framing when the selection goes away.
    fn release_focus(&mut self, _now: f64) {}

    fn reset(&mut self, now: f64) {
        let identity = ViewportState {
            scale: self.clamp_scale(1.0),
            ..ViewportState::IDENTITY
        };
        self.animate_to(identity, now);
    }

    fn tick(&mut self, now: f64) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };

        let (state, finished) = animation.sample(now);
        self.state = state;
        if finished {
            self.animation = None;
        }
        !finished
    }

    fn project(&self, point: DomainPoint) -> Option<Projection> {
        Some(Projection {
            pos: self.state.apply(self.transform.to_screen(point)),
            depth: 0.0,
            size_scale: self.state.scale,
        })
    }

    fn zoom_level(&self) -> f32 {
        self.state.scale
    }
}
