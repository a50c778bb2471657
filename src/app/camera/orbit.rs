use eframe::egui::{Pos2, Vec2, pos2};

use crate::dataset::DomainPoint;

use super::{CameraController, Projection};

/// Share of the remaining distance to the tracked point covered each frame.
pub(in crate::app) const TRACKING_FACTOR: f32 = 0.05;

const ROTATE_SPEED: f32 = 0.008;
const MAX_PITCH: f32 = 1.45;
const NEAR_PLANE: f32 = 0.1;
const SETTLE_DISTANCE: f32 = 1e-3;
const DOLLY_IN: f32 = 0.92;
const DOLLY_OUT: f32 = 1.09;

#[derive(Clone, Copy, Debug)]
struct OrbitDrag {
    yaw: f32,
    pitch: f32,
    pan_offset: DomainPoint,
    secondary: bool,
}

/// Orbit camera around a look-at point that eases toward the focused entity.
///
/// Orbit, dolly and pan stay available while tracking; panning shifts the tracked
/// point instead of fighting it.
#[derive(Clone, Debug)]
pub(in crate::app) struct OrbitCamera {
    yaw: f32,
    pitch: f32,
    distance: f32,
    min_distance: f32,
    max_distance: f32,
    fov_y: f32,
    surface: Vec2,
    target: DomainPoint,
    focus: Option<DomainPoint>,
    pan_offset: DomainPoint,
    drag: Option<OrbitDrag>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.35,
            distance: 150.0,
            min_distance: 8.0,
            max_distance: 600.0,
            fov_y: 50.0_f32.to_radians(),
            surface: Vec2::ZERO,
            target: DomainPoint::ORIGIN,
            focus: None,
            pan_offset: DomainPoint::ORIGIN,
            drag: None,
        }
    }
}

impl OrbitCamera {
    pub(in crate::app) fn target(&self) -> DomainPoint {
        self.target
    }

    pub(in crate::app) fn distance(&self) -> f32 {
        self.distance
    }

    fn goal(&self) -> DomainPoint {
        self.focus.unwrap_or(DomainPoint::ORIGIN) + self.pan_offset
    }

    fn eye(&self) -> DomainPoint {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + DomainPoint::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    // forward, right, up
    fn basis(&self) -> (DomainPoint, DomainPoint, DomainPoint) {
        let forward = (self.target - self.eye()).normalized();
        let right = forward.cross(DomainPoint::new(0.0, 1.0, 0.0)).normalized();
        let up = right.cross(forward);
        (forward, right, up)
    }

    fn focal_length(&self) -> f32 {
        let half_extent = self.surface.x.min(self.surface.y) * 0.5;
        if !half_extent.is_finite() || half_extent <= 0.0 {
            return 1.0;
        }
        half_extent / (self.fov_y * 0.5).tan()
    }

    fn center(&self) -> Pos2 {
        let half = |dimension: f32| {
            if dimension.is_finite() && dimension > 0.0 {
                dimension * 0.5
            } else {
                0.0
            }
        };
        pos2(half(self.surface.x), half(self.surface.y))
    }
}

impl CameraController for OrbitCamera {
    fn set_surface(&mut self, surface: Vec2) {
        self.surface = surface;
    }

    fn begin_drag(&mut self, secondary: bool) {
        self.drag = Some(OrbitDrag {
            yaw: self.yaw,
            pitch: self.pitch,
            pan_offset: self.pan_offset,
            secondary,
        });
    }

    fn drag_to(&mut self, offset: Vec2) {
        let Some(drag) = self.drag else {
            return;
        };

        if drag.secondary {
            let (_, right, up) = self.basis();
            let world_per_pixel = self.distance / self.focal_length();
            self.pan_offset = drag.pan_offset
                + (right * (-offset.x * world_per_pixel))
                + (up * (offset.y * world_per_pixel));
        } else {
            self.yaw = drag.yaw - (offset.x * ROTATE_SPEED);
            self.pitch = (drag.pitch + (offset.y * ROTATE_SPEED)).clamp(-MAX_PITCH, MAX_PITCH);
        }
    }

    fn end_drag(&mut self) {
        self.drag = None;
    }

    fn zoom_at(&mut self, scroll_delta: f32, _anchor: Pos2) {
        if !scroll_delta.is_finite() || scroll_delta == 0.0 {
            return;
        }

        let factor = if scroll_delta > 0.0 {
            DOLLY_IN
        } else {
            DOLLY_OUT
        };
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    fn focus(&mut self, target: DomainPoint, _scale_hint: f32, _now: f64) {
        self.focus = Some(target);
        self.pan_offset = DomainPoint::ORIGIN;
    }

    fn release_focus(&mut self, _now: f64) {
        self.focus = None;
        self.pan_offset = DomainPoint::ORIGIN;
    }

    fn reset(&mut self, now: f64) {
        self.release_focus(now);
        let defaults = Self::default();
        self.yaw = defaults.yaw;
        self.pitch = defaults.pitch;
        self.distance = defaults.distance;
    }

    fn tick(&mut self, _now: f64) -> bool {
        let remaining = self.goal() - self.target;
        if remaining.length() <= SETTLE_DISTANCE {
            self.target = self.goal();
            return false;
        }

        self.target = self.target + (remaining * TRACKING_FACTOR);
        true
    }

    fn project(&self, point: DomainPoint) -> Option<Projection> {
        let (forward, right, up) = self.basis();
        let relative = point - self.eye();
        let depth = relative.dot(forward);
        if !depth.is_finite() || depth <= NEAR_PLANE {
            return None;
        }

        let focal = self.focal_length();
        let center = self.center();
        let x = relative.dot(right) * focal / depth;
        let y = relative.dot(up) * focal / depth;

        Some(Projection {
            pos: pos2(center.x + x, center.y - y),
            depth,
            size_scale: (self.distance / depth).clamp(0.2, 4.0),
        })
    }

    fn zoom_level(&self) -> f32 {
        Self::default().distance / self.distance
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn camera() -> OrbitCamera {
        let mut camera = OrbitCamera::default();
        camera.set_surface(vec2(900.0, 600.0));
        camera
    }

    #[test]
    fn target_projects_to_center() {
        let camera = camera();
        let projection = camera.project(camera.target()).expect("target is in front");
        assert!(projection.pos.distance(pos2(450.0, 300.0)) < 1e-3);
        assert!((projection.size_scale - 1.0).abs() < 1e-4);
    }

    #[test]
    fn points_behind_the_eye_are_culled() {
        let camera = camera();
        let eye = camera.eye();
        let behind = eye + (eye - camera.target()).normalized() * 10.0;
        assert!(camera.project(behind).is_none());
    }

    #[test]
    fn tracking_moves_five_percent_per_frame() {
        let mut camera = camera();
        let goal = DomainPoint::new(20.0, 0.0, 0.0);
        camera.focus(goal, 1.0, 0.0);

        assert!(camera.tick(0.0));
        assert!((camera.target().x - 1.0).abs() < 1e-5);
        assert!(camera.tick(0.016));
        assert!((camera.target().x - 1.95).abs() < 1e-4);
    }

    #[test]
    fn tracking_converges_and_settles() {
        let mut camera = camera();
        let goal = DomainPoint::new(-12.0, 4.0, 30.0);
        camera.focus(goal, 1.0, 0.0);

        let mut frames = 0;
        while camera.tick(frames as f64 / 60.0) {
            frames += 1;
            assert!(frames < 1_000, "tracking never settled");
        }
        assert_eq!(camera.target(), goal);
    }

    #[test]
    fn releasing_focus_returns_to_origin() {
        let mut camera = camera();
        camera.focus(DomainPoint::new(10.0, 10.0, 10.0), 1.0, 0.0);
        for frame in 0..400 {
            camera.tick(frame as f64);
        }
        camera.release_focus(0.0);
        for frame in 0..400 {
            camera.tick(frame as f64);
        }
        assert_eq!(camera.target(), DomainPoint::ORIGIN);
    }

    #[test]
    fn orbiting_is_not_locked_by_tracking() {
        let mut camera = camera();
        camera.focus(DomainPoint::new(30.0, 0.0, 0.0), 1.0, 0.0);
        camera.tick(0.0);

        camera.begin_drag(false);
        camera.drag_to(vec2(100.0, 0.0));
        camera.tick(0.016);
        camera.end_drag();

        assert!((camera.yaw - (0.6 - 0.8)).abs() < 1e-5);
        assert!(camera.target().x > 1.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = camera();
        camera.begin_drag(false);
        camera.drag_to(vec2(0.0, 10_000.0));
        assert_eq!(camera.pitch, MAX_PITCH);
        camera.drag_to(vec2(0.0, -10_000.0));
        assert_eq!(camera.pitch, -MAX_PITCH);
    }

    #[test]
    fn dolly_is_clamped() {
        let mut camera = camera();
        for _ in 0..200 {
            camera.zoom_at(1.0, Pos2::ZERO);
        }
        assert_eq!(camera.distance(), 8.0);
        for _ in 0..200 {
            camera.zoom_at(-1.0, Pos2::ZERO);
        }
        assert_eq!(camera.distance(), 600.0);
    }

    #[test]
    fn secondary_drag_pans_tracked_point() {
        let mut camera = camera();
        camera.begin_drag(true);
        camera.drag_to(vec2(-50.0, 0.0));
        camera.end_drag();
        for frame in 0..600 {
            camera.tick(frame as f64);
        }
        assert!(camera.target().length() > 1.0);

        camera.reset(0.0);
        for frame in 0..600 {
            camera.tick(frame as f64);
        }
        assert_eq!(camera.target(), DomainPoint::ORIGIN);
    }

    #[test]
    fn zero_surface_projection_is_finite() {
        let mut camera = camera();
        camera.set_surface(Vec2::ZERO);
        let projection = camera
            .project(DomainPoint::new(5.0, 5.0, 5.0))
            .expect("in front");
        assert!(projection.pos.x.is_finite() && projection.pos.y.is_finite());
    }
}
