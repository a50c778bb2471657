use eframe::egui::{Pos2, Vec2, pos2, vec2};

use crate::dataset::DomainPoint;

pub(in crate::app) const DEFAULT_DOMAIN_HALF_EXTENT: f32 = 50.0;
pub(in crate::app) const DEFAULT_PADDING: f32 = 40.0;

/// Maps domain coordinates onto a canvas of `surface` pixels and back.
///
/// Canvas coordinates are local to the drawing surface, origin top-left, y down.
/// Domain y points up, so the y axis is flipped. The domain origin lands on the
/// surface center and `[-half_extent, half_extent]` fits inside the padded area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct CoordinateTransform {
    surface: Vec2,
    half_extent: f32,
    padding: f32,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl CoordinateTransform {
    pub(in crate::app) fn new(surface: Vec2) -> Self {
        Self::with_bounds(surface, DEFAULT_DOMAIN_HALF_EXTENT, DEFAULT_PADDING)
    }

    pub(in crate::app) fn with_bounds(surface: Vec2, half_extent: f32, padding: f32) -> Self {
        Self {
            surface,
            half_extent,
            padding,
        }
    }

    pub(in crate::app) fn set_surface(&mut self, surface: Vec2) {
        self.surface = surface;
    }

    // Unusable axes fall back to a unit scale instead of dividing by zero.
    fn axis_scale(&self, dimension: f32) -> f32 {
        let usable = (dimension * 0.5) - self.padding;
        if !usable.is_finite() || usable <= 0.0 {
            return 1.0;
        }
        if !self.half_extent.is_finite() || self.half_extent <= 0.0 {
            return 1.0;
        }
        usable / self.half_extent
    }

    pub(in crate::app) fn scale(&self) -> Vec2 {
        vec2(self.axis_scale(self.surface.x), self.axis_scale(self.surface.y))
    }

    pub(in crate::app) fn center(&self) -> Pos2 {
        let half = |dimension: f32| {
            if dimension.is_finite() && dimension > 0.0 {
                dimension * 0.5
            } else {
                0.0
            }
        };
        pos2(half(self.surface.x), half(self.surface.y))
    }

    pub(in crate::app) fn to_screen(&self, point: DomainPoint) -> Pos2 {
        let center = self.center();
        let scale = self.scale();
        pos2(center.x + (point.x * scale.x), center.y - (point.y * scale.y))
    }

    pub(in crate::app) fn to_domain(&self, screen: Pos2) -> DomainPoint {
        let center = self.center();
        let scale = self.scale();
        DomainPoint::flat((screen.x - center.x) / scale.x, (center.y - screen.y) / scale.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: DomainPoint, b: DomainPoint) {
        assert!(
            (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn origin_maps_to_center() {
        let transform = CoordinateTransform::new(vec2(800.0, 600.0));
        assert_eq!(transform.to_screen(DomainPoint::ORIGIN), pos2(400.0, 300.0));
    }

    #[test]
    fn domain_extent_fits_inside_padding() {
        let transform = CoordinateTransform::new(vec2(800.0, 600.0));
        let top_right = transform.to_screen(DomainPoint::flat(50.0, 50.0));
        assert!((top_right.x - 760.0).abs() < 1e-3);
        assert!((top_right.y - 40.0).abs() < 1e-3);

        let bottom_left = transform.to_screen(DomainPoint::flat(-50.0, -50.0));
        assert!((bottom_left.x - 40.0).abs() < 1e-3);
        assert!((bottom_left.y - 560.0).abs() < 1e-3);
    }

    #[test]
    fn round_trips_across_surfaces() {
        let surfaces = [vec2(800.0, 600.0), vec2(320.0, 1200.0), vec2(1920.0, 1080.0)];
        let points = [
            DomainPoint::flat(0.0, 0.0),
            DomainPoint::flat(-50.0, 50.0),
            DomainPoint::flat(12.5, -33.25),
            DomainPoint::flat(140.0, -75.0),
        ];

        for surface in surfaces {
            let transform = CoordinateTransform::new(surface);
            for point in points {
                assert_close(transform.to_domain(transform.to_screen(point)), point);
            }
        }
    }

    #[test]
    fn zero_surface_degrades_to_unit_scale() {
        let transform = CoordinateTransform::new(Vec2::ZERO);
        assert_eq!(transform.scale(), vec2(1.0, 1.0));

        let screen = transform.to_screen(DomainPoint::flat(3.0, 4.0));
        assert!(screen.x.is_finite() && screen.y.is_finite());
        assert_eq!(screen, pos2(3.0, -4.0));
        assert_close(transform.to_domain(screen), DomainPoint::flat(3.0, 4.0));
    }

    #[test]
    fn surface_smaller_than_padding_stays_finite() {
        let transform = CoordinateTransform::new(vec2(60.0, 2000.0));
        let scale = transform.scale();
        assert_eq!(scale.x, 1.0);
        assert!(scale.y > 1.0);
        let screen = transform.to_screen(DomainPoint::flat(10.0, 10.0));
        assert!(screen.x.is_finite() && screen.y.is_finite());
    }
}
