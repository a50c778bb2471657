use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use super::camera::ViewportState;
use super::highlight::Emphasis;

pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
pub(super) const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
pub(super) const MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
const GRID_STEP: f32 = 56.0;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;
    let mix = |a: u8, b: u8| ((a as f32 * inverse) + (b as f32 * amount)) as u8;

    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (alpha.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

pub(super) fn fill_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, BACKGROUND);
}

/// Grid lines that stay glued to the flat scene while it is panned and zoomed.
pub(super) fn draw_grid(painter: &Painter, rect: Rect, viewport: ViewportState) {
    let mut step = GRID_STEP * viewport.scale;
    while step < 20.0 {
        step *= 2.0;
    }
    while step > 160.0 {
        step *= 0.5;
    }

    let origin = rect.min + viewport.pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let bounds = Rect::from_two_pos(start, end).expand(padding);
    bounds.intersects(rect)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct MarkerStyle {
    pub(super) fill: Color32,
    pub(super) radius_scale: f32,
    pub(super) outline: Stroke,
}

pub(super) fn marker_style(base: Color32, emphasis: Emphasis) -> MarkerStyle {
    let outline = |width: f32, color: Color32| Stroke::new(width, color);
    let dark = Color32::from_rgba_unmultiplied(15, 15, 15, 190);

    match emphasis {
        Emphasis::Selected => MarkerStyle {
            fill: blend_color(base, SELECTED_COLOR, 0.65),
            radius_scale: 1.9,
            outline: outline(2.2, SELECTED_COLOR),
        },
        Emphasis::Hovered => MarkerStyle {
            fill: blend_color(base, HOVER_COLOR, 0.55),
            radius_scale: 1.5,
            outline: outline(1.6, HOVER_COLOR),
        },
        Emphasis::Matched => MarkerStyle {
            fill: blend_color(base, MATCH_COLOR, 0.68),
            radius_scale: 1.3,
            outline: outline(1.55, dark),
        },
        Emphasis::Related => MarkerStyle {
            fill: base,
            radius_scale: 1.15,
            outline: outline(1.2, dark),
        },
        Emphasis::Dimmed => MarkerStyle {
            fill: dim_color(base, 0.35),
            radius_scale: 0.85,
            outline: Stroke::NONE,
        },
        Emphasis::Normal => MarkerStyle {
            fill: base,
            radius_scale: 1.0,
            outline: outline(1.0, dark),
        },
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn blend_endpoints() {
        let base = Color32::from_rgb(10, 20, 30);
        let overlay = Color32::from_rgb(210, 220, 230);
        assert_eq!(blend_color(base, overlay, 0.0), base);
        assert_eq!(blend_color(base, overlay, 1.0), overlay);
        assert_eq!(blend_color(base, overlay, 5.0), overlay);
    }

    #[test]
    fn edges_crossing_the_view_are_kept() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(edge_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0), 0.0));
        assert!(!edge_visible(rect, pos2(-50.0, -50.0), pos2(-10.0, -20.0), 2.0));
    }

    #[test]
    fn dimmed_markers_shrink_and_fade() {
        let base = Color32::from_rgb(200, 100, 50);
        let style = marker_style(base, Emphasis::Dimmed);
        assert!(style.radius_scale < 1.0);
        assert!(style.fill.r() < base.r());
        assert!(marker_style(base, Emphasis::Selected).radius_scale > 1.0);
    }
}
