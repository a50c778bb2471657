use eframe::egui::{Align2, Color32, CursorIcon, FontId, Painter, Pos2, Rect, Sense, Stroke, Ui, vec2};

use crate::util::short_label;

use super::super::camera::CameraController;
use super::super::highlight::{Emphasis, HighlightState};
use super::super::render_utils::{
    SELECTED_COLOR, circle_visible, dim_color, draw_grid, edge_visible, fill_background,
    marker_style, with_alpha,
};
use super::super::{ViewMode, ViewModel};
use super::Hit;

const LABEL_CHARS: usize = 32;

impl ViewModel {
    pub(in crate::app) fn draw_scene(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let now = ui.input(|input| input.time);

        self.camera_mut().set_surface(rect.size());
        let camera_moving = self.camera_mut().tick(now);

        fill_background(&painter, rect);
        if self.view_mode == ViewMode::Flat {
            draw_grid(&painter, rect, self.flat.state());
        }

        let camera: &dyn CameraController = match self.view_mode {
            ViewMode::Flat => &self.flat,
            ViewMode::Orbit => &self.orbit,
        };
        self.scratch
            .project(camera, &self.dataset, rect.min.to_vec2());

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer));
        let hit = pointer.map_or(Hit::Background, |pointer| self.scratch.hit_test(pointer));
        self.hovered = match hit {
            Hit::Job(index) => Some(index),
            _ => None,
        };

        let event = self.handle_scene_input(ui, rect, &response, hit);

        self.search_cache
            .refresh(&self.dataset.jobs, &self.search, self.revision);
        let highlight = HighlightState::new(
            self.selection,
            &self.dataset,
            self.hovered,
            self.search_cache.matches(),
        );

        if self.show_cluster_edges {
            self.draw_cluster_edges(&painter, rect, &highlight);
        }
        self.visible_edge_count = if self.show_neighbor_edges {
            self.draw_neighbor_edges(&painter, rect, &highlight)
        } else {
            0
        };
        self.visible_job_count = self.draw_jobs(&painter, rect, &highlight);
        self.draw_centroids(&painter, rect, &highlight);
        self.draw_readout(&painter, rect, hit, pointer);

        if let Some(gesture) = &self.gesture
            && gesture.dragged()
        {
            ui.output_mut(|output| output.cursor_icon = CursorIcon::Grabbing);
        } else if hit != Hit::Background {
            ui.output_mut(|output| output.cursor_icon = CursorIcon::PointingHand);
        }

        if let Some(event) = event {
            self.apply_selection_event(event, now);
        }

        if camera_moving || self.gesture.is_some() {
            ui.ctx().request_repaint();
        }
    }

    fn draw_cluster_edges(&self, painter: &Painter, rect: Rect, highlight: &HighlightState) {
        for (pair, similarity) in self.cluster_edges() {
            let (Some((start, _)), Some((end, _))) = (
                self.scratch.centroid(pair.low()),
                self.scratch.centroid(pair.high()),
            ) else {
                continue;
            };
            if !edge_visible(rect, start, end, 2.0) {
                continue;
            }

            let dimmed = highlight.cluster_emphasis(pair.low()) == Emphasis::Dimmed
                && highlight.cluster_emphasis(pair.high()) == Emphasis::Dimmed;
            let strength = similarity as f32;
            let alpha = if dimmed { 0.08 } else { 0.2 + (strength * 0.5) };
            painter.line_segment(
                [start, end],
                Stroke::new(
                    1.0 + (strength * 2.5),
                    with_alpha(Color32::from_rgb(170, 180, 210), alpha),
                ),
            );
        }
    }

    fn draw_neighbor_edges(
        &mut self,
        painter: &Painter,
        rect: Rect,
        highlight: &HighlightState,
    ) -> usize {
        let edges = self.neighbor_edges();
        let mut drawn = 0usize;

        for edge in edges.iter() {
            let (Some((start, _)), Some((end, _))) =
                (self.scratch.job(edge.a), self.scratch.job(edge.b))
            else {
                continue;
            };
            if !edge_visible(rect, start, end, 1.0) {
                continue;
            }
            let Some(job) = self.dataset.jobs.get(edge.a) else {
                continue;
            };

            let emphasis = highlight.job_emphasis(edge.a, job.cluster);
            let color = if emphasis == Emphasis::Dimmed {
                dim_color(with_alpha(job.color, 0.25), 0.5)
            } else {
                with_alpha(job.color, 0.25 + (edge.weight * 0.45))
            };
            painter.line_segment([start, end], Stroke::new(0.6 + edge.weight, color));
            drawn += 1;
        }

        drawn
    }

    fn draw_jobs(&self, painter: &Painter, rect: Rect, highlight: &HighlightState) -> usize {
        let mut visible = 0usize;

        for &index in self.scratch.draw_order() {
            let (Some((position, radius)), Some(job)) =
                (self.scratch.job(index), self.dataset.jobs.get(index))
            else {
                continue;
            };

            let emphasis = highlight.job_emphasis(index, job.cluster);
            let style = marker_style(job.color, emphasis);
            let radius = radius * style.radius_scale;
            if !circle_visible(rect, position, radius) {
                continue;
            }
            visible += 1;

            painter.circle_filled(position, radius, style.fill);
            if style.outline != Stroke::NONE {
                painter.circle_stroke(position, radius, style.outline);
            }

            let labelled = matches!(emphasis, Emphasis::Selected | Emphasis::Hovered);
            if self.show_labels && labelled {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    short_label(&job.title, LABEL_CHARS),
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        visible
    }

    fn draw_centroids(&self, painter: &Painter, rect: Rect, highlight: &HighlightState) {
        for &(id, marker) in self.scratch.centroids() {
            let (Some((position, radius)), Some(cluster)) = (marker, self.dataset.cluster(id))
            else {
                continue;
            };
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let emphasis = highlight.cluster_emphasis(id);
            let (ring, width) = match emphasis {
                Emphasis::Selected => (SELECTED_COLOR, 2.6),
                Emphasis::Dimmed => (dim_color(cluster.color, 0.4), 1.0),
                _ => (cluster.color, 1.8),
            };
            painter.circle_filled(position, radius, with_alpha(cluster.color, 0.18));
            painter.circle_stroke(position, radius, Stroke::new(width, ring));

            if self.show_labels && emphasis != Emphasis::Dimmed {
                painter.text(
                    position + vec2(0.0, -(radius + 4.0)),
                    Align2::CENTER_BOTTOM,
                    short_label(&cluster.label(), LABEL_CHARS),
                    FontId::proportional(13.0),
                    Color32::from_gray(225),
                );
            }
        }
    }

    fn draw_readout(&self, painter: &Painter, rect: Rect, hit: Hit, pointer: Option<Pos2>) {
        let hover_text = match hit {
            Hit::Job(index) => self.dataset.jobs.get(index).map(|job| {
                format!(
                    "{}  |  {}",
                    job.title,
                    self.dataset.cluster_label(job.cluster)
                )
            }),
            Hit::Cluster(id) => self.dataset.cluster(id).map(|cluster| {
                format!("{}  |  {} jobs", cluster.label(), cluster.size)
            }),
            Hit::Background => None,
        };
        if let Some(text) = hover_text {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        let camera_text = match self.view_mode {
            ViewMode::Flat => match pointer {
                Some(pointer) => {
                    let cursor = self.flat.domain_at((pointer - rect.min).to_pos2());
                    format!(
                        "zoom {:.2}x  |  cursor ({:.1}, {:.1})",
                        self.flat.zoom_level(),
                        cursor.x,
                        cursor.y
                    )
                }
                None => format!("zoom {:.2}x", self.flat.zoom_level()),
            },
            ViewMode::Orbit => {
                let target = self.orbit.target();
                format!(
                    "distance {:.0}  |  target ({:.1}, {:.1}, {:.1})",
                    self.orbit.distance(),
                    target.x,
                    target.y,
                    target.z
                )
            }
        };
        painter.text(
            rect.left_bottom() + vec2(10.0, -10.0),
            Align2::LEFT_BOTTOM,
            camera_text,
            FontId::monospace(11.0),
            Color32::from_gray(160),
        );
    }
}
