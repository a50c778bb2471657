use eframe::egui::{self, RichText, Ui};

use crate::util::short_label;

use super::super::highlight::{Selection, SelectionEvent};
use super::super::{ViewMode, ViewModel};

const SEARCH_RESULT_ROWS: usize = 12;
const RESULT_LABEL_CHARS: usize = 40;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Explorer Controls");
        ui.separator();
        ui.add_space(4.0);

        let now = ui.input(|input| input.time);
        let mut view_mode = self.view_mode;
        ui.horizontal(|ui| {
            ui.label("View");
            ui.selectable_value(&mut view_mode, ViewMode::Flat, "2D")
                .on_hover_text("Pan and zoom a flat projection of the embedding.");
            ui.selectable_value(&mut view_mode, ViewMode::Orbit, "3D")
                .on_hover_text("Orbit a perspective camera around the selection.");
        });
        self.set_view_mode(view_mode, now);

        if ui
            .button("Reset view")
            .on_hover_text("Animate back to the initial framing.")
            .clicked()
        {
            self.reset_view(now);
        }

        ui.separator();
        self.draw_search(ui);

        ui.separator();
        ui.label(RichText::new("Edges").strong());
        ui.checkbox(&mut self.show_neighbor_edges, "Nearest-neighbor edges")
            .on_hover_text("Connect each job to its closest peers in the same cluster.");
        ui.checkbox(&mut self.show_cluster_edges, "Cluster relationship edges")
            .on_hover_text("Connect centroids whose normalized similarity passes the threshold.");
        ui.checkbox(&mut self.show_labels, "Labels");

        ui.add(
            egui::Slider::new(&mut self.config.neighbor_distance, 0.5..=40.0)
                .text("Neighbor distance")
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text("Maximum domain distance for a neighbor edge.");
        ui.add(egui::Slider::new(&mut self.config.neighbor_cap, 1..=8).text("Edges per job"));
        ui.add(
            egui::Slider::new(&mut self.config.max_edges, 50..=5000)
                .logarithmic(true)
                .text("Edge budget"),
        );
        ui.add(
            egui::Slider::new(&mut self.config.group_threshold, 0.0..=1.0)
                .text("Cluster similarity threshold")
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text("Hide cluster pairs below this normalized similarity.");

        ui.separator();
        self.draw_cluster_list(ui);
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.label("Search jobs")
            .on_hover_text("Fuzzy-match job titles and ids.");
        ui.text_edit_singleline(&mut self.search);

        self.search_cache
            .refresh(&self.dataset.jobs, &self.search, self.revision);
        let ranked = self.search_cache.ranked();
        if self.search.trim().is_empty() {
            return;
        }
        if ranked.is_empty() {
            ui.label("No matching jobs.");
            return;
        }

        ui.small(format!("{} matches", ranked.len()));
        let mut picked = None;
        for &index in ranked.iter().take(SEARCH_RESULT_ROWS) {
            let Some(job) = self.dataset.jobs.get(index) else {
                continue;
            };
            let selected = self.selection == Selection::Job(index);
            let label = short_label(&job.title, RESULT_LABEL_CHARS);
            if ui
                .selectable_label(selected, label)
                .on_hover_text(job.id.as_str())
                .clicked()
            {
                picked = Some(index);
            }
        }

        if let Some(index) = picked {
            self.select_from_panel(ui, SelectionEvent::JobSelected(index));
        }
    }

    fn draw_cluster_list(&mut self, ui: &mut Ui) {
        let mut picked = None;
        ui.collapsing("Clusters", |ui| {
            egui::ScrollArea::vertical()
                .id_salt("cluster_list_scroll")
                .max_height(280.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for cluster in &self.dataset.clusters {
                        let selected = self.selection == Selection::Cluster(cluster.id);
                        let text = RichText::new(format!("{}  ({})", cluster.label(), cluster.size))
                            .color(cluster.color);
                        if ui.selectable_label(selected, text).clicked() {
                            picked = Some(cluster.id);
                        }
                    }
                });
        });

        if let Some(id) = picked {
            self.select_from_panel(ui, SelectionEvent::ClusterSelected(id));
        }
    }
}
