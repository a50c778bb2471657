use std::path::Path;

use eframe::egui::{self, Align, Context, Layout};

use crate::dataset::Dataset;

use super::super::camera::{OrbitCamera, ViewportController};
use super::super::graph::SceneScratch;
use super::super::highlight::{Selection, SelectionEvent};
use super::super::neighbors::NeighborCache;
use super::super::normalize::normalize_group_similarities;
use super::super::search::SearchMatchCache;
use super::super::{ExplorerConfig, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(dataset: Dataset, config: ExplorerConfig, revision: u64) -> Self {
        let positions = dataset.positions();
        let groups = dataset.cluster_ids();
        let group_similarity = normalize_group_similarities(&dataset.similarity);

        Self {
            positions,
            groups,
            group_similarity,
            revision,
            config,
            view_mode: config.view_mode,
            flat: ViewportController::new(config.min_scale, config.max_scale),
            orbit: OrbitCamera::default(),
            gesture: None,
            selection: Selection::Nothing,
            hovered: None,
            search: String::new(),
            search_cache: SearchMatchCache::default(),
            neighbor_cache: NeighborCache::default(),
            show_neighbor_edges: true,
            show_cluster_edges: true,
            show_labels: true,
            scratch: SceneScratch::default(),
            visible_job_count: 0,
            visible_edge_count: 0,
            dataset,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        dataset_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("job-atlas");
                    ui.separator();
                    ui.label(format!("dataset: {}", dataset_path.display()));
                    ui.label(format!("jobs: {}", self.dataset.job_count()));
                    ui.label(format!("clusters: {}", self.dataset.clusters.len()));
                    ui.label(format!("cluster pairs: {}", self.group_similarity.len()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload dataset"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if is_loading {
                        ui.spinner();
                        ui.label("reloading...");
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "{} view  |  visible jobs {}  |  neighbor edges {}",
                            self.view_mode.label(),
                            self.visible_job_count,
                            self.visible_edge_count
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_scene(ui));
    }

    /// Selection entry point for the side panels; the scene uses the same path.
    pub(in crate::app) fn select_from_panel(&mut self, ui: &egui::Ui, event: SelectionEvent) {
        let now = ui.input(|input| input.time);
        self.apply_selection_event(event, now);
    }
}
