use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use log::{debug, info, warn};

use crate::dataset::{ClusterId, Dataset, DomainPoint, load_dataset};

mod camera;
mod graph;
mod highlight;
mod neighbors;
mod normalize;
mod render_utils;
mod search;
mod transform;
mod ui;

use camera::{CameraController, OrbitCamera, PointerGesture, ViewportController};
use graph::SceneScratch;
use highlight::{Selection, SelectionEvent};
use neighbors::NeighborCache;
use normalize::NormalizedGroupSimilarity;
use search::SearchMatchCache;

/// Scale requested when centring on a single job.
const JOB_FOCUS_SCALE: f32 = 2.2;
/// Scale requested when centring on a cluster centroid.
const CLUSTER_FOCUS_SCALE: f32 = 1.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ViewMode {
    #[default]
    #[value(name = "2d")]
    Flat,
    #[value(name = "3d")]
    Orbit,
}

impl ViewMode {
    fn label(self) -> &'static str {
        match self {
            Self::Flat => "2D",
            Self::Orbit => "3D",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ExplorerConfig {
    pub view_mode: ViewMode,
    pub min_scale: f32,
    pub max_scale: f32,
    pub neighbor_cap: usize,
    pub max_edges: usize,
    pub neighbor_distance: f32,
    pub group_threshold: f64,
}

pub struct ExplorerApp {
    dataset_path: PathBuf,
    config: ExplorerConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<Dataset, String>>>,
    loads: u64,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Dataset, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    dataset: Dataset,
    revision: u64,
    positions: Vec<DomainPoint>,
    groups: Vec<ClusterId>,
    config: ExplorerConfig,
    view_mode: ViewMode,
    flat: ViewportController,
    orbit: OrbitCamera,
    gesture: Option<PointerGesture>,
    selection: Selection,
    hovered: Option<usize>,
    search: String,
    search_cache: SearchMatchCache,
    neighbor_cache: NeighborCache,
    group_similarity: NormalizedGroupSimilarity,
    show_neighbor_edges: bool,
    show_cluster_edges: bool,
    show_labels: bool,
    scratch: SceneScratch,
    visible_job_count: usize,
    visible_edge_count: usize,
}

impl ExplorerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dataset_path: PathBuf,
        config: ExplorerConfig,
    ) -> Self {
        let state = Self::start_load(dataset_path.clone());
        Self {
            dataset_path,
            config,
            state,
            reload_rx: None,
            loads: 0,
        }
    }

    fn spawn_load(dataset_path: PathBuf) -> Receiver<Result<Dataset, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_dataset(&dataset_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(dataset_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(dataset_path),
        }
    }

    fn finish_load(&mut self, result: Result<Dataset, String>) -> AppState {
        match result {
            Ok(dataset) => {
                self.loads += 1;
                AppState::Ready(Box::new(ViewModel::new(dataset, self.config, self.loads)))
            }
            Err(error) => {
                warn!("dataset load failed: {error}");
                AppState::Error(error)
            }
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut finished = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => finished = Some(result),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading job embedding dataset...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load job embedding dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.dataset_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.dataset_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    info!("reloading {}", self.dataset_path.display());
                    self.reload_rx = Some(Self::spawn_load(self.dataset_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => finished = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(result) = finished {
            transition = Some(self.finish_load(result));
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
            ctx.request_repaint();
        } else if matches!(self.state, AppState::Loading { .. }) || self.reload_rx.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}

impl ViewModel {
    fn camera_mut(&mut self) -> &mut dyn CameraController {
        match self.view_mode {
            ViewMode::Flat => &mut self.flat,
            ViewMode::Orbit => &mut self.orbit,
        }
    }

    fn focus_target(&self, selection: Selection) -> Option<(DomainPoint, f32)> {
        match selection {
            Selection::Nothing => None,
            Selection::Job(index) => self
                .dataset
                .jobs
                .get(index)
                .map(|job| (job.position, JOB_FOCUS_SCALE)),
            Selection::Cluster(id) => self
                .dataset
                .cluster(id)
                .map(|cluster| (cluster.centroid, CLUSTER_FOCUS_SCALE)),
        }
    }

    /// Updates the selection and asks the active camera to follow it.
    fn apply_selection_event(&mut self, event: SelectionEvent, now: f64) {
        let selection = event.selection();
        let focus = self.focus_target(selection);
        if selection != Selection::Nothing && focus.is_none() {
            warn!("ignoring {event:?}: no such job or cluster");
            return;
        }

        if self.selection != selection {
            debug!("selection {:?} -> {selection:?}", self.selection);
        }
        self.selection = selection;

        match focus {
            Some((target, scale)) => self.camera_mut().focus(target, scale, now),
            None => self.camera_mut().release_focus(now),
        }
    }

    fn set_view_mode(&mut self, view_mode: ViewMode, now: f64) {
        if self.view_mode == view_mode {
            return;
        }

        info!("switching to {} view", view_mode.label());
        self.view_mode = view_mode;
        self.gesture = None;
        match self.focus_target(self.selection) {
            Some((target, scale)) => self.camera_mut().focus(target, scale, now),
            None => self.camera_mut().release_focus(now),
        }
    }

    fn reset_view(&mut self, now: f64) {
        self.camera_mut().reset(now);
    }
}
