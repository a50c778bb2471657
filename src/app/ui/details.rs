use eframe::egui::{self, RichText, Ui};

use crate::dataset::{Cluster, ClusterId};
use crate::util::{format_percent, short_label};

use super::super::ViewModel;
use super::super::highlight::{Selection, SelectionEvent};
use super::super::normalize::normalize_job_affinities;

const SIMILAR_CLUSTER_ROWS: usize = 8;
const MEMBER_ROWS: usize = 40;

fn keyword_line(cluster: &Cluster) -> Option<String> {
    (!cluster.keywords.is_empty()).then(|| format!("Keywords: {}", cluster.keywords.join(", ")))
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let event = match self.selection {
            Selection::Nothing => {
                ui.label("Select a job or cluster in the scene or the lists.");
                None
            }
            Selection::Job(index) => self.draw_job_details(ui, index),
            Selection::Cluster(id) => self.draw_cluster_details(ui, id),
        };

        if let Some(event) = event {
            self.select_from_panel(ui, event);
        }
    }

    fn draw_job_details(&self, ui: &mut Ui, index: usize) -> Option<SelectionEvent> {
        let Some(job) = self.dataset.jobs.get(index) else {
            ui.label("Selected job no longer exists in the dataset.");
            return None;
        };
        let mut event = None;

        ui.label(RichText::new(job.title.as_str()).strong());
        ui.small(job.id.as_str());
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label("Cluster:");
            if ui.link(self.dataset.cluster_label(job.cluster)).clicked() {
                event = Some(SelectionEvent::ClusterSelected(job.cluster));
            }
        });
        let position = job.position;
        if self.dataset.has_depth {
            ui.label(format!(
                "Position: ({:.2}, {:.2}, {:.2})",
                position.x, position.y, position.z
            ));
        } else {
            ui.label(format!("Position: ({:.2}, {:.2})", position.x, position.y));
        }

        ui.separator();
        ui.label(RichText::new("Cluster affinity").strong());
        let affinities = normalize_job_affinities(job);
        if affinities.is_empty() {
            ui.label("No affinity scores for this job.");
            return event;
        }

        egui::ScrollArea::vertical()
            .id_salt("job_affinity_scroll")
            .max_height(360.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for affinity in &affinities {
                    let label = format!(
                        "{}  {}",
                        format_percent(affinity.normalized),
                        self.dataset.cluster_label(affinity.cluster)
                    );
                    if ui
                        .link(label)
                        .on_hover_text(format!("raw score {:.4}", affinity.raw))
                        .clicked()
                    {
                        event = Some(SelectionEvent::ClusterSelected(affinity.cluster));
                    }
                }
            });

        event
    }

    fn draw_cluster_details(&self, ui: &mut Ui, id: ClusterId) -> Option<SelectionEvent> {
        let Some(cluster) = self.dataset.cluster(id) else {
            ui.label("Selected cluster no longer exists in the dataset.");
            return None;
        };
        let mut event = None;

        ui.label(RichText::new(cluster.label()).strong().color(cluster.color));
        ui.small(format!("cluster {}", cluster.id));
        ui.add_space(6.0);
        ui.label(format!("Jobs: {}", cluster.size));
        if let Some(keywords) = keyword_line(cluster) {
            ui.label(keywords);
        }

        ui.separator();
        ui.label(RichText::new("Most similar clusters").strong());
        let similar = self.group_similarity.most_similar_to(id, SIMILAR_CLUSTER_ROWS);
        if self.dataset.similarity.is_empty() {
            ui.label("The dataset has no cluster similarities.");
        } else if similar.is_empty() {
            ui.label("No similarity data for this cluster.");
        }
        for (other, similarity) in similar {
            let label = format!(
                "{}  {}",
                format_percent(similarity),
                self.dataset.cluster_label(other)
            );
            if ui.link(label).clicked() {
                event = Some(SelectionEvent::ClusterSelected(other));
            }
        }

        ui.separator();
        ui.label(RichText::new("Members").strong());
        egui::ScrollArea::vertical()
            .id_salt("cluster_members_scroll")
            .max_height(320.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for index in self.dataset.members(id).take(MEMBER_ROWS) {
                    let Some(job) = self.dataset.jobs.get(index) else {
                        continue;
                    };
                    if ui
                        .link(short_label(&job.title, 44))
                        .on_hover_text(job.id.as_str())
                        .clicked()
                    {
                        event = Some(SelectionEvent::JobSelected(index));
                    }
                }
            });
        let remaining = self.dataset.members(id).count().saturating_sub(MEMBER_ROWS);
        if remaining > 0 {
            ui.small(format!("and {remaining} more"));
        }

        event
    }
}
