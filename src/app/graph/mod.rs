mod build;
mod interaction;
mod view;

use eframe::egui::{Pos2, Vec2};

use crate::dataset::{ClusterId, Dataset};

use super::camera::CameraController;

pub(in crate::app) const JOB_RADIUS: f32 = 4.0;
pub(in crate::app) const CENTROID_RADIUS: f32 = 8.0;
const HIT_PADDING: f32 = 3.0;

/// What the pointer is over. Jobs win over centroids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum Hit {
    Job(usize),
    Cluster(ClusterId),
    Background,
}

/// A projected marker: screen position and drawn radius.
pub(in crate::app) type Marker = (Pos2, f32);

fn nearest<K: Copy>(
    pointer: Pos2,
    markers: impl Iterator<Item = (K, Option<Marker>)>,
) -> Option<K> {
    markers
        .filter_map(|(key, marker)| {
            let (position, radius) = marker?;
            let distance = position.distance(pointer);
            (distance <= radius + HIT_PADDING).then_some((key, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key)
}

pub(in crate::app) fn hit_test(
    pointer: Pos2,
    jobs: &[Option<Marker>],
    centroids: &[(ClusterId, Option<Marker>)],
) -> Hit {
    if let Some(index) = nearest(pointer, jobs.iter().copied().enumerate()) {
        return Hit::Job(index);
    }
    if let Some(id) = nearest(pointer, centroids.iter().copied()) {
        return Hit::Cluster(id);
    }
    Hit::Background
}

/// Per-frame projection buffers, reused between frames.
#[derive(Debug, Default)]
pub(in crate::app) struct SceneScratch {
    jobs: Vec<Option<Marker>>,
    depths: Vec<f32>,
    centroids: Vec<(ClusterId, Option<Marker>)>,
    draw_order: Vec<usize>,
}

impl SceneScratch {
    pub(in crate::app) fn project(
        &mut self,
        camera: &dyn CameraController,
        dataset: &Dataset,
        offset: Vec2,
    ) {
        self.jobs.clear();
        self.depths.clear();
        for job in &dataset.jobs {
            let projection = camera.project(job.position);
            self.jobs.push(projection.map(|projection| {
                let radius = (JOB_RADIUS * projection.size_scale.sqrt()).clamp(2.0, 14.0);
                (projection.pos + offset, radius)
            }));
            self.depths
                .push(projection.map_or(f32::INFINITY, |projection| projection.depth));
        }

        self.centroids.clear();
        self.centroids.extend(dataset.clusters.iter().map(|cluster| {
            let marker = camera.project(cluster.centroid).map(|projection| {
                let radius = (CENTROID_RADIUS * projection.size_scale.sqrt()).clamp(4.0, 20.0);
                (projection.pos + offset, radius)
            });
            (cluster.id, marker)
        }));

        // far to near; stable so the flat view keeps input order
        self.draw_order.clear();
        self.draw_order.extend(0..self.jobs.len());
        let depths = &self.depths;
        self.draw_order
            .sort_by(|a, b| depths[*b].total_cmp(&depths[*a]));
    }

    pub(in crate::app) fn hit_test(&self, pointer: Pos2) -> Hit {
        hit_test(pointer, &self.jobs, &self.centroids)
    }

    pub(in crate::app) fn job(&self, index: usize) -> Option<Marker> {
        self.jobs.get(index).copied().flatten()
    }

    pub(in crate::app) fn centroid(&self, id: ClusterId) -> Option<Marker> {
        self.centroids
            .iter()
            .find(|(cluster, _)| *cluster == id)
            .and_then(|(_, marker)| *marker)
    }

    pub(in crate::app) fn centroids(&self) -> &[(ClusterId, Option<Marker>)] {
        &self.centroids
    }

    pub(in crate::app) fn draw_order(&self) -> &[usize] {
        &self.draw_order
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn job_beats_centroid_under_pointer() {
        let jobs = [Some((pos2(10.0, 10.0), 4.0))];
        let centroids = [(7, Some((pos2(11.0, 10.0), 8.0)))];
        assert_eq!(hit_test(pos2(11.0, 10.0), &jobs, &centroids), Hit::Job(0));
    }

    #[test]
    fn centroid_when_no_job_is_hit() {
        let jobs = [Some((pos2(100.0, 100.0), 4.0))];
        let centroids = [(7, Some((pos2(11.0, 10.0), 8.0)))];
        assert_eq!(
            hit_test(pos2(15.0, 10.0), &jobs, &centroids),
            Hit::Cluster(7)
        );
    }

    #[test]
    fn nearest_job_wins() {
        let jobs = [
            Some((pos2(10.0, 10.0), 6.0)),
            Some((pos2(14.0, 10.0), 6.0)),
            None,
        ];
        assert_eq!(hit_test(pos2(13.0, 10.0), &jobs, &[]), Hit::Job(1));
    }

    #[test]
    fn empty_space_is_background() {
        let jobs = [Some((pos2(10.0, 10.0), 4.0)), None];
        let centroids = [(1, None)];
        assert_eq!(
            hit_test(pos2(200.0, 200.0), &jobs, &centroids),
            Hit::Background
        );
        assert_eq!(hit_test(pos2(0.0, 0.0), &[], &[]), Hit::Background);
    }

    #[test]
    fn hit_slop_extends_radius() {
        let jobs = [Some((pos2(0.0, 0.0), 4.0))];
        assert_eq!(hit_test(pos2(6.5, 0.0), &jobs, &[]), Hit::Job(0));
        assert_eq!(hit_test(pos2(7.5, 0.0), &jobs, &[]), Hit::Background);
    }
}
