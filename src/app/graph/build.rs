use std::sync::Arc;

use crate::dataset::ClusterPair;

use super::super::ViewModel;
use super::super::neighbors::{Edge, NeighborOptions};

impl ViewModel {
    pub(in crate::app) fn neighbor_options(&self) -> NeighborOptions {
        NeighborOptions {
            max_distance: self.config.neighbor_distance,
            per_node_cap: self.config.neighbor_cap,
            max_edges: self.config.max_edges,
            only_group: self.selection.cluster(&self.dataset),
            ..NeighborOptions::default()
        }
    }

    /// Sparse job-to-job edges, narrowed to the focused cluster while one is selected.
    pub(in crate::app) fn neighbor_edges(&mut self) -> Arc<Vec<Edge>> {
        let options = self.neighbor_options();
        self.neighbor_cache
            .edges(self.revision, options, &self.positions, &self.groups)
    }

    pub(in crate::app) fn cluster_edges(&self) -> Vec<(ClusterPair, f64)> {
        self.group_similarity
            .pairs_at_least(self.config.group_threshold)
            .collect()
    }
}
