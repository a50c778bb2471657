use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use log::debug;

use crate::dataset::{ClusterId, DomainPoint};

/// Smallest group that gets neighbor edges at all.
pub(in crate::app) const MIN_GROUP_SIZE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct NeighborOptions {
    pub(in crate::app) max_distance: f32,
    pub(in crate::app) per_node_cap: usize,
    pub(in crate::app) max_edges: usize,
    pub(in crate::app) min_group_size: usize,
    pub(in crate::app) same_group_only: bool,
    pub(in crate::app) only_group: Option<ClusterId>,
}

impl Default for NeighborOptions {
    fn default() -> Self {
        Self {
            max_distance: 8.0,
            per_node_cap: 2,
            max_edges: 600,
            min_group_size: MIN_GROUP_SIZE,
            same_group_only: true,
            only_group: None,
        }
    }
}

/// Undirected edge between two node indices, `a < b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Edge {
    pub(in crate::app) a: usize,
    pub(in crate::app) b: usize,
    pub(in crate::app) distance: f32,
    pub(in crate::app) weight: f32,
}

fn candidate_buckets(
    groups: &[ClusterId],
    node_count: usize,
    options: &NeighborOptions,
) -> BTreeMap<ClusterId, Vec<usize>> {
    let mut buckets: BTreeMap<ClusterId, Vec<usize>> = BTreeMap::new();
    for (index, &group) in groups.iter().enumerate().take(node_count) {
        if options.only_group.is_some_and(|only| only != group) {
            continue;
        }
        let key = if options.same_group_only { group } else { 0 };
        buckets.entry(key).or_default().push(index);
    }
    buckets
}

/// Derives a sparse nearest-neighbor edge list from node positions.
///
/// Each node contributes edges to its `per_node_cap` nearest survivors, each pair
/// appears once, and the output order depends only on the input order.
pub(in crate::app) fn build_edges(
    points: &[DomainPoint],
    groups: &[ClusterId],
    options: &NeighborOptions,
) -> Vec<Edge> {
    let max_distance = options.max_distance;
    if !max_distance.is_finite() || max_distance <= 0.0 {
        return Vec::new();
    }
    if options.per_node_cap == 0 || options.max_edges == 0 {
        return Vec::new();
    }

    let node_count = points.len().min(groups.len());
    let min_group_size = options.min_group_size.max(MIN_GROUP_SIZE);
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    let mut candidates = Vec::new();

    'buckets: for members in candidate_buckets(groups, node_count, options).into_values() {
        if members.len() < min_group_size {
            continue;
        }

        for &source in &members {
            candidates.clear();
            candidates.extend(members.iter().filter_map(|&target| {
                if target == source {
                    return None;
                }
                let distance = points[source].distance(points[target]);
                (distance < max_distance).then_some((distance, target))
            }));
            candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
            candidates.truncate(options.per_node_cap);

            for &(distance, target) in &candidates {
                let pair = (source.min(target), source.max(target));
                if !seen.insert(pair) {
                    continue;
                }

                edges.push(Edge {
                    a: pair.0,
                    b: pair.1,
                    distance,
                    weight: (1.0 - (distance / max_distance)).clamp(0.0, 1.0),
                });

                if edges.len() >= options.max_edges {
                    break 'buckets;
                }
            }
        }
    }

    edges
}

#[derive(Clone, Debug, PartialEq)]
struct NeighborCacheKey {
    revision: u64,
    options: NeighborOptions,
}

/// Keeps the last edge list until the node set revision or the options change.
#[derive(Debug, Default)]
pub(in crate::app) struct NeighborCache {
    key: Option<NeighborCacheKey>,
    edges: Arc<Vec<Edge>>,
    rebuilds: u64,
}

impl NeighborCache {
    pub(in crate::app) fn edges(
        &mut self,
        revision: u64,
        options: NeighborOptions,
        points: &[DomainPoint],
        groups: &[ClusterId],
    ) -> Arc<Vec<Edge>> {
        let key = NeighborCacheKey { revision, options };
        if self.key.as_ref() == Some(&key) {
            return Arc::clone(&self.edges);
        }

        self.edges = Arc::new(build_edges(points, groups, &key.options));
        self.rebuilds += 1;
        let longest = self
            .edges
            .iter()
            .map(|edge| edge.distance)
            .fold(0.0_f32, f32::max);
        debug!(
            "neighbor edges rebuild #{}: {} edges, longest {:.2} (max distance {:.2}, cap {}, group {:?})",
            self.rebuilds,
            self.edges.len(),
            longest,
            key.options.max_distance,
            key.options.per_node_cap,
            key.options.only_group
        );
        self.key = Some(key);
        Arc::clone(&self.edges)
    }

    #[cfg(test)]
    fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}
