use std::collections::BTreeMap;

use crate::dataset::{ClusterId, ClusterPair, Job, SimilarityTable};

/// Value every entry takes when the comparison set has no spread.
pub(in crate::app) const FLAT_SET_VALUE: f64 = 1.0;

/// Min-max rescale into `[0, 1]`, index for index.
///
/// Non-finite inputs take no part in the min/max and come back as `None`.
pub(in crate::app) fn min_max(values: &[f64]) -> Vec<Option<f64>> {
    let bounds = values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(None, |bounds: Option<(f64, f64)>, value| match bounds {
            Some((min, max)) => Some((min.min(value), max.max(value))),
            None => Some((value, value)),
        });

    let Some((min, max)) = bounds else {
        return vec![None; values.len()];
    };

    let span = max - min;
    let flat = !(span.is_finite() && span > 0.0);

    values
        .iter()
        .map(|&value| {
            if !value.is_finite() {
                None
            } else if flat {
                Some(FLAT_SET_VALUE)
            } else {
                Some(((value - min) / span).clamp(0.0, 1.0))
            }
        })
        .collect()
}

/// Cluster-to-cluster similarities normalized together across every known pair.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct NormalizedGroupSimilarity {
    values: BTreeMap<ClusterPair, f64>,
}

impl NormalizedGroupSimilarity {
    #[cfg(test)]
    pub(in crate::app) fn get(&self, a: ClusterId, b: ClusterId) -> Option<f64> {
        self.values.get(&ClusterPair::new(a, b)).copied()
    }

    pub(in crate::app) fn len(&self) -> usize {
        self.values.len()
    }

    pub(in crate::app) fn pairs_at_least(
        &self,
        threshold: f64,
    ) -> impl Iterator<Item = (ClusterPair, f64)> + '_ {
        self.values
            .iter()
            .filter(move |(_, value)| **value >= threshold)
            .map(|(pair, value)| (*pair, *value))
    }

    pub(in crate::app) fn most_similar_to(
        &self,
        cluster: ClusterId,
        limit: usize,
    ) -> Vec<(ClusterId, f64)> {
        let mut related = self
            .values
            .iter()
            .filter_map(|(pair, value)| pair.other(cluster).map(|other| (other, *value)))
            .collect::<Vec<_>>();
        related.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        related.truncate(limit);
        related
    }
}

pub(in crate::app) fn normalize_group_similarities(
    table: &SimilarityTable,
) -> NormalizedGroupSimilarity {
    let (pairs, raw): (Vec<_>, Vec<_>) = table.iter().unzip();
    let values = pairs
        .into_iter()
        .zip(min_max(&raw))
        .filter_map(|(pair, value)| value.map(|value| (pair, value)))
        .collect();

    NormalizedGroupSimilarity { values }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct JobAffinity {
    pub(in crate::app) cluster: ClusterId,
    pub(in crate::app) raw: f64,
    pub(in crate::app) normalized: f64,
}

/// One job's affinity to every cluster, normalized against that job's own scores only.
///
/// Sorted strongest first; ties keep cluster id order.
pub(in crate::app) fn normalize_job_affinities(job: &Job) -> Vec<JobAffinity> {
    let (clusters, raw): (Vec<_>, Vec<_>) = job
        .affinities
        .iter()
        .map(|(cluster, value)| (*cluster, *value))
        .unzip();

    let mut affinities = clusters
        .into_iter()
        .zip(raw.iter().copied())
        .zip(min_max(&raw))
        .filter_map(|((cluster, raw), normalized)| {
            normalized.map(|normalized| JobAffinity {
                cluster,
                raw,
                normalized,
            })
        })
        .collect::<Vec<_>>();

    affinities.sort_by(|a, b| {
        b.normalized
            .total_cmp(&a.normalized)
            .then_with(|| a.cluster.cmp(&b.cluster))
    });
    affinities
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;

    use super::*;
    use crate::dataset::DomainPoint;

    fn job_with(affinities: &[(ClusterId, f64)]) -> Job {
        Job {
            id: "job".to_owned(),
            title: "Job".to_owned(),
            position: DomainPoint::ORIGIN,
            cluster: 0,
            color: Color32::WHITE,
            affinities: affinities.iter().copied().collect(),
        }
    }

    #[test]
    fn extremes_map_to_bounds() {
        let normalized = min_max(&[0.2, -0.4, 0.8, 0.5]);
        assert_eq!(normalized[1], Some(0.0));
        assert_eq!(normalized[2], Some(1.0));
        for value in normalized.into_iter().flatten() {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn preserves_index_correspondence() {
        let normalized = min_max(&[10.0, 20.0, 15.0]);
        assert_eq!(normalized, vec![Some(0.0), Some(1.0), Some(0.5)]);
    }

    #[test]
    fn flat_sets_use_constant() {
        assert_eq!(min_max(&[0.3, 0.3, 0.3]), vec![Some(FLAT_SET_VALUE); 3]);
        assert_eq!(min_max(&[-7.0]), vec![Some(FLAT_SET_VALUE)]);
        assert!(min_max(&[]).is_empty());
    }

    #[test]
    fn non_finite_values_are_excluded() {
        let normalized = min_max(&[f64::NAN, 1.0, 3.0, f64::INFINITY]);
        assert_eq!(normalized, vec![None, Some(0.0), Some(1.0), None]);
        assert_eq!(min_max(&[f64::NAN]), vec![None]);
    }

    #[test]
    fn near_equal_values_stay_in_range() {
        let normalized = min_max(&[1e-12, 0.1 + 0.2, 0.3]);
        for value in normalized.into_iter().flatten() {
            assert!(value <= 1.0 && value >= 0.0);
        }
    }

    #[test]
    fn group_scope_normalizes_across_all_pairs() {
        let mut table = SimilarityTable::default();
        table.insert(ClusterPair::new(0, 1), -1.0);
        table.insert(ClusterPair::new(0, 2), 1.0);
        table.insert(ClusterPair::new(1, 2), 3.0);

        let normalized = normalize_group_similarities(&table);
        assert_eq!(normalized.get(1, 0), Some(0.0));
        assert_eq!(normalized.get(2, 1), Some(1.0));
        assert_eq!(normalized.get(0, 2), Some(0.5));
        assert_eq!(normalized.get(0, 3), None);
        assert_eq!(normalized.pairs_at_least(0.5).count(), 2);
        assert_eq!(normalized.most_similar_to(2, 1), vec![(1, 1.0)]);
    }

    #[test]
    fn job_scope_is_local_to_the_job() {
        let job = job_with(&[(0, 0.91), (1, 0.20), (2, 0.55)]);
        let affinities = normalize_job_affinities(&job);

        assert_eq!(affinities.len(), 3);
        assert_eq!(affinities[0].cluster, 0);
        assert_eq!(affinities[0].normalized, 1.0);
        assert_eq!(affinities[2].cluster, 1);
        assert_eq!(affinities[2].normalized, 0.0);
        assert_eq!(affinities[0].raw, 0.91);
    }

    #[test]
    fn job_without_affinities_yields_nothing() {
        assert!(normalize_job_affinities(&job_with(&[])).is_empty());
    }
}
