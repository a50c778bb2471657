use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;

use crate::util::{cluster_palette_color, parse_hex_color};

use super::DatasetError;
use super::model::{Cluster, ClusterId, ClusterPair, Dataset, DomainPoint, Job, SimilarityTable};

#[derive(Clone, Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    clusters: Vec<RawCluster>,
    #[serde(default)]
    jobs: Vec<RawJob>,
    #[serde(default)]
    cluster_similarity: BTreeMap<String, Option<f64>>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawCluster {
    id: ClusterId,
    centroid: Vec<f32>,
    #[serde(default)]
    size: Option<usize>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawJob {
    id: String,
    #[serde(default)]
    title: Option<String>,
    x: f32,
    y: f32,
    #[serde(default)]
    z: Option<f32>,
    cluster: ClusterId,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    affinities: BTreeMap<ClusterId, Option<f64>>,
}

fn resolve_color(raw: Option<&str>, cluster: ClusterId, owner: &str) -> eframe::egui::Color32 {
    match raw {
        Some(value) => parse_hex_color(value).unwrap_or_else(|| {
            warn!("{owner}: unreadable color `{value}`, using palette color");
            cluster_palette_color(cluster)
        }),
        None => cluster_palette_color(cluster),
    }
}

fn convert_clusters(raw_clusters: Vec<RawCluster>) -> Result<(Vec<Cluster>, bool), DatasetError> {
    let mut seen = HashSet::with_capacity(raw_clusters.len());
    let mut has_depth = false;
    let mut clusters = Vec::with_capacity(raw_clusters.len());

    for raw in raw_clusters {
        if !seen.insert(raw.id) {
            return Err(DatasetError::DuplicateCluster(raw.id));
        }

        let centroid = match raw.centroid.as_slice() {
            [x, y] => DomainPoint::flat(*x, *y),
            [x, y, z] => {
                has_depth = true;
                DomainPoint::new(*x, *y, *z)
            }
            other => {
                return Err(DatasetError::BadCentroid {
                    cluster: raw.id,
                    len: other.len(),
                });
            }
        };
        if !(centroid.x.is_finite() && centroid.y.is_finite() && centroid.z.is_finite()) {
            return Err(DatasetError::NonFiniteCentroid(raw.id));
        }

        clusters.push(Cluster {
            id: raw.id,
            centroid,
            size: raw.size.unwrap_or(0),
            color: resolve_color(raw.color.as_deref(), raw.id, &format!("cluster {}", raw.id)),
            keywords: raw.keywords,
        });
    }

    Ok((clusters, has_depth))
}

fn convert_jobs(
    raw_jobs: Vec<RawJob>,
    known_clusters: &HashSet<ClusterId>,
) -> Result<(Vec<Job>, bool), DatasetError> {
    if raw_jobs.is_empty() {
        return Err(DatasetError::NoJobs);
    }

    let mut seen = HashSet::with_capacity(raw_jobs.len());
    let mut has_depth = false;
    let mut jobs = Vec::with_capacity(raw_jobs.len());

    for raw in raw_jobs {
        if !seen.insert(raw.id.clone()) {
            return Err(DatasetError::DuplicateJob(raw.id));
        }
        if !known_clusters.contains(&raw.cluster) {
            return Err(DatasetError::UnknownCluster {
                job: raw.id,
                cluster: raw.cluster,
            });
        }

        let z = raw.z.unwrap_or(0.0);
        has_depth |= raw.z.is_some();
        if !(raw.x.is_finite() && raw.y.is_finite() && z.is_finite()) {
            return Err(DatasetError::NonFinitePosition(raw.id));
        }

        let affinities = raw
            .affinities
            .into_iter()
            .filter_map(|(cluster, value)| {
                let value = value.filter(|value| value.is_finite())?;
                known_clusters.contains(&cluster).then_some((cluster, value))
            })
            .collect();

        let title = raw
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| raw.id.clone());
        let color = resolve_color(raw.color.as_deref(), raw.cluster, &raw.id);

        jobs.push(Job {
            id: raw.id,
            title,
            position: DomainPoint::new(raw.x, raw.y, z),
            cluster: raw.cluster,
            color,
            affinities,
        });
    }

    Ok((jobs, has_depth))
}

fn convert_similarity(
    raw: BTreeMap<String, Option<f64>>,
    known_clusters: &HashSet<ClusterId>,
) -> SimilarityTable {
    let mut table = SimilarityTable::default();

    for (key, value) in raw {
        let Some(pair) = ClusterPair::parse(&key) else {
            warn!("skipping cluster similarity with malformed key `{key}`");
            continue;
        };
        if !known_clusters.contains(&pair.low()) || !known_clusters.contains(&pair.high()) {
            warn!("skipping cluster similarity `{key}` naming an unknown cluster");
            continue;
        }
        if pair.low() == pair.high() {
            continue;
        }
        let Some(value) = value.filter(|value| value.is_finite()) else {
            continue;
        };

        table.insert(pair, value);
    }

    table
}

pub(super) fn parse_dataset(raw: &str) -> Result<Dataset> {
    let parsed: RawDataset = serde_json::from_str(raw).context("invalid dataset JSON")?;

    let (mut clusters, centroid_depth) = convert_clusters(parsed.clusters)?;
    let known_clusters = clusters
        .iter()
        .map(|cluster| cluster.id)
        .collect::<HashSet<_>>();
    let (jobs, job_depth) = convert_jobs(parsed.jobs, &known_clusters)?;
    let similarity = convert_similarity(parsed.cluster_similarity, &known_clusters);

    for cluster in &mut clusters {
        if cluster.size == 0 {
            cluster.size = jobs.iter().filter(|job| job.cluster == cluster.id).count();
        }
    }

    Ok(Dataset::new(
        jobs,
        clusters,
        similarity,
        centroid_depth || job_depth,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "clusters": [
            { "id": 0, "centroid": [1.0, 2.0], "size": 2, "color": "#4e79a7", "keywords": ["care"] },
            { "id": 1, "centroid": [-3.0, 4.0], "keywords": ["code", "build"] }
        ],
        "jobs": [
            { "id": "a", "title": "Nurse", "x": 1.0, "y": 2.0, "cluster": 0,
              "affinities": { "0": 0.9, "1": null } },
            { "id": "b", "x": 1.5, "y": 2.5, "cluster": 0, "color": "not-a-color" },
            { "id": "c", "title": "Developer", "x": -3.0, "y": 4.0, "cluster": 1 }
        ],
        "cluster_similarity": { "1-0": 0.25, "0-7": 0.5, "bogus": 0.1, "0-0": 1.0 }
    }"##;

    #[test]
    fn parses_sample_dataset() {
        let dataset = parse_dataset(SAMPLE).expect("sample parses");

        assert_eq!(dataset.job_count(), 3);
        assert!(!dataset.has_depth);
        assert_eq!(dataset.jobs[1].title, "b");
        assert_eq!(dataset.jobs[0].affinities.len(), 1);
        assert_eq!(dataset.cluster(1).map(|cluster| cluster.size), Some(1));
        assert_eq!(dataset.cluster(0).map(|cluster| cluster.size), Some(2));
        assert_eq!(dataset.similarity.len(), 1);
        assert_eq!(dataset.similarity.get(0, 1), Some(0.25));
        assert_eq!(dataset.jobs[1].color, cluster_palette_color(0));
    }

    #[test]
    fn depth_is_detected_from_any_z() {
        let raw = r#"{
            "clusters": [{ "id": 3, "centroid": [0.0, 0.0] }],
            "jobs": [{ "id": "a", "x": 0.0, "y": 0.0, "z": 2.0, "cluster": 3 }]
        }"#;
        let dataset = parse_dataset(raw).expect("parses");
        assert!(dataset.has_depth);
        assert_eq!(dataset.jobs[0].position.z, 2.0);
    }

    #[test]
    fn rejects_unknown_cluster() {
        let raw = r#"{
            "clusters": [{ "id": 0, "centroid": [0.0, 0.0] }],
            "jobs": [{ "id": "a", "x": 0.0, "y": 0.0, "cluster": 4 }]
        }"#;
        let error = parse_dataset(raw).expect_err("unknown cluster");
        assert_eq!(
            error.downcast_ref::<DatasetError>(),
            Some(&DatasetError::UnknownCluster {
                job: "a".to_owned(),
                cluster: 4
            })
        );
    }

    #[test]
    fn rejects_duplicate_jobs_and_bad_centroids() {
        let duplicate = r#"{
            "clusters": [{ "id": 0, "centroid": [0.0, 0.0] }],
            "jobs": [
                { "id": "a", "x": 0.0, "y": 0.0, "cluster": 0 },
                { "id": "a", "x": 1.0, "y": 0.0, "cluster": 0 }
            ]
        }"#;
        let error = parse_dataset(duplicate).expect_err("duplicate job");
        assert_eq!(
            error.downcast_ref::<DatasetError>(),
            Some(&DatasetError::DuplicateJob("a".to_owned()))
        );

        let centroid = r#"{
            "clusters": [{ "id": 0, "centroid": [0.0] }],
            "jobs": [{ "id": "a", "x": 0.0, "y": 0.0, "cluster": 0 }]
        }"#;
        let error = parse_dataset(centroid).expect_err("bad centroid");
        assert_eq!(
            error.downcast_ref::<DatasetError>(),
            Some(&DatasetError::BadCentroid { cluster: 0, len: 1 })
        );

        let duplicate_cluster = r#"{
            "clusters": [
                { "id": 2, "centroid": [0.0, 0.0] },
                { "id": 2, "centroid": [1.0, 1.0] }
            ],
            "jobs": [{ "id": "a", "x": 0.0, "y": 0.0, "cluster": 2 }]
        }"#;
        let error = parse_dataset(duplicate_cluster).expect_err("duplicate cluster");
        assert_eq!(
            error.downcast_ref::<DatasetError>(),
            Some(&DatasetError::DuplicateCluster(2))
        );
    }

    #[test]
    fn rejects_coordinates_that_overflow_f32() {
        let centroid = r#"{
            "clusters": [{ "id": 5, "centroid": [1e39, 0.0] }],
            "jobs": [{ "id": "a", "x": 0.0, "y": 0.0, "cluster": 5 }]
        }"#;
        let error = parse_dataset(centroid).expect_err("infinite centroid");
        assert_eq!(
            error.downcast_ref::<DatasetError>(),
            Some(&DatasetError::NonFiniteCentroid(5))
        );

        let job = r#"{
            "clusters": [{ "id": 0, "centroid": [0.0, 0.0, 0.0] }],
            "jobs": [{ "id": "far", "x": 0.0, "y": 0.0, "z": -1e39, "cluster": 0 }]
        }"#;
        let error = parse_dataset(job).expect_err("infinite job coordinate");
        assert_eq!(
            error.downcast_ref::<DatasetError>(),
            Some(&DatasetError::NonFinitePosition("far".to_owned()))
        );
    }

    #[test]
    fn rejects_empty_job_list() {
        let raw = r#"{ "clusters": [], "jobs": [] }"#;
        let error = parse_dataset(raw).expect_err("empty");
        assert_eq!(
            error.downcast_ref::<DatasetError>(),
            Some(&DatasetError::NoJobs)
        );
    }
}
