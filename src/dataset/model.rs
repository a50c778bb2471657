use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::{Add, Mul, Sub};

use eframe::egui::Color32;

pub type ClusterId = u32;

/// A position in the embedding's own coordinate system. 2D datasets leave `z` at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DomainPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl DomainPoint {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn flat(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn dot(self, other: Self) -> f32 {
        (self.x * other.x) + (self.y * other.y) + (self.z * other.z)
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            (self.y * other.z) - (self.z * other.y),
            (self.z * other.x) - (self.x * other.z),
            (self.x * other.y) - (self.y * other.x),
        )
    }

    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    pub fn normalized(self) -> Self {
        let length = self.length();
        if length > f32::EPSILON {
            self * (1.0 / length)
        } else {
            Self::ORIGIN
        }
    }
}

impl Add for DomainPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for DomainPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for DomainPoint {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Unordered cluster pair, always stored as `(low, high)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterPair {
    low: ClusterId,
    high: ClusterId,
}

impl ClusterPair {
    pub fn new(a: ClusterId, b: ClusterId) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        let (a, b) = key.trim().split_once('-')?;
        let a = a.trim().parse().ok()?;
        let b = b.trim().parse().ok()?;
        Some(Self::new(a, b))
    }

    pub fn low(self) -> ClusterId {
        self.low
    }

    pub fn high(self) -> ClusterId {
        self.high
    }

    pub fn other(self, id: ClusterId) -> Option<ClusterId> {
        if id == self.low {
            Some(self.high)
        } else if id == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

impl fmt::Display for ClusterPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

#[derive(Clone, Debug)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub position: DomainPoint,
    pub cluster: ClusterId,
    pub color: Color32,
    pub affinities: BTreeMap<ClusterId, f64>,
}

#[derive(Clone, Debug)]
pub struct Cluster {
    pub id: ClusterId,
    pub centroid: DomainPoint,
    pub size: usize,
    pub color: Color32,
    pub keywords: Vec<String>,
}

impl Cluster {
    pub fn label(&self) -> String {
        if self.keywords.is_empty() {
            format!("Cluster {}", self.id)
        } else {
            self.keywords
                .iter()
                .take(3)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SimilarityTable {
    entries: BTreeMap<ClusterPair, f64>,
}

impl SimilarityTable {
    pub fn insert(&mut self, pair: ClusterPair, value: f64) {
        self.entries.insert(pair, value);
    }

    pub fn get(&self, a: ClusterId, b: ClusterId) -> Option<f64> {
        self.entries.get(&ClusterPair::new(a, b)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClusterPair, f64)> + '_ {
        self.entries.iter().map(|(pair, value)| (*pair, *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Dataset {
    pub jobs: Vec<Job>,
    pub clusters: Vec<Cluster>,
    pub similarity: SimilarityTable,
    pub has_depth: bool,
    cluster_index: HashMap<ClusterId, usize>,
}

impl Dataset {
    pub fn new(
        jobs: Vec<Job>,
        clusters: Vec<Cluster>,
        similarity: SimilarityTable,
        has_depth: bool,
    ) -> Self {
        let cluster_index = clusters
            .iter()
            .enumerate()
            .map(|(index, cluster)| (cluster.id, index))
            .collect();

        Self {
            jobs,
            clusters,
            similarity,
            has_depth,
            cluster_index,
        }
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.cluster_index
            .get(&id)
            .and_then(|&index| self.clusters.get(index))
    }

    pub fn cluster_label(&self, id: ClusterId) -> String {
        self.cluster(id)
            .map(Cluster::label)
            .unwrap_or_else(|| format!("Cluster {id}"))
    }

    pub fn members(&self, id: ClusterId) -> impl Iterator<Item = usize> + '_ {
        self.jobs
            .iter()
            .enumerate()
            .filter(move |(_, job)| job.cluster == id)
            .map(|(index, _)| index)
    }

    pub fn positions(&self) -> Vec<DomainPoint> {
        self.jobs.iter().map(|job| job.position).collect()
    }

    pub fn cluster_ids(&self) -> Vec<ClusterId> {
        self.jobs.iter().map(|job| job.cluster).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_pair_is_canonical() {
        assert_eq!(ClusterPair::new(4, 1), ClusterPair::new(1, 4));
        assert_eq!(ClusterPair::new(4, 1).to_string(), "1-4");
        assert_eq!(ClusterPair::parse("3-1"), Some(ClusterPair::new(1, 3)));
        assert_eq!(ClusterPair::parse(" 2 - 7 "), Some(ClusterPair::new(2, 7)));
    }

    #[test]
    fn cluster_pair_rejects_malformed_keys() {
        assert_eq!(ClusterPair::parse("12"), None);
        assert_eq!(ClusterPair::parse("a-b"), None);
        assert_eq!(ClusterPair::parse("-1-2"), None);
    }

    #[test]
    fn cluster_pair_other_side() {
        let pair = ClusterPair::new(2, 5);
        assert_eq!(pair.other(2), Some(5));
        assert_eq!(pair.other(5), Some(2));
        assert_eq!(pair.other(9), None);
    }

    #[test]
    fn cross_product_follows_right_hand_rule() {
        let x = DomainPoint::new(1.0, 0.0, 0.0);
        let y = DomainPoint::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), DomainPoint::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn normalizing_zero_vector_stays_finite() {
        assert_eq!(DomainPoint::ORIGIN.normalized(), DomainPoint::ORIGIN);
    }
}
