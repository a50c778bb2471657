use thiserror::Error;

use super::model::ClusterId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("dataset contains no jobs")]
    NoJobs,
    #[error("job id `{0}` appears more than once")]
    DuplicateJob(String),
    #[error("cluster id {0} appears more than once")]
    DuplicateCluster(ClusterId),
    #[error("job `{job}` belongs to unknown cluster {cluster}")]
    UnknownCluster { job: String, cluster: ClusterId },
    #[error("cluster {cluster} centroid has {len} coordinates, expected 2 or 3")]
    BadCentroid { cluster: ClusterId, len: usize },
    #[error("cluster {0} centroid has a non-finite coordinate")]
    NonFiniteCentroid(ClusterId),
    #[error("job `{0}` has a non-finite coordinate")]
    NonFinitePosition(String),
}
