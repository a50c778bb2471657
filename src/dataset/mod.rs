mod error;
mod load;
mod model;
mod parse;

pub use error::DatasetError;
pub use load::load_dataset;
pub use model::{Cluster, ClusterId, ClusterPair, Dataset, DomainPoint, Job, SimilarityTable};
