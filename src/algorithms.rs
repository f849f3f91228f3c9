use std::fmt;

mod k_means;

pub use k_means::KMeans1d;
pub use k_means::Metadata;
pub use k_means::ScalarKMeans;
pub use k_means::DEFAULT_MAX_ITER;

/// Common errors thrown by algorithms.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Clustering was requested on an empty collection.
    EmptyInput,

    /// Clustering was requested before the items were sorted.
    NotSorted,

    /// The cluster count is zero or larger than the number of items.
    InvalidClusterCount { requested: usize, item_count: usize },

    /// The engine was already seeded for a different cluster count.
    AlreadySeeded { seeded: usize, requested: usize },

    /// A cluster lost all of its items, so it has no median to anchor on.
    EmptyCluster { cluster: usize },

    /// Anchors still moved after the maximum number of iterations.
    DidNotConverge { max_iter: usize },

    /// Input sets don't have matching lengths.
    InputLenMismatch { expected: usize, actual: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "input is empty"),
            Error::NotSorted => write!(f, "items must be sorted before clustering"),
            Error::InvalidClusterCount {
                requested,
                item_count,
            } => write!(
                f,
                "invalid cluster count {requested} (expected between 1 and {item_count})",
            ),
            Error::AlreadySeeded { seeded, requested } => write!(
                f,
                "engine already seeded for {seeded} clusters, cannot run with {requested}",
            ),
            Error::EmptyCluster { cluster } => write!(f, "cluster {cluster} is empty"),
            Error::DidNotConverge { max_iter } => {
                write!(f, "no convergence after {max_iter} iterations")
            }
            Error::InputLenMismatch { expected, actual } => write!(
                f,
                "input sets don't have the same length (expected {expected} items, got {actual})",
            ),
        }
    }
}

impl std::error::Error for Error {}
