//! A clustering library for totally ordered scalar values.
//!
//! Items only need to expose one integer key through the [`SortKey`] trait.
//! They are split into `k` groups that are contiguous in key order, using a
//! variant of k-means where each cluster is represented by its median element.
//!
//! # Crate Layout
//!
//! The clustering engine is [`KMeans1d`]. It is built from a few stages that
//! are also exposed on their own:
//!
//! - [`WorkingSequence`] sorts the items once and numbers their slots,
//! - [`Anchors`] holds the slot of each cluster's representative element,
//! - [`Grouping`] splits the sorted sequence around a set of anchors.
//!
//! The algorithm is also available through the [`Partition`] trait, see
//! [`ScalarKMeans`].

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    rust_2018_idioms
)]

mod algorithms;
mod anchors;
mod grouping;
mod key;
mod point;


pub use crate::algorithms::*;
pub use crate::anchors::Anchors;
pub use crate::grouping::{Grouping, TieBreak};
pub use crate::key::{distance, SortKey};
pub use crate::point::{Point, WorkingSequence};

/// The `Partition` trait allows for partitioning data.
///
/// The generic argument `M` defines the input of the algorithm.
///
/// The input partition must be of the correct size. Its contents are
/// overwritten.
pub trait Partition<M> {
    /// Diagnostic data returned for a specific run of the algorithm.
    type Metadata;

    /// Error details, should the algorithm fail to run.
    type Error;

    /// Partition the given data and output the part ID of each element in
    /// `part_ids`.
    ///
    /// Part IDs are contiguous and start from zero.
    fn partition(&mut self, part_ids: &mut [usize], data: M)
        -> Result<Self::Metadata, Self::Error>;
}
