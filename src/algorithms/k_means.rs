//! Median-anchored k-means over totally ordered scalar values.
//!
//! Items are sorted once by key. Each cluster is then represented by the slot
//! of one of its elements, its anchor. Every iteration splits the sorted
//! sequence around the current anchors and re-anchors each cluster at its
//! median slot, until the anchors stop moving.

use super::Error;
use crate::Anchors;
use crate::Grouping;
use crate::Point;
use crate::SortKey;
use crate::TieBreak;
use crate::WorkingSequence;
use itertools::Itertools as _;

/// Number of assignment passes after which a run gives up by default.
pub const DEFAULT_MAX_ITER: usize = 500;

/// Diagnostic data of a clustering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// Number of assignment passes the run went through, including the last
    /// one that confirmed convergence.
    pub iterations: usize,
}

/// Clustering engine for one collection of items.
///
/// The engine owns the items for the whole run. Usage follows three steps:
/// [load][KMeans1d::load], [sort][KMeans1d::sort] and
/// [cluster][KMeans1d::cluster]. Results are then read with
/// [groups][KMeans1d::groups] or [into_groups][KMeans1d::into_groups].
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), ordmeans::Error> {
/// use ordmeans::KMeans1d;
///
/// let mut k_means = KMeans1d::load([22, 1, 3, 21, 2, 23]);
/// k_means.sort();
/// k_means.cluster(2)?;
///
/// let groups = k_means.into_groups().unwrap();
/// assert_eq!(groups, [vec![1, 2, 3], vec![21, 22, 23]]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct KMeans1d<T> {
    seq: WorkingSequence<T>,
    anchors: Option<Anchors>,
    grouping: Option<Grouping>,
    max_iter: Option<usize>,
    tie_break: TieBreak,
}

impl<T> KMeans1d<T> {
    /// Take ownership of `items`, in the given order.
    pub fn load(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            seq: WorkingSequence::load(items),
            anchors: None,
            grouping: None,
            max_iter: Some(DEFAULT_MAX_ITER),
            tie_break: TieBreak::default(),
        }
    }

    /// Bound the number of assignment passes. `None` lets the run loop until
    /// the anchors settle, however long that takes.
    pub fn with_max_iter(mut self, max_iter: Option<usize>) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Number of loaded items.
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.seq.is_sorted()
    }

    pub fn sequence(&self) -> &WorkingSequence<T> {
        &self.seq
    }

    /// Current anchors, if the engine has been seeded.
    pub fn anchors(&self) -> Option<&Anchors> {
        self.anchors.as_ref()
    }

    /// Grouping of the last successful run.
    pub fn grouping(&self) -> Option<&Grouping> {
        self.grouping.as_ref()
    }

    /// Items of each cluster, in cluster order, or `None` if no run has
    /// succeeded yet.
    ///
    /// Items inside a group are ordered by key.
    pub fn groups(&self) -> Option<Vec<Vec<&T>>> {
        let grouping = self.grouping.as_ref()?;
        let points = self.seq.points();
        let groups = grouping
            .groups()
            .iter()
            .map(|group| group.iter().map(|&slot| points[slot].item()).collect())
            .collect();
        Some(groups)
    }

    /// Same as [groups][KMeans1d::groups], but hands back owned items.
    pub fn into_groups(self) -> Option<Vec<Vec<T>>> {
        let grouping = self.grouping?;
        debug_assert!(grouping
            .groups()
            .iter()
            .flatten()
            .copied()
            .eq(0..self.seq.len()));

        // Groups are contiguous and in slot order, so the sequence only needs
        // to be cut at group boundaries.
        let mut items = self.seq.into_points().into_iter().map(Point::into_item);
        let groups = grouping
            .groups()
            .iter()
            .map(|group| items.by_ref().take(group.len()).collect())
            .collect();
        Some(groups)
    }
}

impl<T: SortKey> KMeans1d<T> {
    /// Order items by ascending key. Does nothing if they already are.
    pub fn sort(&mut self) -> &mut Self {
        self.seq.sort();
        self
    }

    /// Cluster the sorted items into `cluster_count` groups.
    ///
    /// The first call seeds evenly spaced anchors. Later calls resume from
    /// the anchors left by the previous run, which must then have the same
    /// cluster count. Load a new engine to start over.
    pub fn cluster(&mut self, cluster_count: usize) -> Result<Metadata, Error> {
        if self.seq.is_empty() {
            return Err(Error::EmptyInput);
        }
        if !self.seq.is_sorted() {
            return Err(Error::NotSorted);
        }
        if cluster_count == 0 || self.seq.len() < cluster_count {
            return Err(Error::InvalidClusterCount {
                requested: cluster_count,
                item_count: self.seq.len(),
            });
        }
        if let Some(anchors) = &self.anchors {
            if anchors.len() != cluster_count {
                return Err(Error::AlreadySeeded {
                    seeded: anchors.len(),
                    requested: cluster_count,
                });
            }
        }

        let span = tracing::info_span!("k_means_1d", item_count = self.seq.len(), cluster_count);
        let _enter = span.enter();

        self.grouping = None;
        let seq = &self.seq;
        let anchors = self
            .anchors
            .get_or_insert_with(|| Anchors::seed(seq.len(), cluster_count));
        let max_iter = self.max_iter.unwrap_or(usize::MAX);

        for iteration in 0..max_iter {
            let span = tracing::debug_span!("iteration", iteration);
            let _enter = span.enter();

            let mut grouping = Grouping::assign(seq, anchors, self.tie_break);
            let next_anchors = Anchors::update(&mut grouping)?;

            if next_anchors == *anchors {
                tracing::info!(iterations = iteration + 1, "anchors settled");
                self.grouping = Some(grouping);
                return Ok(Metadata {
                    iterations: iteration + 1,
                });
            }

            tracing::debug!(
                "anchors moved: [{}] -> [{}]",
                anchors.as_slice().iter().format(", "),
                next_anchors.as_slice().iter().format(", ")
            );
            *anchors = next_anchors;
        }

        tracing::warn!(max_iter, "anchors did not settle");
        Err(Error::DidNotConverge { max_iter })
    }
}

/// Item tagged with its index in the caller's input.
struct Indexed<T> {
    index: usize,
    item: T,
}

impl<T: SortKey> SortKey for Indexed<T> {
    fn sort_key(&self) -> i64 {
        self.item.sort_key()
    }
}

/// # Median-anchored k-means
///
/// Split scalar values into `part_count` contiguous groups, see
/// [`KMeans1d`]. The part of each value is written in input order.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), ordmeans::Error> {
/// use ordmeans::Partition as _;
///
/// let values = [40, 1, 42, 2, 41, 3];
/// let mut partition = [0; 6];
///
/// ordmeans::ScalarKMeans { part_count: 2, ..Default::default() }
///     .partition(&mut partition, values)?;
///
/// assert_eq!(partition, [1, 0, 1, 0, 1, 0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScalarKMeans {
    pub part_count: usize,
    pub max_iter: Option<usize>,
    pub tie_break: TieBreak,
}

impl Default for ScalarKMeans {
    fn default() -> Self {
        Self {
            part_count: 2,
            max_iter: Some(DEFAULT_MAX_ITER),
            tie_break: TieBreak::Advance,
        }
    }
}

impl<W> crate::Partition<W> for ScalarKMeans
where
    W: IntoIterator,
    W::Item: SortKey,
{
    type Metadata = Metadata;
    type Error = Error;

    fn partition(
        &mut self,
        part_ids: &mut [usize],
        values: W,
    ) -> Result<Self::Metadata, Self::Error> {
        let indexed = values
            .into_iter()
            .enumerate()
            .map(|(index, item)| Indexed { index, item });
        let mut k_means = KMeans1d::load(indexed)
            .with_max_iter(self.max_iter)
            .with_tie_break(self.tie_break);

        if k_means.len() != part_ids.len() {
            return Err(Error::InputLenMismatch {
                expected: part_ids.len(),
                actual: k_means.len(),
            });
        }
        if part_ids.is_empty() {
            return Ok(Metadata { iterations: 0 });
        }

        k_means.sort();
        let metadata = k_means.cluster(self.part_count)?;

        for (part, group) in k_means.groups().unwrap_or_default().into_iter().enumerate() {
            for value in group {
                part_ids[value.index] = part;
            }
        }

        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Partition as _;
    use itertools::Itertools as _;
    use proptest::prelude::*;

    fn run(keys: &[i64], cluster_count: usize) -> Vec<Vec<i64>> {
        let mut k_means = KMeans1d::load(keys.to_vec());
        k_means.sort();
        k_means.cluster(cluster_count).unwrap();
        k_means.into_groups().unwrap()
    }

    #[test]
    fn test_empty_input() {
        let mut k_means = KMeans1d::<i64>::load([]);
        k_means.sort();
        assert!(matches!(k_means.cluster(1), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_not_sorted() {
        let mut k_means = KMeans1d::load([3, 1, 2]);
        assert!(matches!(k_means.cluster(1), Err(Error::NotSorted)));
        assert!(k_means.anchors().is_none());
    }

    #[test]
    fn test_invalid_cluster_count() {
        let mut k_means = KMeans1d::load([3, 1, 2]);
        k_means.sort();
        assert!(matches!(
            k_means.cluster(0),
            Err(Error::InvalidClusterCount {
                requested: 0,
                item_count: 3
            })
        ));
        assert!(matches!(
            k_means.cluster(4),
            Err(Error::InvalidClusterCount {
                requested: 4,
                item_count: 3
            })
        ));
    }

    #[test]
    fn test_seeded_once() {
        let mut k_means = KMeans1d::load([0, 10, 20, 30, 40, 50, 60, 70, 80, 90]);
        k_means.sort();
        k_means.cluster(5).unwrap();
        let anchors = k_means.anchors().cloned();

        assert!(matches!(
            k_means.cluster(2),
            Err(Error::AlreadySeeded {
                seeded: 5,
                requested: 2
            })
        ));

        // Resuming from settled anchors confirms them in a single pass.
        let metadata = k_means.cluster(5).unwrap();
        assert_eq!(metadata.iterations, 1);
        assert_eq!(k_means.anchors().cloned(), anchors);
    }

    #[test]
    fn test_groups_borrow_items() {
        let mut k_means = KMeans1d::load([9, 8, 1, 2]);
        assert!(k_means.groups().is_none());
        k_means.sort();
        k_means.cluster(2).unwrap();
        let groups = k_means.groups().unwrap();
        assert_eq!(groups, [vec![&1, &2], vec![&8, &9]]);
    }

    #[test]
    fn test_max_iter() {
        let keys = [
            1, 2, 3, 3, 3, 3, 3, 21, 22, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23,
            23, 23, 23, 23,
        ];
        let mut k_means = KMeans1d::load(keys).with_max_iter(Some(1));
        k_means.sort();
        for expected in [[4, 18], [3, 17]] {
            assert!(matches!(
                k_means.cluster(2),
                Err(Error::DidNotConverge { max_iter: 1 })
            ));
            assert!(k_means.grouping().is_none());
            assert_eq!(k_means.anchors().unwrap().as_slice(), &expected);
        }

        // Anchors reached by the bounded runs are kept, a single pass is
        // enough to confirm them.
        let metadata = k_means.cluster(2).unwrap();
        assert_eq!(metadata.iterations, 1);
        assert_eq!(run(&keys, 2), k_means.into_groups().unwrap());
    }

    #[test]
    fn test_unbounded() {
        let mut k_means = KMeans1d::load([5, 6, 7, 50, 51, 52]).with_max_iter(None);
        k_means.sort();
        k_means.cluster(2).unwrap();
        assert_eq!(
            k_means.into_groups().unwrap(),
            [vec![5, 6, 7], vec![50, 51, 52]]
        );
    }

    #[test]
    fn test_equal_keys_tie_break() {
        let keys = [4; 4];

        let mut k_means = KMeans1d::load(keys);
        k_means.sort();
        assert!(matches!(
            k_means.cluster(2),
            Err(Error::EmptyCluster { cluster: 0 })
        ));

        let mut k_means = KMeans1d::load(keys).with_tie_break(TieBreak::Hold);
        k_means.sort();
        k_means.cluster(2).unwrap();
        assert_eq!(k_means.into_groups().unwrap(), [vec![4, 4, 4], vec![4]]);
    }

    #[test]
    fn test_partition() {
        let values = [23_u8, 3, 21, 1, 22, 2];
        let mut partition = [usize::MAX; 6];
        let metadata = ScalarKMeans::default()
            .partition(&mut partition, values)
            .unwrap();
        assert_eq!(partition, [1, 0, 1, 0, 1, 0]);
        assert!(1 <= metadata.iterations);
    }

    #[test]
    fn test_partition_len_mismatch() {
        let mut partition = [0; 3];
        let err = ScalarKMeans::default()
            .partition(&mut partition, [1, 2])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InputLenMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_partition_empty() {
        let mut partition: [usize; 0] = [];
        let metadata = ScalarKMeans::default()
            .partition(&mut partition, Vec::<i32>::new())
            .unwrap();
        assert_eq!(metadata.iterations, 0);
    }

    proptest!(
        #![proptest_config(ProptestConfig{timeout: 2000, ..ProptestConfig::default()})]

        /// Every item ends up in exactly one cluster, clusters don't overlap
        /// in key order.
        #[test]
        fn partition_is_contiguous(
            (keys, cluster_count) in (1..200_usize).prop_flat_map(|len| {
                (prop::collection::vec(-10_000_i64..10_000, len), 1..=len)
            })
        ) {
            let mut k_means = KMeans1d::load(keys.clone()).with_tie_break(TieBreak::Hold);
            k_means.sort();
            let outcome = k_means.cluster(cluster_count);
            prop_assume!(!matches!(outcome, Err(Error::DidNotConverge { .. })));
            outcome.unwrap();
            let groups = k_means.into_groups().unwrap();

            prop_assert_eq!(groups.len(), cluster_count);
            let flat: Vec<i64> = groups.concat();
            let mut expected = keys;
            expected.sort();
            prop_assert_eq!(&flat, &expected);

            for (lower, upper) in groups.iter().filter(|g| !g.is_empty()).tuple_windows() {
                prop_assert!(lower.iter().max() <= upper.iter().min());
            }
        }

        /// Running again from settled anchors changes nothing.
        #[test]
        fn convergence_is_a_fixed_point(
            (keys, cluster_count) in (1..200_usize).prop_flat_map(|len| {
                (prop::collection::vec(-10_000_i64..10_000, len), 1..=len)
            })
        ) {
            let mut k_means = KMeans1d::load(keys).with_tie_break(TieBreak::Hold);
            k_means.sort();
            let outcome = k_means.cluster(cluster_count);
            prop_assume!(!matches!(outcome, Err(Error::DidNotConverge { .. })));
            outcome.unwrap();

            let anchors = k_means.anchors().cloned().unwrap();
            let mut grouping = Grouping::assign(k_means.sequence(), &anchors, TieBreak::Hold);
            prop_assert_eq!(Some(&grouping), k_means.grouping());
            prop_assert_eq!(Anchors::update(&mut grouping).unwrap(), anchors);
        }

        /// Same input, same clusters.
        #[test]
        fn deterministic(
            keys in prop::collection::vec(-100_i64..100, 3..100)
        ) {
            let mut a = KMeans1d::load(keys.clone());
            let mut b = KMeans1d::load(keys);
            a.sort();
            b.sort();
            prop_assert_eq!(a.cluster(3).ok(), b.cluster(3).ok());
            prop_assert_eq!(a.into_groups(), b.into_groups());
        }
    );
}
