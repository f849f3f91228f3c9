use crate::Error;
use crate::Grouping;

/// Slot of the representative element of each cluster.
///
/// Anchors are strictly increasing: the anchor of cluster `i` comes before
/// the anchor of cluster `i + 1` in the sorted sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchors(Vec<usize>);

impl Anchors {
    /// Evenly spread `cluster_count` anchors over a sequence of `len` items.
    ///
    /// With `spacing = len / cluster_count`, cluster `i` is anchored at
    /// `spacing * i + spacing / 2`.
    ///
    /// Callers must ensure `1 <= cluster_count <= len`.
    pub fn seed(len: usize, cluster_count: usize) -> Anchors {
        debug_assert!(0 < cluster_count && cluster_count <= len);
        let spacing = len / cluster_count;
        let anchors = (0..cluster_count)
            .map(|i| spacing * i + spacing / 2)
            .collect();
        Anchors(anchors)
    }

    /// Compute the anchors of the clusters of `grouping`.
    ///
    /// Each group is first put back in slot order, then anchored at its
    /// median slot `group[group.len() / 2]` (the upper median for groups of
    /// even size).
    pub fn update(grouping: &mut Grouping) -> Result<Anchors, Error> {
        grouping.sort_groups();
        let anchors = grouping
            .groups()
            .iter()
            .enumerate()
            .map(|(cluster, group)| {
                group
                    .get(group.len() / 2)
                    .copied()
                    .ok_or(Error::EmptyCluster { cluster })
            })
            .collect::<Result<_, _>>()?;
        Ok(Anchors(anchors))
    }

    #[cfg(test)]
    pub(crate) fn from_slots(slots: Vec<usize>) -> Anchors {
        Anchors(slots)
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}
