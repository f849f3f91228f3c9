use crate::Anchors;
use crate::SortKey;
use crate::WorkingSequence;
use itertools::Itertools as _;

/// Which cluster gets a candidate that is as far from its own anchor as from
/// the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// The candidate, and every element after it up to the next anchor, moves
    /// to the next cluster.
    #[default]
    Advance,

    /// The candidate stays in the current cluster. Only a candidate strictly
    /// closer to the next anchor starts the next cluster.
    Hold,
}

impl TieBreak {
    /// Whether a candidate at distance `here` from the current anchor and
    /// `next` from the following one stays in the current cluster.
    fn stays(self, here: u64, next: u64) -> bool {
        match self {
            TieBreak::Advance => here < next,
            TieBreak::Hold => here <= next,
        }
    }
}

/// Assignment of every slot of a sorted [`WorkingSequence`] to one of `k`
/// clusters.
///
/// Each group is a list of slots. A grouping is rebuilt from scratch at every
/// iteration and is never updated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    groups: Vec<Vec<usize>>,
}

impl Grouping {
    /// Split the sorted sequence around `anchors`.
    ///
    /// Slots before the first anchor go to the first cluster, slots from the
    /// last anchor onwards go to the last cluster. Between two consecutive
    /// anchors, slots are scanned forward and stay with the lower cluster
    /// while they are closer to its anchor. The first slot that is not moves,
    /// along with every remaining slot up to the upper anchor, to the upper
    /// cluster. Later slots are not compared again.
    pub fn assign<T>(
        seq: &WorkingSequence<T>,
        anchors: &Anchors,
        tie_break: TieBreak,
    ) -> Grouping
    where
        T: SortKey,
    {
        let anchors = anchors.as_slice();
        let k = anchors.len();
        debug_assert!(seq.is_sorted());
        debug_assert!(0 < k && k <= seq.len());
        debug_assert!(anchors.iter().tuple_windows().all(|(a, b)| a < b));

        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); k];
        groups[0].extend(0..anchors[0]);

        for (cluster, (&lower, &upper)) in anchors.iter().tuple_windows().enumerate() {
            for slot in lower..upper {
                let here = seq.distance(slot, lower);
                let next = seq.distance(slot, upper);
                if tie_break.stays(here, next) {
                    groups[cluster].push(slot);
                } else {
                    groups[cluster + 1].extend(slot..upper);
                    break;
                }
            }
        }

        groups[k - 1].extend(anchors[k - 1]..seq.len());

        Grouping { groups }
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Slots of each cluster, in cluster order.
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Restore slot order inside each group.
    pub(crate) fn sort_groups(&mut self) {
        for group in &mut self.groups {
            group.sort_unstable();
        }
    }
}
