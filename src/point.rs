use crate::key;
use crate::SortKey;

/// An item together with its slot in a [`WorkingSequence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point<T> {
    position: usize,
    item: T,
}

impl<T> Point<T> {
    /// Current slot of the point in its sequence.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn into_item(self) -> T {
        self.item
    }
}

impl<T: SortKey> Point<T> {
    pub fn key(&self) -> i64 {
        self.item.sort_key()
    }
}

/// Slot arena holding every point of a clustering run.
///
/// Points are created once by [`WorkingSequence::load`] and only ever moved
/// inside the arena. `points[i].position() == i` holds at all times.
#[derive(Debug, Clone)]
pub struct WorkingSequence<T> {
    points: Vec<Point<T>>,
    sorted: bool,
}

impl<T> WorkingSequence<T> {
    /// Wrap `items` in input order.
    pub fn load(items: impl IntoIterator<Item = T>) -> Self {
        let points = items
            .into_iter()
            .enumerate()
            .map(|(position, item)| Point { position, item })
            .collect();
        Self {
            points,
            sorted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn get(&self, slot: usize) -> Option<&Point<T>> {
        self.points.get(slot)
    }

    pub fn points(&self) -> &[Point<T>] {
        &self.points
    }

    pub(crate) fn into_points(self) -> Vec<Point<T>> {
        self.points
    }
}

impl<T: SortKey> WorkingSequence<T> {
    /// Order points by ascending key and renumber their slots.
    ///
    /// Equal keys keep their relative order. Calling this again on a sorted
    /// sequence does nothing.
    pub fn sort(&mut self) {
        if self.sorted {
            return;
        }
        self.points.sort_by_key(Point::key);
        for (slot, point) in self.points.iter_mut().enumerate() {
            point.position = slot;
        }
        self.sorted = true;
    }

    /// Key of the point at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of bounds.
    pub fn key(&self, slot: usize) -> i64 {
        self.points[slot].key()
    }

    /// Key distance between the points at slots `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either slot is out of bounds.
    pub fn distance(&self, a: usize, b: usize) -> u64 {
        key::distance(self.key(a), self.key(b))
    }
}
