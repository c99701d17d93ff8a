//! Index-addressable binary min-heap. Each id appears in the heap at most
//! once, and a position index allows its priority to be changed in place.
//! This lets the search lower the key of a city which is already open
//! instead of pushing a second, stale entry for it.

use std::cmp::Ordering;

/// Heap slot 0 is a sentinel so that parent/child arithmetic stays simple
const FIRST_ELEMENT_INDEX: usize = 1;

/// Ordering key for an open city: estimated total cost, then the order in
/// which the city was first discovered. Earlier discoveries win ties, which
/// keeps results deterministic
#[derive(Debug, Clone, Copy, Default)]
pub struct Priority {
    pub f: f64,
    pub seq: u64,
}

impl Priority {
    pub fn new(f: f64, seq: u64) -> Priority {
        Priority { f, seq }
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Priority {}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

pub struct Frontier<P>
where
    P: Ord,
{
    heap: Vec<(usize, P)>,
    positions: Vec<Option<usize>>,
}

impl<P> Frontier<P>
where
    P: Ord + Copy + Default,
{
    /// Create an empty frontier, with room for ids up to `capacity` before
    /// any reallocation is needed
    pub fn new(capacity: usize) -> Self {
        let mut heap = Vec::with_capacity(capacity + 1);
        heap.push((usize::MAX, P::default()));
        Self {
            heap,
            positions: vec![None; capacity],
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len() - FIRST_ELEMENT_INDEX
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: usize) -> bool {
        matches!(self.positions.get(id), Some(Some(_)))
    }

    /// Add an id with the provided priority. Returns false, leaving the
    /// frontier untouched, if the id is already present
    pub fn push(&mut self, id: usize, priority: P) -> bool {
        if self.contains(id) {
            return false;
        }

        if id >= self.positions.len() {
            self.positions.resize(id + 1, None);
        }

        self.heap.push((id, priority));
        let position = self.heap.len() - 1;
        self.positions[id] = Some(position);
        self.sift_up(position);

        true
    }

    pub fn peek(&self) -> Option<&(usize, P)> {
        self.heap.get(FIRST_ELEMENT_INDEX)
    }

    /// Remove and return the id with the lowest priority
    pub fn pop(&mut self) -> Option<(usize, P)> {
        if self.is_empty() {
            return None;
        }

        let (id, priority) = self.heap.swap_remove(FIRST_ELEMENT_INDEX);
        self.positions[id] = None;

        if !self.is_empty() {
            // The last element has been moved to the top
            self.positions[self.heap[FIRST_ELEMENT_INDEX].0] =
                Some(FIRST_ELEMENT_INDEX);
            self.sift_down(FIRST_ELEMENT_INDEX);
        }

        Some((id, priority))
    }

    /// Change the priority of an id which is already present, restoring the
    /// heap order around it. Returns false if the id is not present
    pub fn update_priority(&mut self, id: usize, priority: P) -> bool {
        let position = match self.positions.get(id) {
            Some(Some(position)) => *position,
            _ => return false,
        };

        let current_priority = self.heap[position].1;
        self.heap[position] = (id, priority);

        match priority.cmp(&current_priority) {
            Ordering::Greater => self.sift_down(position),
            Ordering::Less => self.sift_up(position),
            Ordering::Equal => {}
        }

        true
    }

    pub fn clear(&mut self) {
        self.positions.fill(None);
        self.heap.truncate(FIRST_ELEMENT_INDEX);
    }

    fn sift_up(&mut self, element_index: usize) {
        let mut index = element_index;
        let priority = self.heap[index].1;

        while index > FIRST_ELEMENT_INDEX
            && priority < self.heap[index >> 1].1
        {
            let parent_index = index >> 1;
            self.heap.swap(index, parent_index);

            // The previous parent has moved down into this slot
            self.positions[self.heap[index].0] = Some(index);

            index = parent_index;
        }

        self.positions[self.heap[index].0] = Some(index);
    }

    fn sift_down(&mut self, element_index: usize) {
        let size = self.len();
        let mut index = element_index;
        let priority = self.heap[index].1;

        while index << 1 <= size {
            let left_child_index = index << 1;
            let right_child_index = left_child_index + 1;

            let mut child_index = left_child_index;
            let right_is_smaller = right_child_index <= size
                && self.heap[right_child_index].1
                    < self.heap[left_child_index].1;
            if right_is_smaller {
                child_index = right_child_index;
            }

            if priority <= self.heap[child_index].1 {
                break;
            }

            self.heap.swap(index, child_index);

            // The previous child has moved up into this slot
            self.positions[self.heap[index].0] = Some(index);

            index = child_index;
        }

        self.positions[self.heap[index].0] = Some(index);
    }
}
