use indexmap::IndexSet;

/// Insertion-ordered set that evicts its oldest entry once over capacity.
#[derive(Debug, Clone)]
pub struct BoundedSet {
    entries: IndexSet<String>,
    capacity: usize,
}

impl BoundedSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexSet::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries.contains(value)
    }

    /// Re-inserting a present value keeps its original position.
    pub fn insert(&mut self, value: impl Into<String>) {
        self.entries.insert(value.into());
        while self.entries.len() > self.capacity {
            self.entries.shift_remove_index(0);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
