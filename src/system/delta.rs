use std::collections::{HashMap, HashSet};

const GC_EVERY: u32 = 10;

/// Remembers the accumulated CPU time seen for each task at its previous
/// query, so every snapshot can report the time consumed since then.
#[derive(Debug, Default)]
pub struct DeltaTracker {
    last: HashMap<u32, u64>,
    gc_counter: u32,
}

impl DeltaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `accumulated` for `id` and return the growth since the last
    /// call. A task seen for the first time reports its whole accumulated time.
    pub fn delta(&mut self, id: u32, accumulated: u64) -> u64 {
        let previous = self.last.insert(id, accumulated).unwrap_or(0);
        accumulated.saturating_sub(previous)
    }

    /// Drop baselines for tasks that are gone. Only does work every
    /// tenth call.
    pub fn gc(&mut self, alive: &HashSet<u32>) {
        self.gc_counter += 1;
        if !self.gc_counter.is_multiple_of(GC_EVERY) {
            return;
        }
        self.last.retain(|id, _| alive.contains(id));
    }

    pub fn clear(&mut self) {
        self.last.clear();
        self.gc_counter = 0;
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
