use crate::task::TaskSample;

/// Number of tasks retained per pass when nothing else is configured.
pub const DEFAULT_MAX_TASKS: usize = 50;

/// Largest `k` accepted from configuration.
pub const MAX_TASKS_LIMIT: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedEntry<'a> {
    pub task: &'a TaskSample,
    pub load: u64,
}

/// Bounded list of the busiest tasks, ordered by descending load.
///
/// Equal loads keep discovery order: a newcomer lands behind every incumbent
/// whose load is at least its own. Once full, each insertion evicts the
/// weakest entry.
#[derive(Debug, Clone)]
pub struct Ranking<'a> {
    entries: Vec<RankedEntry<'a>>,
    capacity: usize,
}

impl<'a> Ranking<'a> {
    /// Room for `capacity` entries. Storage grows as entries arrive.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Insert `task` at its rank, evicting the last entry when full.
    /// Returns `false` if the task did not make the cut.
    pub fn offer(&mut self, task: &'a TaskSample, load: u64) -> bool {
        // An idle task may only take a free slot, never displace another.
        let pos = if load == 0 {
            self.entries.len()
        } else {
            self.entries
                .iter()
                .position(|e| e.load < load)
                .unwrap_or(self.entries.len())
        };
        if pos >= self.capacity {
            return false;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop();
        }
        self.entries.insert(pos, RankedEntry { task, load });
        true
    }

    pub fn entries(&self) -> &[RankedEntry<'a>] {
        &self.entries
    }

    /// Sum of the retained loads. Evicted tasks do not contribute.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.load).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Rank the valid tasks of `snapshot` by delta time, keeping at most `k`.
pub fn select(snapshot: &[TaskSample], k: usize) -> Ranking<'_> {
    let mut ranking = Ranking::with_capacity(k);
    ranking.entries.reserve(k.min(snapshot.len()));
    for task in snapshot.iter().filter(|t| t.valid) {
        ranking.offer(task, task.delta_time);
    }
    ranking
}
