pub mod topk;

pub use topk::{DEFAULT_MAX_TASKS, MAX_TASKS_LIMIT, RankedEntry, Ranking, select};
