use std::fmt::Write;

use crate::format::{format_permille, scaled_ratio, truncate_unicode};
use crate::rank::{RankedEntry, Ranking};
use crate::task::TaskNames;

pub const PROMPT: &str = "Press <return> to terminate.";
pub const HEADER: &str = "     PID   PRI S   %CPU %STK  NAME";
pub const DEFAULT_NAME_WIDTH: usize = 23;

/// One rendered table row, before it is laid out as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub id: u32,
    pub priority: Option<i32>,
    pub state: char,
    pub load_permille: u64,
    pub stack_percent: u64,
    pub name: String,
}

impl ReportRow {
    pub fn render(&self) -> String {
        let priority = self
            .priority
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{:>8} {:>5} {} {} {:>4}  {}",
            self.id,
            priority,
            self.state,
            format_permille(self.load_permille, 4),
            self.stack_percent,
            self.name
        )
    }
}

/// Stack utilisation clamped to `[0, 100]`. Unknown capacity reads as 0.
pub fn stack_percent(used: u64, size: u64) -> u64 {
    scaled_ratio(used, size, 100).min(100)
}

/// Build table rows in rank order. Empty when the total load is zero.
pub fn build_rows(
    ranking: &Ranking<'_>,
    names: &impl TaskNames,
    name_width: usize,
) -> Vec<ReportRow> {
    let total = ranking.total();
    if total == 0 {
        return Vec::new();
    }
    ranking
        .entries()
        .iter()
        .map(|entry| build_row(entry, total, names, name_width))
        .collect()
}

fn build_row(
    entry: &RankedEntry<'_>,
    total: u64,
    names: &impl TaskNames,
    name_width: usize,
) -> ReportRow {
    let task = entry.task;
    let name = names
        .name_of(task.id)
        .map(|n| truncate_unicode(&n, name_width))
        .unwrap_or_else(|| "-".to_string());
    ReportRow {
        id: task.id,
        priority: task.priority,
        state: task.state.abbrev(),
        load_permille: scaled_ratio(entry.load, total, 1000),
        stack_percent: stack_percent(task.stack_used, task.stack_size),
        name,
    }
}

/// Text printed for one sampling pass.
///
/// The first pass after a session starts only shows the prompt, since its
/// deltas have no baseline.
pub fn render_pass(
    ranking: &Ranking<'_>,
    names: &impl TaskNames,
    first_pass: bool,
    name_width: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "{PROMPT}");
    if first_pass {
        return out;
    }

    let rows = build_rows(ranking, names, name_width);
    if rows.is_empty() {
        return out;
    }
    let _ = writeln!(out, "{HEADER}");
    for row in &rows {
        let _ = writeln!(out, "{}", row.render());
    }
    out
}
