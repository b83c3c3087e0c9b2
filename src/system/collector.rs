use std::collections::{HashMap, HashSet};

use color_eyre::Result;
use color_eyre::eyre::eyre;
use sysinfo::{Process, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System};

use super::delta::DeltaTracker;
use super::platform;
use crate::task::{TaskNames, TaskSample, TaskSource, TaskState};

/// Trace facility backed by the host process table.
///
/// Delta time is CPU milliseconds consumed since the previous snapshot. While
/// tracing is disabled the source reports no tasks and keeps no baselines.
pub struct SysinfoSource {
    sys: System,
    deltas: DeltaTracker,
    names: HashMap<u32, String>,
    tracing: bool,
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSource {
    pub fn new() -> Self {
        SysinfoSource {
            sys: System::new(),
            deltas: DeltaTracker::new(),
            names: HashMap::new(),
            tracing: false,
        }
    }

    pub fn is_tracing(&self) -> bool {
        self.tracing
    }

    fn refresh(&mut self) {
        let _refresh_span = tracing::debug_span!("collector.refresh").entered();

        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu(),
        );
    }
}

impl TaskSource for SysinfoSource {
    fn snapshot(&mut self) -> Vec<TaskSample> {
        if !self.tracing {
            return Vec::new();
        }
        self.refresh();

        let _snapshot_span = tracing::debug_span!("collector.build_snapshot").entered();

        // Process table is a hash map; walk it in pid order for a stable
        // discovery order between passes.
        let mut processes: Vec<(u32, &Process)> = self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| (pid.as_u32(), process))
            .collect();
        processes.sort_unstable_by_key(|(pid, _)| *pid);

        let mut samples = Vec::with_capacity(processes.len());
        let mut names = HashMap::with_capacity(processes.len());
        for (pid, process) in processes {
            let status = process.status();
            let stack = platform::process_stack(pid).unwrap_or_default();
            names.insert(pid, process.name().to_string_lossy().to_string());
            samples.push(TaskSample {
                id: pid,
                priority: platform::process_priority(pid),
                state: map_status(status),
                delta_time: self.deltas.delta(pid, process.accumulated_cpu_time()),
                stack_used: stack.used,
                stack_size: stack.size,
                valid: !matches!(status, ProcessStatus::Zombie | ProcessStatus::Dead),
            });
        }

        let alive: HashSet<u32> = names.keys().copied().collect();
        self.deltas.gc(&alive);
        self.names = names;

        tracing::trace!(tasks = samples.len(), "snapshot taken");
        samples
    }

    fn enable_tracing(&mut self) -> Result<()> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(eyre!(
                "process tracing is not supported on {}",
                std::env::consts::OS
            ));
        }
        self.deltas.clear();
        self.names.clear();
        self.tracing = true;
        tracing::debug!("process tracing enabled");
        Ok(())
    }

    fn disable_tracing(&mut self) -> Result<()> {
        self.tracing = false;
        self.deltas.clear();
        tracing::debug!("process tracing disabled");
        Ok(())
    }
}

impl TaskNames for SysinfoSource {
    fn name_of(&self, id: u32) -> Option<String> {
        self.names.get(&id).cloned()
    }
}

pub fn map_status(status: ProcessStatus) -> TaskState {
    match status {
        ProcessStatus::Run => TaskState::Running,
        ProcessStatus::Sleep => TaskState::Sleeping,
        ProcessStatus::UninterruptibleDiskSleep => TaskState::DiskWait,
        ProcessStatus::Stop => TaskState::Stopped,
        ProcessStatus::Tracing => TaskState::Traced,
        ProcessStatus::Zombie => TaskState::Zombie,
        ProcessStatus::Dead => TaskState::Dead,
        ProcessStatus::Idle => TaskState::Idle,
        _ => TaskState::Unknown,
    }
}
