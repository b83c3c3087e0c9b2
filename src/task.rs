use color_eyre::Result;

/// Run state of a traced task as reported by the snapshot source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    Running,
    Sleeping,
    DiskWait,
    Stopped,
    Traced,
    Zombie,
    Dead,
    Idle,
    #[default]
    Unknown,
}

impl TaskState {
    /// Single-character column value used in the report.
    pub fn abbrev(self) -> char {
        match self {
            TaskState::Running => 'R',
            TaskState::Sleeping => 'S',
            TaskState::DiskWait => 'D',
            TaskState::Stopped => 'T',
            TaskState::Traced => 't',
            TaskState::Zombie => 'Z',
            TaskState::Dead => 'X',
            TaskState::Idle => 'I',
            TaskState::Unknown => '?',
        }
    }
}

/// Read-only view of one traced task at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSample {
    pub id: u32,
    /// Lower value means higher priority. `None` when the host cannot tell.
    pub priority: Option<i32>,
    pub state: TaskState,
    /// CPU ticks consumed since the previous sample of this task.
    pub delta_time: u64,
    pub stack_used: u64,
    pub stack_size: u64,
    /// Cleared by the source for tasks that went stale between queries.
    pub valid: bool,
}

/// The trace facility that maintains per-task timing counters.
pub trait TaskSource {
    /// Current traced tasks in source order.
    fn snapshot(&mut self) -> Vec<TaskSample>;
    fn enable_tracing(&mut self) -> Result<()>;
    fn disable_tracing(&mut self) -> Result<()>;
}

/// Maps a task identifier to its display name.
pub trait TaskNames {
    fn name_of(&self, id: u32) -> Option<String>;
}
