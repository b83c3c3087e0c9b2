use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, Notify};

use crate::rank::{DEFAULT_MAX_TASKS, select};
use crate::report::{DEFAULT_NAME_WIDTH, render_pass};
use crate::task::{TaskNames, TaskSource};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Where the sampling worker currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Queued on the session lock.
    WaitingForRelease,
    /// Running a pass with the lock held.
    Sampling,
    /// Lock released, waiting for the interval or a wake.
    Blocked,
}

impl WorkerPhase {
    fn as_u8(self) -> u8 {
        match self {
            WorkerPhase::WaitingForRelease => 0,
            WorkerPhase::Sampling => 1,
            WorkerPhase::Blocked => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => WorkerPhase::Sampling,
            2 => WorkerPhase::Blocked,
            _ => WorkerPhase::WaitingForRelease,
        }
    }
}

/// Shared, lock-free view of the worker phase for monitors.
#[derive(Debug, Clone, Default)]
pub struct PhaseCell(Arc<AtomicU8>);

impl PhaseCell {
    pub fn get(&self) -> WorkerPhase {
        WorkerPhase::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, phase: WorkerPhase) {
        self.0.store(phase.as_u8(), Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerOptions {
    /// Tasks retained per pass.
    pub max_tasks: usize,
    /// Name column width.
    pub name_width: usize,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        SamplerOptions {
            max_tasks: DEFAULT_MAX_TASKS,
            name_width: DEFAULT_NAME_WIDTH,
        }
    }
}

/// Everything guarded by the session lock: the trace facility, the report
/// sink, and the per-session settings the worker reads each cycle.
pub struct Sampler<S, W> {
    source: S,
    out: W,
    options: SamplerOptions,
    interval: Duration,
    first_pass: bool,
    passes: u64,
}

impl<S, W> Sampler<S, W> {
    pub fn new(source: S, out: W, options: SamplerOptions) -> Self {
        Sampler {
            source,
            out,
            options,
            interval: DEFAULT_INTERVAL,
            first_pass: true,
            passes: 0,
        }
    }

    /// Reset per-session state. The next pass is treated as the first.
    pub fn begin_session(&mut self, interval: Duration) {
        self.interval = interval;
        self.first_pass = true;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_parts(self) -> (S, W) {
        (self.source, self.out)
    }
}

impl<S, W> Sampler<S, W>
where
    S: TaskSource + TaskNames,
    W: Write,
{
    /// Snapshot, rank and print once.
    pub fn run_pass(&mut self) -> io::Result<()> {
        let _pass_span = tracing::debug_span!("sampler.pass", pass = self.passes).entered();

        let samples = self.source.snapshot();
        let ranking = select(&samples, self.options.max_tasks);
        let first_pass = std::mem::take(&mut self.first_pass);
        let text = render_pass(&ranking, &self.source, first_pass, self.options.name_width);
        self.passes += 1;

        tracing::debug!(
            tasks = samples.len(),
            ranked = ranking.len(),
            total = ranking.total(),
            first_pass,
            "pass complete"
        );

        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

/// Body of the background sampling task. Never returns; the owner aborts it.
pub(crate) async fn run_worker<S, W>(
    lock: Arc<Mutex<Sampler<S, W>>>,
    wake: Arc<Notify>,
    phase: PhaseCell,
) where
    S: TaskSource + TaskNames,
    W: Write,
{
    loop {
        phase.set(WorkerPhase::WaitingForRelease);
        let interval = {
            let mut sampler = lock.lock().await;
            phase.set(WorkerPhase::Sampling);
            if let Err(err) = sampler.run_pass() {
                tracing::warn!(error = %err, "failed to write load report");
            }
            // Published before the guard drops: Sampling implies the lock is ours.
            phase.set(WorkerPhase::Blocked);
            sampler.interval()
        };

        match tokio::time::timeout(interval, wake.notified()).await {
            Ok(()) => tracing::trace!("sampler woken"),
            Err(_) => tracing::trace!("sampling interval elapsed"),
        }
    }
}
