use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use tokio::io::AsyncRead;
use tokio::runtime::Handle;
use tokio::sync::{Mutex, Notify, OwnedMutexGuard};
use tokio::task::JoinHandle;

use crate::console::wait_for_newline;
use crate::sampler::{DEFAULT_INTERVAL, PhaseCell, Sampler, SamplerOptions, WorkerPhase, run_worker};
use crate::task::{TaskNames, TaskSource};

/// Interval for a requested number of seconds. Zero or negative picks the
/// default.
pub fn interval_from_secs(seconds: i64) -> Duration {
    match u64::try_from(seconds) {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => DEFAULT_INTERVAL,
    }
}

/// The session lock and the worker that shares it, created together.
struct Gate<S, W> {
    lock: Arc<Mutex<Sampler<S, W>>>,
    /// Present while the controller holds the lock between sessions.
    held: Option<OwnedMutexGuard<Sampler<S, W>>>,
    wake: Arc<Notify>,
    phase: PhaseCell,
    worker: JoinHandle<()>,
}

impl<S, W> Drop for Gate<S, W> {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

/// Starts and stops profiling sessions.
///
/// The worker and its lock are created on the first [`Controller::start`]
/// and reused by every later session. Sessions are expected to run one at a
/// time from a single caller.
pub struct Controller<S, W> {
    options: SamplerOptions,
    pending: Option<(S, W)>,
    gate: Option<Gate<S, W>>,
}

impl<S, W> Controller<S, W>
where
    S: TaskSource + TaskNames + Send + 'static,
    W: Write + Send + 'static,
{
    pub fn new(source: S, out: W, options: SamplerOptions) -> Self {
        Controller {
            options,
            pending: Some((source, out)),
            gate: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.gate.is_some()
    }

    /// Phase of the worker, or `None` before the first session.
    pub fn worker_phase(&self) -> Option<WorkerPhase> {
        self.gate.as_ref().map(|gate| gate.phase.get())
    }

    /// Interval of the most recent session, readable between sessions.
    pub fn interval(&self) -> Option<Duration> {
        let held = self.gate.as_ref()?.held.as_ref()?;
        Some(held.interval())
    }

    /// Run one session sampling every `seconds` until a newline arrives on
    /// `input`.
    pub async fn start<R>(&mut self, seconds: i64, input: R) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        self.start_with_interval(interval_from_secs(seconds), input)
            .await
    }

    pub async fn start_with_interval<R>(&mut self, interval: Duration, input: R) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let gate = self.ensure_started()?;

        // A cancelled session leaves the lock with the worker; take it back.
        let mut held = match gate.held.take() {
            Some(held) => held,
            None => gate.lock.clone().lock_owned().await,
        };

        held.begin_session(interval);
        if let Err(err) = held.source_mut().enable_tracing() {
            gate.held = Some(held);
            return Err(err.wrap_err("can't enable task tracing"));
        }
        tracing::info!(
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "sampling session started"
        );
        drop(held);

        let stop = wait_for_newline(input).await;

        // Waits for a pass in progress to finish.
        let mut held = gate.lock.clone().lock_owned().await;
        gate.wake.notify_one();
        let disabled = held.source_mut().disable_tracing();
        gate.held = Some(held);
        tracing::info!("sampling session stopped");

        // The session is over either way; report what went wrong once.
        match (stop, disabled) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(err), Ok(())) => Err(err).wrap_err("failed to read stop signal from console"),
            (Ok(()), Err(err)) => Err(err.wrap_err("can't disable task tracing")),
            (Err(read_err), Err(err)) => Err(err.wrap_err(format!(
                "can't disable task tracing after failing to read stop signal: {read_err}"
            ))),
        }
    }

    fn ensure_started(&mut self) -> Result<&mut Gate<S, W>> {
        if self.gate.is_none() {
            let gate = self.create_gate()?;
            self.gate = Some(gate);
        }
        self.gate
            .as_mut()
            .ok_or_else(|| eyre!("sampler worker is not running"))
    }

    fn create_gate(&mut self) -> Result<Gate<S, W>> {
        let (source, out) = self
            .pending
            .take()
            .ok_or_else(|| eyre!("sampler resources were lost by an earlier failure"))?;

        // The lock starts out held, so the worker waits for the first session.
        let lock = Arc::new(Mutex::new(Sampler::new(source, out, self.options)));
        let held = match lock.clone().try_lock_owned() {
            Ok(held) => held,
            Err(err) => {
                self.reclaim(lock);
                return Err(err).wrap_err("can't create sampler lock");
            }
        };

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                drop(held);
                self.reclaim(lock);
                return Err(err).wrap_err("can't create sampler worker");
            }
        };

        let wake = Arc::new(Notify::new());
        let phase = PhaseCell::default();
        let worker = runtime.spawn(run_worker(lock.clone(), wake.clone(), phase.clone()));
        tracing::debug!("sampler worker created");

        Ok(Gate {
            lock,
            held: Some(held),
            wake,
            phase,
            worker,
        })
    }

    /// Put the source and sink back so a later `start` can try again.
    fn reclaim(&mut self, lock: Arc<Mutex<Sampler<S, W>>>) {
        if let Ok(mutex) = Arc::try_unwrap(lock) {
            self.pending = Some(mutex.into_inner().into_parts());
        }
    }
}
