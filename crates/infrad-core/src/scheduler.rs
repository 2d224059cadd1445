//! Supervised periodic execution of sampler tasks.
//!
//! One tokio task per sampler family, each on its own cadence; no task
//! waits on another. The blocking part of a cycle runs on the blocking
//! pool under a timeout, with panics contained to the cycle, so a
//! defective or stalled data source degrades exactly one family and
//! nothing else.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, TryLockError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, warn};

use crate::metrics::MetricRegistry;
use crate::sampler::{SampleError, Sampler};

/// Cadence and cycle timeout for one sampler task.
#[derive(Debug, Clone, Copy)]
pub struct TaskConfig {
    pub interval: Duration,
    /// Upper bound for one cycle; an overrun counts as a failed cycle.
    pub timeout: Duration,
}

impl TaskConfig {
    /// Timeout defaults to the interval, but never below 5 seconds.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timeout: interval.max(Duration::from_secs(5)),
        }
    }
}

/// Tagged per-cycle result.
enum CycleOutcome {
    Ok,
    Failed(SampleError),
    Panicked,
    TimedOut,
    /// The previous cycle still holds the sampler; this tick was skipped.
    StillRunning,
}

/// Owns the lifecycle of all sampler tasks.
///
/// Tasks start when spawned and run until `shutdown`. They share nothing
/// but the registry, whose batches keep it consistent at any stop point.
pub struct Scheduler {
    registry: Arc<MetricRegistry>,
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(registry: Arc<MetricRegistry>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            registry,
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    /// Spawns one sampler task. The first cycle runs immediately.
    pub fn spawn(&mut self, sampler: Box<dyn Sampler>, config: TaskConfig) {
        let registry = Arc::clone(&self.registry);
        let shutdown_rx = self.shutdown_tx.subscribe();
        self.handles
            .push(tokio::spawn(run_task(sampler, config, registry, shutdown_rx)));
    }

    /// Signals every task to stop and waits for all of them to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

async fn run_task(
    sampler: Box<dyn Sampler>,
    config: TaskConfig,
    registry: Arc<MetricRegistry>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let family = sampler.family();
    let sampler = Arc::new(Mutex::new(sampler));

    let mut tick = tokio::time::interval(config.interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    debug!(
        family,
        interval_ms = config.interval.as_millis() as u64,
        "sampler task started"
    );

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                debug!(family, "sampler task stopping");
                return;
            }
            _ = tick.tick() => {}
        }

        match run_cycle(&sampler, &registry, config.timeout).await {
            CycleOutcome::Ok => {}
            CycleOutcome::Failed(e) => {
                warn!(family, error = %e, "sampling cycle failed, keeping previous values");
            }
            CycleOutcome::Panicked => {
                error!(family, "sampling cycle panicked, keeping previous values");
            }
            CycleOutcome::TimedOut => {
                warn!(
                    family,
                    timeout_ms = config.timeout.as_millis() as u64,
                    "sampling cycle timed out"
                );
            }
            CycleOutcome::StillRunning => {
                debug!(family, "previous cycle still running, tick skipped");
            }
        }
    }
}

async fn run_cycle(
    sampler: &Arc<Mutex<Box<dyn Sampler>>>,
    registry: &Arc<MetricRegistry>,
    timeout: Duration,
) -> CycleOutcome {
    let sampler = Arc::clone(sampler);
    let registry = Arc::clone(registry);

    let work = tokio::task::spawn_blocking(move || {
        // A timed-out cycle keeps running on the blocking pool until its
        // data-source call returns; it holds this lock the whole time, so
        // subsequent ticks skip instead of piling up.
        let mut guard = match sampler.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return CycleOutcome::StillRunning,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        match catch_unwind(AssertUnwindSafe(|| guard.sample(&registry))) {
            Ok(Ok(())) => CycleOutcome::Ok,
            Ok(Err(e)) => CycleOutcome::Failed(e),
            Err(_) => CycleOutcome::Panicked,
        }
    });

    match tokio::time::timeout(timeout, work).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_err)) => {
            error!(error = %join_err, "sampling cycle aborted");
            CycleOutcome::Panicked
        }
        Err(_) => CycleOutcome::TimedOut,
    }
}
