//! # Scheduler
//!
//! Triggers the [`JobRunner`] periodically and makes sure runs never overlap.

use crate::job::{JobError, JobRunner, RunReport};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Periodic trigger for a [`JobRunner`].
///
/// Clones share one run guard, so a manual [`trigger`](Scheduler::trigger)
/// while a scheduled run is in progress is skipped.
#[derive(Clone)]
pub struct Scheduler {
    runner: JobRunner,
    interval: Duration,
    guard: Arc<Mutex<()>>,
}

impl Scheduler {
    pub fn new(runner: JobRunner, interval: Duration) -> Self {
        Self {
            runner,
            interval,
            guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Performs one guarded run.
    ///
    /// Returns `None` without running when another run is in progress.
    pub async fn trigger(&self) -> Option<Result<RunReport, JobError>> {
        let Ok(_running) = self.guard.try_lock() else {
            warn!("Run already in progress, skipping trigger");
            return None;
        };
        Some(self.runner.run().await)
    }

    /// Runs the job every `interval` until `shutdown` turns `true` or its
    /// sender is dropped. The first run starts immediately.
    ///
    /// Returns the number of runs that were started.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> usize {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut runs = 0;

        info!(interval = ?self.interval, "Scheduler started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.trigger().await {
                        Some(Ok(report)) => {
                            runs += 1;
                            info!(outcome = ?report.outcome, persisted = report.records_persisted, "Scheduled run finished");
                        }
                        Some(Err(e)) => {
                            runs += 1;
                            error!(stage = %e.stage(), error = %e, "Scheduled run failed");
                        }
                        None => {}
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(runs, "Scheduler stopped");
        runs
    }

    /// Spawns [`run`](Scheduler::run) on its own task.
    ///
    /// Send `true` on the returned sender (or drop it) to stop the loop.
    pub fn spawn(self) -> (watch::Sender<bool>, JoinHandle<usize>) {
        let (stop, shutdown) = watch::channel(false);
        let handle = tokio::spawn(self.run(shutdown));
        (stop, handle)
    }
}
