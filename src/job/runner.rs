//! # JobRunner
//!
//! Orchestrates one low-stock run: gate check, fetch, evaluate, persist, report.
//!
//! All writes are deferred to a single batched append after evaluation, so a
//! run that fails or times out before `Persisting` leaves the store untouched.

use super::error::JobError;
use super::state::{JobState, RunOutcome, RunReport};
use crate::collaborators::{InventoryError, InventorySource, Notice, Notifier, WishlistSource};
use crate::config::{ConfigGate, ModuleConfig, RunnerConfig};
use crate::evaluator::evaluate;
use crate::model::{LowStockDraft, SourceQuantity, WishlistEntry};
use crate::store::LowStockStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

/// Tuning for a [`JobRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Maximum concurrent inventory lookups. Values below 1 are treated as 1.
    pub workers: usize,
    /// Deadline for the fetch and evaluate phase.
    pub deadline: Duration,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self::from(&RunnerConfig::default())
    }
}

impl From<&RunnerConfig> for RunnerOptions {
    fn from(config: &RunnerConfig) -> Self {
        Self {
            workers: config.workers.max(1),
            deadline: Duration::from_millis(config.deadline_ms),
        }
    }
}

/// Records the states a run passes through.
#[derive(Debug)]
struct Progress {
    states: Vec<JobState>,
}

impl Progress {
    fn new() -> Self {
        Self {
            states: vec![JobState::Idle],
        }
    }

    fn current(&self) -> JobState {
        self.states.last().copied().unwrap_or(JobState::Idle)
    }

    fn enter(&mut self, next: JobState) {
        let current = self.current();
        debug_assert!(current.can_transition_to(next), "{} -> {}", current, next);
        debug!(from = %current, to = %next, "Transition");
        self.states.push(next);
    }
}

/// Findings of the fetch and evaluate phase.
#[derive(Debug, Default)]
struct Evaluation {
    examined: usize,
    drafts: Vec<LowStockDraft>,
    skipped: Vec<String>,
}

type Lookup = (usize, WishlistEntry, Result<Vec<SourceQuantity>, InventoryError>);

/// Runs the low-stock watch job.
///
/// Collaborators are passed in explicitly; the runner holds no global state.
/// It does not guard against overlapping runs itself; the caller (see
/// [`Scheduler`](crate::lifecycle::Scheduler)) must never start two at once,
/// since the store would record the same finding twice.
///
/// ```rust
/// use low_stock_watch::collaborators::{InMemoryInventory, InMemoryWishlist, LogNotifier};
/// use low_stock_watch::config::StaticConfigGate;
/// use low_stock_watch::job::{JobRunner, RunOutcome};
/// use low_stock_watch::model::WishlistEntry;
/// use low_stock_watch::store::{self, MemoryBackend};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, store) = store::new(MemoryBackend::new());
///     tokio::spawn(actor.run());
///
///     let inventory = InMemoryInventory::new();
///     inventory.set_quantity("ABC", "default", 3.0).unwrap();
///
///     let runner = JobRunner::new(
///         Arc::new(StaticConfigGate::enabled(5.0)),
///         Arc::new(InMemoryWishlist::new(vec![WishlistEntry::new(1, "ABC", 1)])),
///         Arc::new(inventory),
///         store.clone(),
///         Arc::new(LogNotifier),
///     );
///
///     let report = runner.run().await.unwrap();
///     assert_eq!(report.outcome, RunOutcome::Completed);
///     assert_eq!(report.records_persisted, 1);
/// }
/// ```
#[derive(Clone)]
pub struct JobRunner {
    config: Arc<dyn ConfigGate>,
    wishlist: Arc<dyn WishlistSource>,
    inventory: Arc<dyn InventorySource>,
    store: LowStockStore,
    notifier: Arc<dyn Notifier>,
    options: RunnerOptions,
}

impl JobRunner {
    pub fn new(
        config: Arc<dyn ConfigGate>,
        wishlist: Arc<dyn WishlistSource>,
        inventory: Arc<dyn InventorySource>,
        store: LowStockStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            wishlist,
            inventory,
            store,
            notifier,
            options: RunnerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunnerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> RunnerOptions {
        self.options
    }

    pub fn store(&self) -> &LowStockStore {
        &self.store
    }

    /// Executes one run.
    ///
    /// Returns a report for runs that reach `Done`, including disabled runs.
    /// Any run-level failure sends a [`Notice::Failed`] and is returned as the error.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<RunReport, JobError> {
        let mut progress = Progress::new();

        match self.execute(&mut progress).await {
            Ok(report) => Ok(report),
            Err(e) => {
                let stage = progress.current();
                progress.enter(JobState::Failed);
                error!(%stage, error = %e, "Run failed");
                self.report(Notice::Failed {
                    message: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }

    async fn execute(&self, progress: &mut Progress) -> Result<RunReport, JobError> {
        progress.enter(JobState::Gated);
        let module = self.config.snapshot().await?;

        if !module.is_enabled() {
            progress.enter(JobState::Reporting);
            info!("Module disabled, skipping run");
            self.report(Notice::Disabled).await;
            progress.enter(JobState::Done);
            return Ok(RunReport {
                outcome: RunOutcome::Disabled,
                states: progress.states.clone(),
                entries_examined: 0,
                skipped: Vec::new(),
                records_persisted: 0,
            });
        }

        progress.enter(JobState::Fetching);
        let deadline = self.options.deadline;
        let evaluation = tokio::time::timeout(deadline, self.fetch_and_evaluate(&module, progress))
            .await
            .map_err(|_| JobError::DeadlineExceeded(deadline))??;

        progress.enter(JobState::Persisting);
        let records = if evaluation.drafts.is_empty() {
            Vec::new()
        } else {
            self.store.append(evaluation.drafts).await?
        };

        progress.enter(JobState::Reporting);
        info!(
            examined = evaluation.examined,
            skipped = evaluation.skipped.len(),
            persisted = records.len(),
            "Run complete"
        );
        let records_persisted = records.len();
        if !records.is_empty() {
            self.report(Notice::LowStock {
                template: module.notification_template.clone(),
                records,
            })
            .await;
        }

        progress.enter(JobState::Done);
        Ok(RunReport {
            outcome: RunOutcome::Completed,
            states: progress.states.clone(),
            entries_examined: evaluation.examined,
            skipped: evaluation.skipped,
            records_persisted,
        })
    }

    /// Looks up every entry's quantities on a bounded pool of tasks, then
    /// evaluates the results in enumeration order.
    async fn fetch_and_evaluate(
        &self,
        module: &ModuleConfig,
        progress: &mut Progress,
    ) -> Result<Evaluation, JobError> {
        let entries = self.wishlist.list_wishlist_entries().await?;
        progress.enter(JobState::Evaluating);

        let permits = Arc::new(Semaphore::new(self.options.workers.max(1)));
        let mut tasks: JoinSet<Lookup> = JoinSet::new();
        let mut examined = 0;

        for (index, entry) in entries.enumerate() {
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| JobError::Worker(e.to_string()))?;
            let inventory = Arc::clone(&self.inventory);
            tasks.spawn(async move {
                let _permit = permit;
                let result = inventory.quantities_for(&entry.product_sku).await;
                (index, entry, result)
            });
            examined += 1;
        }

        let mut lookups = Vec::with_capacity(examined);
        while let Some(joined) = tasks.join_next().await {
            lookups.push(joined.map_err(|e| JobError::Worker(e.to_string()))?);
        }
        lookups.sort_by_key(|(index, _, _)| *index);

        let mut evaluation = Evaluation {
            examined,
            ..Evaluation::default()
        };
        for (_, entry, result) in lookups {
            match result {
                Ok(quantities) => {
                    let drafts = evaluate(&entry, &quantities, module.threshold());
                    debug!(customer = %entry.customer_id, sku = %entry.product_sku, low = drafts.len(), "Evaluated");
                    evaluation.drafts.extend(drafts);
                }
                Err(InventoryError::ProductNotFound(sku)) => {
                    warn!(customer = %entry.customer_id, %sku, "Product not found, skipping entry");
                    evaluation.skipped.push(sku);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(evaluation)
    }

    async fn report(&self, notice: Notice) {
        if let Err(e) = self.notifier.notify(notice).await {
            warn!(error = %e, "Notifier failed");
        }
    }
}
