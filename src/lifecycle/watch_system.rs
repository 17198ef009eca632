use crate::collaborators::{InventorySource, Notifier, WishlistSource};
use crate::config::{ConfigGate, Settings};
use crate::job::{JobRunner, RunnerOptions};
use crate::store::{self, JsonlBackend, LowStockStore, MemoryBackend, StorageBackend, StorageError};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::info;

/// The external collaborators a [`WatchSystem`] is wired with.
#[derive(Clone)]
pub struct Collaborators {
    pub config: Arc<dyn ConfigGate>,
    pub wishlist: Arc<dyn WishlistSource>,
    pub inventory: Arc<dyn InventorySource>,
    pub notifier: Arc<dyn Notifier>,
}

/// A fully wired low-stock watch.
///
/// `WatchSystem` is responsible for:
/// - **Lifecycle**: spawning the store actor and stopping it again
/// - **Wiring**: handing the store client and collaborators to the [`JobRunner`]
///
/// # Example
///
/// ```ignore
/// let system = WatchSystem::from_settings(&settings, collaborators).await?;
///
/// let report = system.runner.run().await?;
/// let rows = system.store.list_all().await?;
///
/// system.shutdown().await?;
/// ```
pub struct WatchSystem {
    /// The job runner, ready to be triggered.
    pub runner: JobRunner,

    /// Client for the store the runner writes to.
    pub store: LowStockStore,

    handle: JoinHandle<()>,
}

impl WatchSystem {
    /// Spawns a store actor over `backend` and wires a runner to it.
    pub fn start<B: StorageBackend>(
        backend: B,
        collaborators: Collaborators,
        options: RunnerOptions,
    ) -> Self {
        let (actor, store) = store::new(backend);
        let handle = tokio::spawn(actor.run());

        let runner = JobRunner::new(
            collaborators.config,
            collaborators.wishlist,
            collaborators.inventory,
            store.clone(),
            collaborators.notifier,
        )
        .with_options(options);

        Self {
            runner,
            store,
            handle,
        }
    }

    /// Builds the system described by `settings`.
    ///
    /// Uses a [`JsonlBackend`] when `store.path` is set, memory otherwise.
    pub async fn from_settings(
        settings: &Settings,
        collaborators: Collaborators,
    ) -> Result<Self, StorageError> {
        let options = RunnerOptions::from(&settings.runner);

        let system = match &settings.store.path {
            Some(path) => {
                let backend = JsonlBackend::open(path).await?;
                Self::start(backend, collaborators, options)
            }
            None => Self::start(MemoryBackend::new(), collaborators, options),
        };
        Ok(system)
    }

    /// Stops the store actor and waits for it to finish.
    ///
    /// Dropping the runner and the store client closes the actor's channel.
    /// Clones handed out earlier (for example to a
    /// [`Scheduler`](super::Scheduler)) must be dropped first, or this waits
    /// for them.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down watch system...");
        drop(self.runner);
        drop(self.store);

        self.handle.await?;

        info!("Watch system shutdown complete.");
        Ok(())
    }
}
