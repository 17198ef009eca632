use crate::model::LowStockRecord;
use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{error, info, warn};

/// A user-visible message emitted by a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The module is switched off; the run did nothing.
    Disabled,
    /// The run failed and persisted nothing.
    Failed { message: String },
    /// Low-stock findings were persisted and should be sent out with `template`.
    LowStock {
        template: String,
        records: Vec<LowStockRecord>,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Disabled => write!(f, "Low-stock notification module is not enabled"),
            Notice::Failed { message } => {
                write!(f, "An error occurred during the low-stock check: {}", message)
            }
            Notice::LowStock { template, records } => write!(
                f,
                "{} wishlist item(s) are low on stock (template {})",
                records.len(),
                template
            ),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotifyError {
    #[error("Notice delivery failed: {0}")]
    Delivery(String),
}

/// Delivers [`Notice`]s to people.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: Notice) -> Result<(), NotifyError>;
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notice: Notice) -> Result<(), NotifyError> {
        match &notice {
            Notice::Disabled => warn!("{}", notice),
            Notice::Failed { .. } => error!("{}", notice),
            Notice::LowStock { records, .. } => {
                info!(count = records.len(), "{}", notice);
            }
        }
        Ok(())
    }
}

/// Keeps every notice it receives. Useful for tests and for embedding.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
    fail_with: Option<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that records notices and then reports a delivery failure.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            notices: Arc::default(),
            fail_with: Some(reason.into()),
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notice: Notice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .map_err(|_| NotifyError::Delivery("notice log poisoned".to_string()))?
            .push(notice);
        match &self.fail_with {
            Some(reason) => Err(NotifyError::Delivery(reason.clone())),
            None => Ok(()),
        }
    }
}
