//! Run states and the report a finished run hands back.

use serde::Serialize;
use std::fmt;

/// Where a run is in its lifecycle.
///
/// ```text
/// Idle -> Gated -> Fetching -> Evaluating -> Persisting -> Reporting -> Done
///           \______________________________________________/
///                        (disabled: Gated -> Reporting)
/// ```
///
/// `Failed` is terminal and reachable from every state except `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JobState {
    Idle,
    Gated,
    Fetching,
    Evaluating,
    Persisting,
    Reporting,
    Done,
    Failed,
}

impl JobState {
    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: JobState) -> bool {
        use JobState::*;
        match (self, next) {
            (Idle, Gated) => true,
            (Gated, Fetching) | (Gated, Reporting) => true,
            (Fetching, Evaluating) => true,
            (Evaluating, Persisting) => true,
            (Persisting, Reporting) => true,
            (Reporting, Done) => true,
            (Idle, Failed) | (Done, Failed) | (Failed, _) => false,
            (_, Failed) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunOutcome {
    /// The module is disabled; nothing was read or written.
    Disabled,
    /// The run examined the wishlist and persisted its findings.
    Completed,
}

/// Summary of a run that reached `Done`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Every state the run passed through, ending in [`JobState::Done`].
    pub states: Vec<JobState>,
    pub entries_examined: usize,
    /// SKUs of entries skipped because the product is not in the catalog.
    pub skipped: Vec<String>,
    pub records_persisted: usize,
}

impl RunReport {
    pub fn final_state(&self) -> JobState {
        self.states.last().copied().unwrap_or(JobState::Idle)
    }
}
