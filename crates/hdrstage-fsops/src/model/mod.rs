//! Domain models for header staging.
//!
//! # Design
//! - Keep task and report types plain data; no IO handles.
//! - Rendering of status lines lives on the types so every surface prints the same text.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use serde::Serialize;

/// A single source-to-destination copy, resolved to concrete paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyTask {
    /// File to copy from.
    pub source: PathBuf,
    /// File to copy to.
    pub destination: PathBuf,
}

impl CopyTask {
    /// Construct a task from a source and destination path.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Outcome of staging one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageAction {
    /// The destination was absent or differed and has been (or would be) overwritten.
    Copy,
    /// The destination already matched the source byte-for-byte.
    NotModified,
}

impl StageAction {
    /// Status label printed next to each task.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "COPY",
            Self::NotModified => "NOT MODIFIED",
        }
    }
}

impl Display for StageAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A task paired with the action taken for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    /// Task that was processed.
    pub task: CopyTask,
    /// Action decided for the task.
    pub action: StageAction,
}

impl Display for StageRecord {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} to {} {}",
            self.task.source.display(),
            self.task.destination.display(),
            self.action
        )
    }
}

/// Ordered records for every task of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageReport {
    /// Records in task order.
    pub records: Vec<StageRecord>,
}

impl StageReport {
    /// Number of tasks whose action was [`StageAction::Copy`].
    #[must_use]
    pub fn copied(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.action == StageAction::Copy)
            .count()
    }

    /// `true` when no task needed a copy.
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.copied() == 0
    }
}
