//! Long-running operation lifecycle shared by Bulk query jobs and Metadata
//! deploy/retrieve.
//!
//! Every asynchronous Salesforce operation follows the same shape:
//!
//! ```text
//! submit ──► OperationHandle (Queued, done = false)
//!               │
//!   poll ◄──────┘  OperationStatus snapshots until done == true
//!               │
//!  fetch ◄──────┘  ResultPage chain (Bulk) or terminal detail (Metadata)
//! ```
//!
//! The concrete clients only translate wire formats into these types. The
//! operations themselves are stateless: every call is one request carrying
//! the identifier or locator the caller already holds. Looping and sleeping
//! live in [`driver`], which callers opt into.

pub mod driver;

use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::{Error, ErrorKind, Result};

/// Which API an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    BulkQuery,
    Deploy,
    Retrieve,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationKind::BulkQuery => "BulkQuery",
            OperationKind::Deploy => "Deploy",
            OperationKind::Retrieve => "Retrieve",
        })
    }
}

/// Abstract lifecycle state.
///
/// `Queued → InProgress → {Succeeded | JobComplete, Failed, Aborted}`.
/// `JobComplete` is the Bulk API's name for success and is kept distinct so
/// callers see the label the remote system used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationState {
    Queued,
    InProgress,
    Succeeded,
    JobComplete,
    Failed,
    Aborted,
}

impl OperationState {
    /// Returns true once no further transitions can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationState::Succeeded
                | OperationState::JobComplete
                | OperationState::Failed
                | OperationState::Aborted
        )
    }

    /// Returns true for the successful terminal states.
    pub fn is_success(&self) -> bool {
        matches!(self, OperationState::Succeeded | OperationState::JobComplete)
    }

    /// Map a Bulk API 2.0 job state.
    pub fn from_bulk(label: &str) -> Option<Self> {
        Some(match label {
            "Open" | "UploadComplete" => OperationState::Queued,
            "InProgress" => OperationState::InProgress,
            "JobComplete" => OperationState::JobComplete,
            "Failed" => OperationState::Failed,
            "Aborted" => OperationState::Aborted,
            _ => return None,
        })
    }

    /// Map a Metadata API deploy/retrieve status or async state.
    pub fn from_metadata(label: &str) -> Option<Self> {
        Some(match label {
            "Pending" | "Queued" => OperationState::Queued,
            "InProgress" | "Canceling" => OperationState::InProgress,
            "Succeeded" | "SucceededPartial" | "Completed" => OperationState::Succeeded,
            "Failed" | "Error" => OperationState::Failed,
            "Canceled" => OperationState::Aborted,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationState::Queued => "Queued",
            OperationState::InProgress => "InProgress",
            OperationState::Succeeded => "Succeeded",
            OperationState::JobComplete => "JobComplete",
            OperationState::Failed => "Failed",
            OperationState::Aborted => "Aborted",
        }
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a submitted asynchronous operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle {
    pub id: String,
    pub kind: OperationKind,
    pub created_at: DateTime<Utc>,
    pub state: OperationState,
    pub done: bool,
}

impl OperationHandle {
    /// A freshly submitted operation: `Queued`, not done.
    ///
    /// Submit never decides completion, even when the remote call returned
    /// quickly; only a poll does.
    pub fn submitted(id: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            id: id.into(),
            kind,
            created_at: Utc::now(),
            state: OperationState::Queued,
            done: false,
        }
    }

    /// Record a state reported by a control call such as a cancel.
    pub fn with_state(mut self, state: OperationState, done: bool) -> Self {
        self.state = state;
        self.done = done;
        self
    }
}

/// Optional progress counters reported by a poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    pub processed: Option<i64>,
    pub total: Option<i64>,
    pub errors: Option<i64>,
    pub tests_completed: Option<i64>,
    pub tests_total: Option<i64>,
    pub test_errors: Option<i64>,
}

/// Error information attached to a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub code: Option<String>,
    pub message: String,
}

/// Snapshot of an operation's progress, produced by one poll.
///
/// `success` and `detail` only carry meaning once `done` is true; the
/// builder methods refuse to set them before that.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationStatus<D> {
    pub id: String,
    pub kind: OperationKind,
    pub state: OperationState,
    /// The state label exactly as the remote system reported it.
    pub remote_state: String,
    pub done: bool,
    pub success: bool,
    pub progress: Progress,
    pub error: Option<RemoteError>,
    pub detail: Option<D>,
}

impl<D> OperationStatus<D> {
    pub fn new(
        id: impl Into<String>,
        kind: OperationKind,
        state: OperationState,
        remote_state: impl Into<String>,
        done: bool,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            state,
            remote_state: remote_state.into(),
            done,
            success: false,
            progress: Progress::default(),
            error: None,
            detail: None,
        }
    }

    pub fn with_success(mut self, success: bool) -> Self {
        self.success = self.done && success;
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_error(mut self, error: Option<RemoteError>) -> Self {
        self.error = error;
        self
    }

    /// Attach terminal detail. Ignored while the operation is still running.
    pub fn with_detail(mut self, detail: D) -> Self {
        if self.done {
            self.detail = Some(detail);
        }
        self
    }

    /// No error, not finished yet.
    pub fn is_in_progress(&self) -> bool {
        !self.done
    }

    /// Finished, but not successfully.
    pub fn is_terminal_failure(&self) -> bool {
        self.done && !self.success
    }

    /// Convert a terminal failure into `RemoteOperationFailed`.
    ///
    /// In-progress and successful snapshots pass through unchanged.
    pub fn into_outcome(self) -> Result<Self> {
        if !self.is_terminal_failure() {
            return Ok(self);
        }
        let message = self
            .error
            .as_ref()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| format!("{} ended as {}", self.kind, self.remote_state));
        Err(Error::new(ErrorKind::RemoteOperationFailed {
            id: self.id,
            state: self.remote_state,
            message,
        }))
    }
}

/// One page of results plus the locator of the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPage<T> {
    pub rows: Vec<T>,
    /// `None` once the stream is exhausted.
    pub locator: Option<String>,
}

impl<T> ResultPage<T> {
    /// Build a page, normalizing the raw locator.
    pub fn new(rows: Vec<T>, raw_locator: Option<&str>) -> Self {
        Self {
            rows,
            locator: normalize_locator(raw_locator),
        }
    }

    /// Returns true if there are no further pages.
    pub fn is_last(&self) -> bool {
        self.locator.is_none()
    }

    /// Transform the rows, keeping the locator.
    pub fn map_rows<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> ResultPage<U> {
        ResultPage {
            rows: f(self.rows),
            locator: self.locator,
        }
    }
}

/// Treat an absent, empty or literal `"null"` locator as end of stream.
pub fn normalize_locator(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|l| !l.is_empty() && *l != "null")
        .map(str::to_string)
}
