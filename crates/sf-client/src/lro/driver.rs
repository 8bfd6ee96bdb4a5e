//! Caller-side loops over the stateless operations.
//!
//! Nothing in the clients calls these; they exist for callers that want the
//! usual "poll until done, then read every page" behaviour without writing
//! the loops themselves. Each loop holds no state beyond its own locals.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

use super::{OperationStatus, ResultPage};
use crate::error::{Error, ErrorKind, Result};

/// Cadence and deadline for [`poll_until_terminal`].
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Sleep between polls.
    pub interval: Duration,
    /// Give up after this long; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Some(Duration::from_secs(600)),
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Poll until a snapshot reports `done`, then return it.
///
/// A failed call ends the loop with that error; a terminal failure is
/// returned as a normal snapshot with `success == false`.
pub async fn poll_until_terminal<D, F, Fut>(
    mut poll: F,
    policy: &PollPolicy,
) -> Result<OperationStatus<D>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<OperationStatus<D>>>,
{
    let started = Instant::now();
    let mut last_state = None;

    loop {
        let status = poll().await?;

        if last_state != Some(status.state) {
            info!(
                id = %status.id,
                kind = %status.kind,
                state = %status.state,
                remote_state = %status.remote_state,
                "Operation state observed"
            );
            last_state = Some(status.state);
        }

        if status.done {
            return Ok(status);
        }

        let waited = started.elapsed();
        if let Some(timeout) = policy.timeout {
            if waited >= timeout {
                return Err(Error::new(ErrorKind::PollTimeout {
                    id: status.id,
                    waited,
                }));
            }
        }

        tokio::time::sleep(policy.interval).await;
    }
}

/// Follow a locator chain from `start` and collect every row.
///
/// `fetch` receives the locator to request (`None` for the first page) and
/// the loop stops at the first page whose locator is empty.
pub async fn collect_pages<T, F, Fut>(start: Option<String>, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<ResultPage<T>>>,
{
    let mut rows = Vec::new();
    let mut locator = start;
    let mut pages = 0usize;

    loop {
        let page = fetch(locator.take()).await?;
        pages += 1;
        rows.extend(page.rows);

        match page.locator {
            Some(next) => locator = Some(next),
            None => {
                debug!(pages, rows = rows.len(), "Result stream exhausted");
                return Ok(rows);
            }
        }
    }
}
