//! Instance polling: one fetch of instance state per tick.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use liftoff_common::codes;

use crate::application::ports::InstanceRepository;
use crate::domain::{AggregateStatus, ApiError, classify};

/// Result of one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    /// The backend says staging has not finished; keep waiting.
    NotStaged,
    /// The backend reported a failure that will not resolve by waiting.
    Failed { message: String },
    /// Staging is done; here is the classified snapshot.
    Instances(AggregateStatus),
}

/// Polls one application's instances and classifies each snapshot against
/// the requested instance count.
pub struct InstancePoller<'a, I: InstanceRepository> {
    repo: &'a I,
    app_guid: &'a str,
    requested: u32,
}

impl<'a, I: InstanceRepository> InstancePoller<'a, I> {
    #[must_use]
    pub fn new(repo: &'a I, app_guid: &'a str, requested: u32) -> Self {
        Self {
            repo,
            app_guid,
            requested,
        }
    }

    /// Fetch and classify the current instance states.
    pub async fn poll(&self) -> Poll {
        match self.repo.get_instances(self.app_guid).await {
            Ok(snapshot) => {
                let status = classify(&snapshot, self.requested);
                tracing::debug!(
                    app = self.app_guid,
                    verdict = ?status.verdict,
                    running = status.counts.running,
                    "polled instances"
                );
                Poll::Instances(status)
            }
            Err(ApiError::Backend { code, .. }) if codes::is_not_staged(&code) => {
                tracing::debug!(app = self.app_guid, "app not staged yet");
                Poll::NotStaged
            }
            Err(err) => {
                tracing::debug!(app = self.app_guid, code = ?err.code(), "instance poll failed");
                Poll::Failed {
                    message: err.to_string(),
                }
            }
        }
    }
}
