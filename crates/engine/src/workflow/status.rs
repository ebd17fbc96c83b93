use reposync_common::state::{RepoState, StatusSnapshot};
use tracing::warn;

use super::Workflow;
use crate::error::WorkflowError;
use crate::git::VcsClient;
use crate::report::Reporter;

impl<C, R> Workflow<'_, C, R>
where
    C: VcsClient + ?Sized,
    R: Reporter + ?Sized,
{
    /// Inspect, then collect the short status and recent history. Read-only.
    pub fn status(&self) -> Result<(RepoState, StatusSnapshot), WorkflowError> {
        let state = self.inspector().inspect()?;

        let entries = self.client.status().unwrap_or_else(|error| {
            warn!(%error, "status listing unavailable");
            Vec::new()
        });
        let history = self.client.recent_history(self.config.history_limit).unwrap_or_else(|error| {
            warn!(%error, "history unavailable");
            Vec::new()
        });

        Ok((state, StatusSnapshot { entries, history }))
    }

    /// Dry-run diagnostics: inspection only.
    pub fn check(&self) -> Result<RepoState, WorkflowError> {
        let state = self.inspector().inspect()?;
        if state.rebase_in_progress {
            self.reporter.warn("A rebase is in progress; finish with resolve or abort");
        }
        if !state.remote_reachable {
            self.reporter.warn(&format!("Remote {} is unreachable", state.remote));
        }
        Ok(state)
    }
}
