use reposync_common::action::Verb;
use tracing::{info, warn};

use super::Workflow;
use crate::error::WorkflowError;
use crate::git::VcsClient;
use crate::report::Reporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing new upstream; local history untouched.
    UpToDate,
    /// The branch does not exist on the remote yet.
    NoUpstream,
    /// Local commits were replayed on top of `incoming` upstream commits.
    Rebased { incoming: u32 },
}

impl<C, R> Workflow<'_, C, R>
where
    C: VcsClient + ?Sized,
    R: Reporter + ?Sized,
{
    /// Fetch the upstream branch and rebase local work onto it.
    pub fn sync(&self) -> Result<SyncOutcome, WorkflowError> {
        let inspector = self.preconditions(Verb::Sync)?;
        let branch = inspector.require_branch()?;
        let upstream = inspector.upstream(&branch)?;
        let remote = upstream.remote.as_str();
        let name = upstream.short_name();

        if !self.client.remote_reachable(remote) {
            return Err(WorkflowError::RemoteUnreachable { remote: remote.to_string() });
        }

        self.reporter.step(&format!("Fetching {remote}"));
        self.client.fetch(remote).map_err(|error| WorkflowError::FetchFailed {
            remote: remote.to_string(),
            detail: error.detail(),
        })?;

        if self.client.resolve_ref(&upstream.tracking_ref)?.is_none() {
            self.reporter.info(&format!("{name} does not exist yet; nothing to sync"));
            return Ok(SyncOutcome::NoUpstream);
        }

        let incoming = self.client.count_commits(&format!("HEAD..{}", upstream.tracking_ref))?;
        if incoming == 0 {
            self.reporter.success(&format!("Already up to date with {name}"));
            return Ok(SyncOutcome::UpToDate);
        }

        self.reporter.step(&format!("Rebasing onto {name} ({incoming} new commit(s))"));
        if let Err(error) = self.client.pull_rebase(remote, &upstream.branch) {
            warn!(%error, "pull --rebase failed");
            return Err(self.classify_pull_failure(error.detail()));
        }

        info!(incoming, %branch, "synced with upstream");
        self.reporter.success(&format!("Rebased onto {name}"));
        Ok(SyncOutcome::Rebased { incoming })
    }

    // A stopped rebase or unmerged paths mean conflicts; anything else is a plain failure.
    fn classify_pull_failure(&self, detail: String) -> WorkflowError {
        let paths = self.client.unmerged_paths().unwrap_or_else(|error| {
            warn!(%error, "could not list unmerged paths");
            Vec::new()
        });
        let stopped = self.client.rebase_in_progress().unwrap_or(false);

        if paths.is_empty() && !stopped {
            WorkflowError::PullFailed { detail }
        } else {
            WorkflowError::MergeConflict { paths }
        }
    }
}
