use reposync_common::action::Verb;
use tracing::info;

use super::{require_message, SaveOutcome, SyncOutcome, Workflow};
use crate::error::WorkflowError;
use crate::git::{Upstream, VcsClient};
use crate::report::Reporter;

/// Summary reported after a fully successful push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    /// Local branch that was published.
    pub branch: String,
    pub upstream: Upstream,
    pub message: String,
    pub save: SaveOutcome,
    pub sync: SyncOutcome,
}

impl<C, R> Workflow<'_, C, R>
where
    C: VcsClient + ?Sized,
    R: Reporter + ?Sized,
{
    /// Save, sync, then publish the current branch. Stops at the first failure.
    pub fn push(&self, message: Option<&str>) -> Result<PushOutcome, WorkflowError> {
        let message = require_message(Verb::Push, message)?;
        self.preconditions(Verb::Push)?;

        let save = self.save(Some(message))?;
        let sync = self.sync()?;

        let inspector = self.inspector();
        let branch = inspector.require_branch()?;
        let upstream = inspector.upstream(&branch)?;
        let remote = upstream.remote.as_str();
        self.reporter.step(&format!("Pushing {branch} to {}", upstream.short_name()));
        self.client.push(remote, &branch, &upstream.branch).map_err(|error| {
            WorkflowError::PushFailed { remote: remote.to_string(), detail: error.detail() }
        })?;

        if !self.config.is_primary(&branch) {
            self.reporter.info(&format!(
                "{branch} is not a primary branch ({}); open a pull request to merge it",
                self.config.primary_branches.join(", ")
            ));
        }

        info!(%branch, upstream = %upstream.short_name(), "pushed");
        Ok(PushOutcome { branch, upstream, message: message.to_string(), save, sync })
    }
}
