use tracing::{info, warn};

use super::Workflow;
use crate::error::WorkflowError;
use crate::git::VcsClient;
use crate::report::Reporter;

impl<C, R> Workflow<'_, C, R>
where
    C: VcsClient + ?Sized,
    R: Reporter + ?Sized,
{
    /// Continue a stopped rebase once every conflict has been staged.
    pub fn resolve(&self) -> Result<(), WorkflowError> {
        self.inspector().ensure_repository()?;

        let paths = self.client.unmerged_paths()?;
        if !paths.is_empty() {
            return Err(WorkflowError::UnresolvedConflicts { paths });
        }

        self.reporter.step("Continuing rebase");
        if let Err(error) = self.client.rebase_continue() {
            warn!(%error, "rebase --continue failed");
            // The next replayed commit may have stopped on fresh conflicts.
            let paths = self.client.unmerged_paths().unwrap_or_default();
            return Err(WorkflowError::RebaseContinueFailed { detail: error.detail(), paths });
        }

        info!("rebase continued");
        self.reporter.success("Rebase completed");
        Ok(())
    }

    /// Abandon the in-progress rebase and restore the pre-rebase branch.
    pub fn abort(&self) -> Result<(), WorkflowError> {
        self.inspector().ensure_repository()?;

        self.reporter.step("Aborting rebase");
        self.client
            .rebase_abort()
            .map_err(|error| WorkflowError::RebaseAbortFailed { detail: error.detail() })?;

        info!("rebase aborted");
        self.reporter.success("Rebase aborted; branch restored");
        Ok(())
    }
}
