use reposync_common::action::Verb;
use tracing::info;

use super::{require_message, Workflow};
use crate::error::WorkflowError;
use crate::git::VcsClient;
use crate::report::Reporter;
use crate::retry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A commit was created after `attempts` tries (1 or 2).
    Committed { attempts: u32 },
    /// Nothing was staged; no commit was attempted.
    NothingToCommit,
}

impl<C, R> Workflow<'_, C, R>
where
    C: VcsClient + ?Sized,
    R: Reporter + ?Sized,
{
    /// Stage everything and commit it with `message`.
    pub fn save(&self, message: Option<&str>) -> Result<SaveOutcome, WorkflowError> {
        let message = require_message(Verb::Save, message)?;
        self.preconditions(Verb::Save)?;

        self.reporter.step("Staging all changes");
        self.client.stage_all()?;

        if self.client.status()?.is_empty() {
            self.reporter.info("Nothing to commit, working tree clean");
            return Ok(SaveOutcome::NothingToCommit);
        }

        self.reporter.step(&format!("Committing: {message}"));
        let attempts = retry::commit_with_retry(self.client, message, self.reporter)?;
        info!(attempts, "saved changes");
        self.reporter.success("Changes committed");
        Ok(SaveOutcome::Committed { attempts })
    }
}
