// Action sequencer: save, sync, push, resolve, abort, status, check.
//
// Each action runs its preconditions through the inspector, then issues
// client calls strictly in order and stops at the first failure. Nothing
// is rolled back.

mod push;
mod rebase;
mod save;
mod status;
mod sync;

pub use push::PushOutcome;
pub use save::SaveOutcome;
pub use sync::SyncOutcome;

use reposync_common::action::Verb;

use crate::config::RepoConfig;
use crate::error::WorkflowError;
use crate::git::VcsClient;
use crate::inspector::Inspector;
use crate::report::Reporter;

pub struct Workflow<'a, C: ?Sized, R: ?Sized> {
    client: &'a C,
    config: &'a RepoConfig,
    reporter: &'a R,
}

impl<'a, C, R> Workflow<'a, C, R>
where
    C: VcsClient + ?Sized,
    R: Reporter + ?Sized,
{
    pub fn new(client: &'a C, config: &'a RepoConfig, reporter: &'a R) -> Self {
        Self { client, config, reporter }
    }

    pub fn inspector(&self) -> Inspector<'a, C> {
        Inspector::new(self.client, self.config)
    }

    // Repository + rebase preconditions shared by the history-rewriting verbs.
    fn preconditions(&self, verb: Verb) -> Result<Inspector<'a, C>, WorkflowError> {
        let inspector = self.inspector();
        inspector.ensure_repository()?;
        inspector.ensure_no_rebase(verb)?;
        Ok(inspector)
    }
}

/// Validate the message before any client call is made.
fn require_message(verb: Verb, message: Option<&str>) -> Result<&str, WorkflowError> {
    message
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .ok_or(WorkflowError::MissingMessage { verb })
}
