// Command dispatcher: one request in, one `ActionResult` out.

use reposync_common::action::{ActionRequest, ActionResult, Verb};
use reposync_common::state::RepoState;
use tracing::{info, warn};

use crate::config::RepoConfig;
use crate::error::WorkflowError;
use crate::git::VcsClient;
use crate::report::Reporter;
use crate::workflow::{PushOutcome, SaveOutcome, SyncOutcome, Workflow};

pub struct Controller<C, R> {
    client: C,
    config: RepoConfig,
    reporter: R,
}

impl<C: VcsClient, R: Reporter> Controller<C, R> {
    pub fn new(client: C, config: RepoConfig, reporter: R) -> Self {
        Self { client, config, reporter }
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// Run the requested action. Failures are folded into the result, never panicked.
    pub fn dispatch(&self, request: &ActionRequest) -> ActionResult {
        let verb = request.verb();
        let workflow = Workflow::new(&self.client, &self.config, &self.reporter);
        info!(%verb, "dispatching");

        let outcome = match verb {
            Verb::Save => workflow
                .save(request.message())
                .map(|outcome| ActionResult::success(verb, describe_save(outcome))),
            Verb::Push => workflow
                .push(request.message())
                .map(|outcome| ActionResult::success(verb, describe_push(&outcome))),
            Verb::Sync => {
                workflow.sync().map(|outcome| ActionResult::success(verb, describe_sync(outcome)))
            }
            Verb::Status => workflow.status().map(|(state, snapshot)| {
                ActionResult::success(verb, state.divergence.describe())
                    .with_state(state)
                    .with_snapshot(snapshot)
            }),
            Verb::Check => workflow.check().map(|state| check_result(verb, state)),
            Verb::Resolve => {
                workflow.resolve().map(|()| ActionResult::success(verb, "Rebase continued"))
            }
            Verb::Abort => workflow.abort().map(|()| ActionResult::success(verb, "Rebase aborted")),
        };

        match outcome {
            Ok(result) => {
                info!(%verb, succeeded = result.succeeded, "action finished");
                result
            }
            Err(error) => {
                warn!(%verb, code = error.code(), %error, "action failed");
                ActionResult::failed(verb, error.to_failure())
            }
        }
    }
}

// An unreachable remote fails `check` but the state is still reported.
fn check_result(verb: Verb, state: RepoState) -> ActionResult {
    if state.remote_reachable {
        return ActionResult::success(verb, "Repository is ready").with_state(state);
    }
    let error = WorkflowError::RemoteUnreachable { remote: state.remote.clone() };
    ActionResult::failed(verb, error.to_failure()).with_state(state)
}

fn describe_save(outcome: SaveOutcome) -> String {
    match outcome {
        SaveOutcome::Committed { attempts: 1 } => "Changes saved".to_string(),
        SaveOutcome::Committed { attempts } => {
            format!("Changes saved after {attempts} attempts (hooks modified files)")
        }
        SaveOutcome::NothingToCommit => "Nothing to save".to_string(),
    }
}

fn describe_sync(outcome: SyncOutcome) -> String {
    match outcome {
        SyncOutcome::UpToDate => "Already up to date".to_string(),
        SyncOutcome::NoUpstream => "No upstream branch yet; nothing to sync".to_string(),
        SyncOutcome::Rebased { incoming } => {
            format!("Rebased onto {incoming} upstream commit(s)")
        }
    }
}

fn describe_push(outcome: &PushOutcome) -> String {
    let target = outcome.upstream.short_name();
    match outcome.save {
        SaveOutcome::Committed { .. } => format!("Pushed \"{}\" to {target}", outcome.message),
        SaveOutcome::NothingToCommit => {
            format!("Nothing new to save; pushed {} to {target}", outcome.branch)
        }
    }
}
