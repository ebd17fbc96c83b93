// Commit retry policy.
//
// A pre-commit hook that reformats files fails the commit but leaves the
// fixed files unstaged. Restaging and committing once more is enough in
// that case; anything else is a genuine failure and is not retried.

use tracing::{info, warn};

use crate::error::WorkflowError;
use crate::git::{GitError, HookSignal, VcsClient};
use crate::report::Reporter;

/// First attempt plus one retry.
pub const MAX_COMMIT_ATTEMPTS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    GiveUp,
}

/// Decide whether a failed commit is worth one more attempt.
///
/// Prefers the client's hook signal. Without one, falls back to the tree:
/// any working-tree change after `add --all` + a failed commit is taken as
/// a hook rewrite. Staged-only entries are what the failed commit left
/// behind and do not count.
pub fn retry_decision<C: VcsClient + ?Sized>(client: &C) -> Result<RetryDecision, GitError> {
    let decision = match client.hook_signal() {
        HookSignal::ModifiedFiles => RetryDecision::Retry,
        HookSignal::Unmodified => RetryDecision::GiveUp,
        HookSignal::Unavailable => {
            let tree_dirty = client.status()?.iter().any(|entry| entry.has_worktree_change());
            if tree_dirty {
                RetryDecision::Retry
            } else {
                RetryDecision::GiveUp
            }
        }
    };
    Ok(decision)
}

/// Commit, retrying once when a hook rewrote files.
///
/// Returns the number of attempts used on success.
pub fn commit_with_retry<C, R>(
    client: &C,
    message: &str,
    reporter: &R,
) -> Result<u32, WorkflowError>
where
    C: VcsClient + ?Sized,
    R: Reporter + ?Sized,
{
    let first = match client.commit(message) {
        Ok(()) => return Ok(1),
        Err(error) => error,
    };
    warn!(error = %first, "commit attempt 1 failed");

    // A failed tree query gives up with the commit's own error.
    let decision = retry_decision(client).unwrap_or_else(|error| {
        warn!(%error, "could not inspect the tree after a failed commit");
        RetryDecision::GiveUp
    });
    if decision == RetryDecision::GiveUp {
        return Err(WorkflowError::CommitFailed { detail: first.detail() });
    }

    reporter.warn("Commit hooks modified files; restaging and retrying once");
    client.stage_all()?;
    match client.commit(message) {
        Ok(()) => {
            info!(attempts = MAX_COMMIT_ATTEMPTS, "commit succeeded after hook retry");
            Ok(MAX_COMMIT_ATTEMPTS)
        }
        Err(error) => {
            warn!(%error, "commit retry failed; giving up");
            Err(WorkflowError::CommitFailed { detail: error.detail() })
        }
    }
}
