// Capability interface over the version-control client.
//
// The workflow only talks to this trait; `GitCli` is the production
// implementation and tests substitute a scripted fake.

use std::path::PathBuf;

use reposync_common::state::{CommitSummary, StatusEntry};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitError {
    #[error("failed to run `{command}`: {message}")]
    SpawnFailed { command: String, message: String },
    #[error("`{command}` failed with code {code:?}: {}", stderr.trim())]
    CommandFailed { command: String, code: Option<i32>, stderr: String },
    #[error("`{command}` produced unexpected output: {output}")]
    UnexpectedOutput { command: String, output: String },
}

impl GitError {
    /// The client's own error text, without the command prefix.
    pub fn detail(&self) -> String {
        match self {
            GitError::SpawnFailed { message, .. } => message.clone(),
            GitError::CommandFailed { stderr, .. } => stderr.trim().to_string(),
            GitError::UnexpectedOutput { output, .. } => output.clone(),
        }
    }
}

/// Remote branch a local branch is compared with, fetched from and pushed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    pub remote: String,
    /// Branch name on the remote, without `refs/heads/`.
    pub branch: String,
    /// Local remote-tracking ref holding the last fetched tip.
    pub tracking_ref: String,
}

impl Upstream {
    /// Same-named branch on `remote` under the default fetch refspec.
    pub fn conventional(remote: &str, branch: &str) -> Self {
        Self {
            remote: remote.to_string(),
            branch: branch.to_string(),
            tracking_ref: format!("refs/remotes/{remote}/{branch}"),
        }
    }

    /// Short display form, e.g. `origin/main`.
    pub fn short_name(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }
}

/// What the client knows about hooks that ran during the last commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookSignal {
    /// A hook rewrote tracked files.
    ModifiedFiles,
    /// Hooks ran and left the tree untouched.
    Unmodified,
    /// The client cannot tell; callers fall back to inspecting the tree.
    Unavailable,
}

pub trait VcsClient {
    /// Whether the working directory is inside a work tree.
    fn is_repository(&self) -> bool;

    fn repository_root(&self) -> Result<PathBuf, GitError>;

    /// Whether a rebase has stopped and awaits `--continue` / `--abort`.
    fn rebase_in_progress(&self) -> Result<bool, GitError>;

    /// Current branch name; `None` when HEAD is detached.
    fn current_branch(&self) -> Result<Option<String>, GitError>;

    fn status(&self) -> Result<Vec<StatusEntry>, GitError>;

    /// Stage every change in the working tree, including deletions and new files.
    fn stage_all(&self) -> Result<(), GitError>;

    fn commit(&self, message: &str) -> Result<(), GitError>;

    /// Hook observation for the most recent failed commit.
    fn hook_signal(&self) -> HookSignal {
        HookSignal::Unavailable
    }

    fn fetch(&self, remote: &str) -> Result<(), GitError>;

    fn pull_rebase(&self, remote: &str, branch: &str) -> Result<(), GitError>;

    fn rebase_continue(&self) -> Result<(), GitError>;

    fn rebase_abort(&self) -> Result<(), GitError>;

    /// Publish `local_branch` as `remote_branch` and record it as the upstream.
    fn push(&self, remote: &str, local_branch: &str, remote_branch: &str) -> Result<(), GitError>;

    /// Tracking configuration of `branch`; `None` when it tracks no remote branch.
    fn upstream(&self, branch: &str) -> Result<Option<Upstream>, GitError>;

    /// Commit id a ref points at; `None` when it does not resolve.
    fn resolve_ref(&self, reference: &str) -> Result<Option<String>, GitError>;

    /// Most recent common ancestor; `None` when the histories are unrelated.
    fn merge_base(&self, left: &str, right: &str) -> Result<Option<String>, GitError>;

    /// Number of commits in a revision range such as `HEAD..origin/main`.
    fn count_commits(&self, range: &str) -> Result<u32, GitError>;

    fn unmerged_paths(&self) -> Result<Vec<String>, GitError>;

    fn remote_reachable(&self, remote: &str) -> bool;

    /// Newest-first summaries of up to `limit` commits reachable from HEAD.
    fn recent_history(&self, limit: usize) -> Result<Vec<CommitSummary>, GitError>;
}
