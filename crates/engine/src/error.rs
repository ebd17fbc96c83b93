// Workflow error taxonomy and its mapping onto user-facing failures.

use reposync_common::action::{ErrorKind, Failure, Verb};
use thiserror::Error;

use crate::git::GitError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("`{verb}` requires a commit message")]
    MissingMessage { verb: Verb },

    #[error("not a git repository (or any of the parent directories)")]
    NotARepository,

    #[error("remote `{remote}` is unreachable")]
    RemoteUnreachable { remote: String },

    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    #[error("a rebase is in progress; `{verb}` is not allowed until it is finished")]
    RebaseInProgress { verb: Verb },

    #[error("rebase stopped on conflicts in {} path(s)", paths.len())]
    MergeConflict { paths: Vec<String> },

    #[error("{} path(s) still have unresolved conflicts", paths.len())]
    UnresolvedConflicts { paths: Vec<String> },

    #[error("commit failed: {detail}")]
    CommitFailed { detail: String },

    #[error("fetch from `{remote}` failed: {detail}")]
    FetchFailed { remote: String, detail: String },

    #[error("pull --rebase failed: {detail}")]
    PullFailed { detail: String },

    #[error("push to `{remote}` failed: {detail}")]
    PushFailed { remote: String, detail: String },

    #[error("rebase --continue failed: {detail}")]
    RebaseContinueFailed { detail: String, paths: Vec<String> },

    #[error("rebase --abort failed: {detail}")]
    RebaseAbortFailed { detail: String },

    #[error(transparent)]
    Git(#[from] GitError),
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingMessage { .. } => ErrorKind::Input,
            Self::NotARepository | Self::RemoteUnreachable { .. } | Self::DetachedHead => {
                ErrorKind::Environment
            }
            Self::RebaseInProgress { .. }
            | Self::MergeConflict { .. }
            | Self::UnresolvedConflicts { .. } => ErrorKind::Conflict,
            Self::CommitFailed { .. }
            | Self::FetchFailed { .. }
            | Self::PullFailed { .. }
            | Self::PushFailed { .. }
            | Self::RebaseContinueFailed { .. }
            | Self::RebaseAbortFailed { .. }
            | Self::Git(_) => ErrorKind::Operation,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingMessage { .. } => "MISSING_MESSAGE",
            Self::NotARepository => "NOT_A_REPOSITORY",
            Self::RemoteUnreachable { .. } => "REMOTE_UNREACHABLE",
            Self::DetachedHead => "DETACHED_HEAD",
            Self::RebaseInProgress { .. } => "REBASE_IN_PROGRESS",
            Self::MergeConflict { .. } => "MERGE_CONFLICT",
            Self::UnresolvedConflicts { .. } => "UNRESOLVED_CONFLICTS",
            Self::CommitFailed { .. } => "COMMIT_FAILED",
            Self::FetchFailed { .. } => "FETCH_FAILED",
            Self::PullFailed { .. } => "PULL_FAILED",
            Self::PushFailed { .. } => "PUSH_FAILED",
            Self::RebaseContinueFailed { .. } => "REBASE_CONTINUE_FAILED",
            Self::RebaseAbortFailed { .. } => "REBASE_ABORT_FAILED",
            Self::Git(_) => "GIT_ERROR",
        }
    }

    /// Next step to suggest to the user.
    pub fn remediation(&self) -> Option<String> {
        let hint = match self {
            Self::MissingMessage { verb } => format!("Run: reposync {verb} \"<message>\""),
            Self::NotARepository => "Run reposync inside a git working tree".to_string(),
            Self::RemoteUnreachable { remote } => {
                format!("Check the network and `git remote -v` for `{remote}`, then retry")
            }
            Self::DetachedHead => "Run: git switch <branch>".to_string(),
            Self::RebaseInProgress { .. } => {
                "Finish with: reposync resolve, or give up with: reposync abort".to_string()
            }
            Self::MergeConflict { .. } | Self::RebaseContinueFailed { .. } => {
                "Fix the conflicts, `git add` each file, then run: reposync resolve \
                 (or reposync abort to undo)"
                    .to_string()
            }
            Self::UnresolvedConflicts { .. } => {
                "Stage each resolved file with `git add`, then run: reposync resolve".to_string()
            }
            Self::CommitFailed { .. } => {
                "Fix the problem reported by the commit hooks, then run save again".to_string()
            }
            Self::PushFailed { .. } => {
                "Your commit is saved locally; run: reposync sync, then push again".to_string()
            }
            Self::FetchFailed { .. } | Self::PullFailed { .. } => {
                "Check the remote and retry: reposync sync".to_string()
            }
            Self::RebaseAbortFailed { .. } => "Run: reposync status".to_string(),
            Self::Git(_) => return None,
        };
        Some(hint)
    }

    pub fn paths(&self) -> &[String] {
        match self {
            Self::MergeConflict { paths }
            | Self::UnresolvedConflicts { paths }
            | Self::RebaseContinueFailed { paths, .. } => paths,
            _ => &[],
        }
    }

    pub fn to_failure(&self) -> Failure {
        Failure {
            kind: self.kind(),
            code: self.code().to_string(),
            message: self.to_string(),
            remediation: self.remediation(),
            paths: self.paths().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_message_is_an_input_error() {
        let error = WorkflowError::MissingMessage { verb: Verb::Save };
        assert_eq!(error.kind(), ErrorKind::Input);
        assert_eq!(error.to_string(), "`save` requires a commit message");
        assert_eq!(error.remediation().as_deref(), Some("Run: reposync save \"<message>\""));
    }

    #[test]
    fn conflict_failure_lists_paths_and_points_at_resolve() {
        let error = WorkflowError::MergeConflict { paths: vec!["README.md".into()] };
        let failure = error.to_failure();
        assert_eq!(failure.kind, ErrorKind::Conflict);
        assert_eq!(failure.code, "MERGE_CONFLICT");
        assert_eq!(failure.paths, vec!["README.md"]);
        assert!(failure.remediation.unwrap().contains("reposync resolve"));
    }

    #[test]
    fn environment_errors_are_classified() {
        assert_eq!(WorkflowError::NotARepository.kind(), ErrorKind::Environment);
        assert_eq!(
            WorkflowError::RemoteUnreachable { remote: "origin".into() }.kind(),
            ErrorKind::Environment
        );
        assert_eq!(WorkflowError::DetachedHead.kind(), ErrorKind::Environment);
    }

    #[test]
    fn rebase_in_progress_points_at_resolve_or_abort() {
        let hint = WorkflowError::RebaseInProgress { verb: Verb::Sync }.remediation().unwrap();
        assert!(hint.contains("reposync resolve"));
        assert!(hint.contains("reposync abort"));
    }

    #[test]
    fn raw_git_errors_are_operation_errors_without_hint() {
        let error = WorkflowError::from(GitError::SpawnFailed {
            command: "git status".into(),
            message: "not found".into(),
        });
        assert_eq!(error.kind(), ErrorKind::Operation);
        assert_eq!(error.code(), "GIT_ERROR");
        assert!(error.remediation().is_none());
    }
}
