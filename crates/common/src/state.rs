// Repository state as reported by the version-control client.
//
// Everything here is computed fresh per invocation and discarded at exit.

use serde::{Deserialize, Serialize};

/// Relationship between local history and its upstream counterpart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Divergence {
    Synced,
    /// Upstream has commits the local branch lacks.
    Behind,
    /// Local branch has commits upstream lacks.
    Ahead,
    /// Both sides have unique commits.
    Diverged,
    /// A ref could not be resolved (no upstream, detached HEAD, unborn branch).
    Unknown,
}

impl Divergence {
    /// Classify from the local head, the upstream head and their merge-base.
    ///
    /// Any missing input yields `Unknown`.
    pub fn classify(local: Option<&str>, remote: Option<&str>, base: Option<&str>) -> Self {
        let (Some(local), Some(remote), Some(base)) = (local, remote, base) else {
            return Self::Unknown;
        };

        if local == remote {
            Self::Synced
        } else if local == base {
            Self::Behind
        } else if remote == base {
            Self::Ahead
        } else {
            Self::Diverged
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Synced => "synced",
            Self::Behind => "behind",
            Self::Ahead => "ahead",
            Self::Diverged => "diverged",
            Self::Unknown => "unknown",
        }
    }

    /// One-line human description.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Synced => "up to date with remote",
            Self::Behind => "behind remote (run sync)",
            Self::Ahead => "ahead of remote (run push)",
            Self::Diverged => "diverged from remote (run sync to rebase)",
            Self::Unknown => "no comparable upstream",
        }
    }
}

/// Snapshot of the repository taken by the state inspector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoState {
    /// Current branch, or `"HEAD"` when detached.
    pub branch: String,
    pub detached: bool,
    /// Any staged, unstaged or untracked change.
    pub is_dirty: bool,
    pub rebase_in_progress: bool,
    /// Remote the upstream branch lives on.
    pub remote: String,
    /// Upstream short name, e.g. `origin/develop`; `None` when detached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
    pub remote_reachable: bool,
    pub divergence: Divergence,
}

/// One entry of the client's short status (`XY path`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusEntry {
    /// Index (staged) column.
    pub index: char,
    /// Working-tree column.
    pub worktree: char,
    pub path: String,
}

impl StatusEntry {
    pub fn is_untracked(&self) -> bool {
        self.index == '?' && self.worktree == '?'
    }

    /// Unmerged entries: either side `U`, or both added / both deleted.
    pub fn is_unmerged(&self) -> bool {
        self.index == 'U'
            || self.worktree == 'U'
            || (self.index == 'A' && self.worktree == 'A')
            || (self.index == 'D' && self.worktree == 'D')
    }

    /// True when the working tree differs from the index for this path.
    ///
    /// Untracked files count; changes that are only staged do not.
    pub fn has_worktree_change(&self) -> bool {
        self.worktree != ' '
    }

    /// Two-letter status code as printed by the client.
    pub fn code(&self) -> String {
        format!("{}{}", self.index, self.worktree)
    }
}

/// One line of recent history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitSummary {
    /// Abbreviated commit id.
    pub id: String,
    pub subject: String,
}

/// Extended, read-only view shown by `status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub entries: Vec<StatusEntry>,
    pub history: Vec<CommitSummary>,
}
