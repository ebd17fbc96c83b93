// Requests accepted by the workflow controller and the results it produces.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::state::{RepoState, StatusSnapshot};

/// The fixed set of workflow verbs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    Save,
    Push,
    Sync,
    Status,
    Check,
    Resolve,
    Abort,
}

impl Verb {
    pub const ALL: [Verb; 7] = [
        Verb::Save,
        Verb::Push,
        Verb::Sync,
        Verb::Status,
        Verb::Check,
        Verb::Resolve,
        Verb::Abort,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Push => "push",
            Self::Sync => "sync",
            Self::Status => "status",
            Self::Check => "check",
            Self::Resolve => "resolve",
            Self::Abort => "abort",
        }
    }

    /// Verbs that refuse to run without a commit message.
    pub fn requires_message(self) -> bool {
        matches!(self, Self::Save | Self::Push)
    }

    /// Verbs that rewrite local history and are refused mid-rebase.
    pub fn blocked_during_rebase(self) -> bool {
        matches!(self, Self::Save | Self::Sync | Self::Push)
    }
}

impl Display for Verb {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verb plus its optional message. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    verb: Verb,
    message: Option<String>,
}

impl ActionRequest {
    /// Build a request. A message that is blank after trimming counts as absent.
    pub fn new(verb: Verb, message: Option<String>) -> Self {
        let message = message
            .map(|raw| raw.trim().to_string())
            .filter(|trimmed| !trimmed.is_empty());
        Self { verb, message }
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Error taxonomy surfaced to the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad or missing input; reported before any client call.
    Input,
    /// Not a repository, unreachable remote, detached HEAD.
    Environment,
    /// Merge/rebase conflicts; never auto-resolved.
    Conflict,
    /// A client operation failed outright.
    Operation,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Environment => "environment",
            Self::Conflict => "conflict",
            Self::Operation => "operation",
        }
    }
}

/// Details of a failed action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Failure {
    pub kind: ErrorKind,
    /// Stable machine-readable code, e.g. `COMMIT_FAILED`.
    pub code: String,
    pub message: String,
    /// Suggested next step for the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    /// Paths involved (conflicting files).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

/// Outcome of one dispatched action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionResult {
    pub verb: Verb,
    pub succeeded: bool,
    pub exit_code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RepoState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<StatusSnapshot>,
}

impl ActionResult {
    pub const SUCCESS_EXIT_CODE: i32 = 0;
    pub const FAILURE_EXIT_CODE: i32 = 1;

    pub fn success(verb: Verb, message: impl Into<String>) -> Self {
        Self {
            verb,
            succeeded: true,
            exit_code: Self::SUCCESS_EXIT_CODE,
            message: message.into(),
            failure: None,
            state: None,
            snapshot: None,
        }
    }

    pub fn failed(verb: Verb, failure: Failure) -> Self {
        Self {
            verb,
            succeeded: false,
            exit_code: Self::FAILURE_EXIT_CODE,
            message: failure.message.clone(),
            failure: Some(failure),
            state: None,
            snapshot: None,
        }
    }

    pub fn with_state(mut self, state: RepoState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_snapshot(mut self, snapshot: StatusSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}
