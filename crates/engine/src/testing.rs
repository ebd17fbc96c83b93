// Scripted version-control client and recording reporter for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use reposync_common::state::{CommitSummary, StatusEntry};

use crate::git::{GitError, HookSignal, Upstream, VcsClient};
use crate::report::Reporter;

const MUTATING: [&str; 7] =
    ["stage_all", "commit", "fetch", "pull_rebase", "push", "rebase_continue", "rebase_abort"];

pub(crate) struct FakeVcs {
    repository: bool,
    branch: Option<String>,
    rebasing: Cell<bool>,
    reachable: bool,
    // Each status query pops the front; the last snapshot repeats.
    status: RefCell<VecDeque<Vec<StatusEntry>>>,
    status_error: Option<GitError>,
    tracking: Option<Upstream>,
    refs: RefCell<HashMap<String, String>>,
    merge_base: Option<String>,
    incoming: u32,
    commits: RefCell<VecDeque<Result<(), GitError>>>,
    hook: HookSignal,
    fetch_error: Option<GitError>,
    pull_conflicts: Option<Vec<String>>,
    push_error: Option<GitError>,
    continue_error: Option<GitError>,
    abort_error: Option<GitError>,
    unmerged: RefCell<Vec<String>>,
    history: Vec<CommitSummary>,
    calls: RefCell<Vec<String>>,
    // `remote branch` arguments of fetch, pull and push, in call order.
    targets: RefCell<Vec<String>>,
}

pub(crate) fn command_failed(stderr: &str) -> GitError {
    GitError::CommandFailed { command: "git".into(), code: Some(1), stderr: stderr.into() }
}

fn entries(raw: &[(char, char, &str)]) -> Vec<StatusEntry> {
    raw.iter()
        .map(|(index, worktree, path)| StatusEntry {
            index: *index,
            worktree: *worktree,
            path: path.to_string(),
        })
        .collect()
}

impl FakeVcs {
    /// A clean repository on `main` with a reachable `origin`.
    pub(crate) fn new() -> Self {
        Self {
            repository: true,
            branch: Some("main".into()),
            rebasing: Cell::new(false),
            reachable: true,
            status: RefCell::new(VecDeque::from([Vec::new()])),
            status_error: None,
            tracking: None,
            refs: RefCell::default(),
            merge_base: None,
            incoming: 0,
            commits: RefCell::default(),
            hook: HookSignal::Unavailable,
            fetch_error: None,
            pull_conflicts: None,
            push_error: None,
            continue_error: None,
            abort_error: None,
            unmerged: RefCell::default(),
            history: Vec::new(),
            calls: RefCell::default(),
            targets: RefCell::default(),
        }
    }

    pub(crate) fn not_a_repository(mut self) -> Self {
        self.repository = false;
        self
    }

    pub(crate) fn detached(mut self) -> Self {
        self.branch = None;
        self
    }

    pub(crate) fn on_branch(mut self, branch: &str) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub(crate) fn rebasing(self) -> Self {
        self.rebasing.set(true);
        self
    }

    pub(crate) fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    /// Replace the status script with a single repeating snapshot.
    pub(crate) fn with_status(self, raw: &[(char, char, &str)]) -> Self {
        *self.status.borrow_mut() = VecDeque::from([entries(raw)]);
        self
    }

    /// Append a snapshot returned by a later status query.
    pub(crate) fn then_status(self, raw: &[(char, char, &str)]) -> Self {
        self.status.borrow_mut().push_back(entries(raw));
        self
    }

    pub(crate) fn failing_status(mut self, stderr: &str) -> Self {
        self.status_error = Some(command_failed(stderr));
        self
    }

    /// The current branch tracks `branch` on `remote`.
    pub(crate) fn tracking(mut self, remote: &str, branch: &str) -> Self {
        self.tracking = Some(Upstream::conventional(remote, branch));
        self
    }

    pub(crate) fn with_ref(self, reference: &str, id: &str) -> Self {
        self.refs.borrow_mut().insert(reference.into(), id.into());
        self
    }

    pub(crate) fn with_merge_base(mut self, id: &str) -> Self {
        self.merge_base = Some(id.into());
        self
    }

    /// Commits waiting upstream (`HEAD..upstream`).
    pub(crate) fn with_incoming(mut self, count: u32) -> Self {
        self.incoming = count;
        self
    }

    /// Results for successive commit attempts; unscripted attempts succeed.
    pub(crate) fn with_commits(self, results: Vec<Result<(), GitError>>) -> Self {
        *self.commits.borrow_mut() = results.into();
        self
    }

    pub(crate) fn with_hook_signal(mut self, hook: HookSignal) -> Self {
        self.hook = hook;
        self
    }

    pub(crate) fn failing_fetch(mut self, stderr: &str) -> Self {
        self.fetch_error = Some(command_failed(stderr));
        self
    }

    /// `pull --rebase` stops on conflicts in these paths (empty: plain failure).
    pub(crate) fn pull_conflicts(mut self, paths: &[&str]) -> Self {
        self.pull_conflicts = Some(paths.iter().map(|p| p.to_string()).collect());
        self
    }

    pub(crate) fn failing_push(mut self, stderr: &str) -> Self {
        self.push_error = Some(command_failed(stderr));
        self
    }

    pub(crate) fn failing_continue(mut self, stderr: &str) -> Self {
        self.continue_error = Some(command_failed(stderr));
        self
    }

    pub(crate) fn failing_abort(mut self, stderr: &str) -> Self {
        self.abort_error = Some(command_failed(stderr));
        self
    }

    pub(crate) fn with_unmerged(self, paths: &[&str]) -> Self {
        *self.unmerged.borrow_mut() = paths.iter().map(|p| p.to_string()).collect();
        self
    }

    pub(crate) fn with_history(mut self, raw: &[(&str, &str)]) -> Self {
        self.history = raw
            .iter()
            .map(|(id, subject)| CommitSummary { id: id.to_string(), subject: subject.to_string() })
            .collect();
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|call| call.as_str() == name).count()
    }

    pub(crate) fn mutating_calls(&self) -> Vec<String> {
        self.calls().into_iter().filter(|call| MUTATING.contains(&call.as_str())).collect()
    }

    pub(crate) fn targets(&self) -> Vec<String> {
        self.targets.borrow().clone()
    }

    fn record(&self, name: &str) {
        self.calls.borrow_mut().push(name.to_string());
    }
}

impl VcsClient for FakeVcs {
    fn is_repository(&self) -> bool {
        self.record("is_repository");
        self.repository
    }

    fn repository_root(&self) -> Result<PathBuf, GitError> {
        self.record("repository_root");
        Ok(PathBuf::from("/tmp/repo"))
    }

    fn rebase_in_progress(&self) -> Result<bool, GitError> {
        self.record("rebase_in_progress");
        Ok(self.rebasing.get())
    }

    fn current_branch(&self) -> Result<Option<String>, GitError> {
        self.record("current_branch");
        Ok(self.branch.clone())
    }

    fn status(&self) -> Result<Vec<StatusEntry>, GitError> {
        self.record("status");
        if let Some(error) = self.status_error.clone() {
            return Err(error);
        }
        let mut script = self.status.borrow_mut();
        if script.len() > 1 {
            Ok(script.pop_front().unwrap_or_default())
        } else {
            Ok(script.front().cloned().unwrap_or_default())
        }
    }

    fn stage_all(&self) -> Result<(), GitError> {
        self.record("stage_all");
        Ok(())
    }

    fn commit(&self, _message: &str) -> Result<(), GitError> {
        self.record("commit");
        self.commits.borrow_mut().pop_front().unwrap_or(Ok(()))
    }

    fn hook_signal(&self) -> HookSignal {
        self.record("hook_signal");
        self.hook
    }

    fn fetch(&self, remote: &str) -> Result<(), GitError> {
        self.record("fetch");
        self.targets.borrow_mut().push(format!("fetch {remote}"));
        self.fetch_error.clone().map_or(Ok(()), Err)
    }

    fn pull_rebase(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        self.record("pull_rebase");
        self.targets.borrow_mut().push(format!("pull {remote} {branch}"));
        match &self.pull_conflicts {
            None => Ok(()),
            Some(paths) => {
                if !paths.is_empty() {
                    self.rebasing.set(true);
                    *self.unmerged.borrow_mut() = paths.clone();
                }
                Err(command_failed("CONFLICT (content): Merge conflict"))
            }
        }
    }

    fn rebase_continue(&self) -> Result<(), GitError> {
        self.record("rebase_continue");
        match self.continue_error.clone() {
            Some(error) => Err(error),
            None => {
                self.rebasing.set(false);
                Ok(())
            }
        }
    }

    fn rebase_abort(&self) -> Result<(), GitError> {
        self.record("rebase_abort");
        match self.abort_error.clone() {
            Some(error) => Err(error),
            None => {
                self.rebasing.set(false);
                self.unmerged.borrow_mut().clear();
                Ok(())
            }
        }
    }

    fn push(&self, remote: &str, local_branch: &str, remote_branch: &str) -> Result<(), GitError> {
        self.record("push");
        self.targets.borrow_mut().push(format!("push {remote} {local_branch}:{remote_branch}"));
        self.push_error.clone().map_or(Ok(()), Err)
    }

    fn upstream(&self, _branch: &str) -> Result<Option<Upstream>, GitError> {
        self.record("upstream");
        Ok(self.tracking.clone())
    }

    fn resolve_ref(&self, reference: &str) -> Result<Option<String>, GitError> {
        self.record("resolve_ref");
        Ok(self.refs.borrow().get(reference).cloned())
    }

    fn merge_base(&self, _left: &str, _right: &str) -> Result<Option<String>, GitError> {
        self.record("merge_base");
        Ok(self.merge_base.clone())
    }

    fn count_commits(&self, _range: &str) -> Result<u32, GitError> {
        self.record("count_commits");
        Ok(self.incoming)
    }

    fn unmerged_paths(&self) -> Result<Vec<String>, GitError> {
        self.record("unmerged_paths");
        Ok(self.unmerged.borrow().clone())
    }

    fn remote_reachable(&self, _remote: &str) -> bool {
        self.record("remote_reachable");
        self.reachable
    }

    fn recent_history(&self, limit: usize) -> Result<Vec<CommitSummary>, GitError> {
        self.record("recent_history");
        Ok(self.history.iter().take(limit).cloned().collect())
    }
}

/// Keeps every progress line as `level: message`.
#[derive(Default)]
pub(crate) struct RecordingReporter {
    lines: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub(crate) fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|line| line.contains(needle))
    }

    fn push(&self, level: &str, message: &str) {
        self.lines.borrow_mut().push(format!("{level}: {message}"));
    }
}

impl Reporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.push("step", message);
    }

    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn success(&self, message: &str) {
        self.push("success", message);
    }

    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
}
