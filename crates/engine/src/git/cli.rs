use std::path::{Path, PathBuf};

use reposync_common::state::{CommitSummary, StatusEntry};
use tracing::debug;

use super::client::{GitError, Upstream, VcsClient};
use super::executor::{CommandExecutor, CommandResult, ProcessCommandExecutor};
use super::porcelain;

const GIT: &str = "git";

// Network operations must fail instead of waiting on a credential prompt.
const NO_PROMPT: (&str, &str) = ("GIT_TERMINAL_PROMPT", "0");
// `rebase --continue` must not open an editor for the commit message.
const NO_EDITOR: (&str, &str) = ("GIT_EDITOR", "true");

/// `VcsClient` backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli<E = ProcessCommandExecutor> {
    repo_path: PathBuf,
    executor: E,
}

impl GitCli<ProcessCommandExecutor> {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self { repo_path: repo_path.into(), executor: ProcessCommandExecutor }
    }
}

impl<E: CommandExecutor> GitCli<E> {
    pub fn with_executor(repo_path: impl Into<PathBuf>, executor: E) -> Self {
        Self { repo_path: repo_path.into(), executor }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        self.run_with_env(args, &[])
    }

    fn run_with_env(&self, args: &[&str], envs: &[(&str, &str)]) -> Result<String, GitError> {
        let (command, result) = self.invoke(args, envs)?;
        if result.success {
            return Ok(result.stdout);
        }

        Err(GitError::CommandFailed {
            command,
            code: result.code,
            stderr: result.error_text().to_string(),
        })
    }

    // Runs the command without treating a non-zero exit as an error.
    fn invoke(
        &self,
        args: &[&str],
        envs: &[(&str, &str)],
    ) -> Result<(String, CommandResult), GitError> {
        let command = format!("{GIT} {}", args.join(" "));
        let owned: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        debug!(%command, cwd = %self.repo_path.display(), "running git");

        let result = self.executor.execute(GIT, &owned, envs, &self.repo_path).map_err(|error| {
            GitError::SpawnFailed { command: command.clone(), message: error.to_string() }
        })?;
        debug!(%command, success = result.success, code = ?result.code, "git finished");
        Ok((command, result))
    }

    // `Ok(None)` when git ran but exited non-zero.
    fn optional_line(&self, args: &[&str]) -> Result<Option<String>, GitError> {
        let (_, result) = self.invoke(args, &[])?;
        if !result.success {
            return Ok(None);
        }
        let line = result.stdout.trim();
        Ok((!line.is_empty()).then(|| line.to_string()))
    }

    // `git config --get` exits 1 for an unset key.
    fn config_value(&self, key: &str) -> Result<Option<String>, GitError> {
        self.optional_line(&["config", "--get", key])
    }

    fn marker_exists(&self, name: &str) -> Result<bool, GitError> {
        let path = self.run(&["rev-parse", "--git-path", name])?;
        Ok(self.repo_path.join(path.trim()).exists())
    }
}

impl<E: CommandExecutor> VcsClient for GitCli<E> {
    fn is_repository(&self) -> bool {
        matches!(
            self.run(&["rev-parse", "--is-inside-work-tree"]),
            Ok(stdout) if stdout.trim() == "true"
        )
    }

    fn repository_root(&self) -> Result<PathBuf, GitError> {
        let root = self.run(&["rev-parse", "--show-toplevel"])?;
        Ok(PathBuf::from(root.trim()))
    }

    fn rebase_in_progress(&self) -> Result<bool, GitError> {
        Ok(self.marker_exists("rebase-merge")? || self.marker_exists("rebase-apply")?)
    }

    fn current_branch(&self) -> Result<Option<String>, GitError> {
        self.optional_line(&["symbolic-ref", "--quiet", "--short", "HEAD"])
    }

    fn status(&self) -> Result<Vec<StatusEntry>, GitError> {
        let stdout = self.run(&["status", "--porcelain=v1", "-z", "--untracked-files=all"])?;
        Ok(porcelain::parse_status(&stdout))
    }

    fn stage_all(&self) -> Result<(), GitError> {
        self.run(&["add", "--all"]).map(drop)
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run(&["commit", "-m", message]).map(drop)
    }

    fn fetch(&self, remote: &str) -> Result<(), GitError> {
        self.run_with_env(&["fetch", remote], &[NO_PROMPT]).map(drop)
    }

    fn pull_rebase(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        self.run_with_env(&["pull", "--rebase", remote, branch], &[NO_PROMPT, NO_EDITOR]).map(drop)
    }

    fn rebase_continue(&self) -> Result<(), GitError> {
        self.run_with_env(&["rebase", "--continue"], &[NO_EDITOR]).map(drop)
    }

    fn rebase_abort(&self) -> Result<(), GitError> {
        self.run(&["rebase", "--abort"]).map(drop)
    }

    fn push(&self, remote: &str, local_branch: &str, remote_branch: &str) -> Result<(), GitError> {
        let refspec = if local_branch == remote_branch {
            local_branch.to_string()
        } else {
            format!("{local_branch}:{remote_branch}")
        };
        self.run_with_env(&["push", "--set-upstream", remote, &refspec], &[NO_PROMPT]).map(drop)
    }

    fn upstream(&self, branch: &str) -> Result<Option<Upstream>, GitError> {
        let remote = self.config_value(&format!("branch.{branch}.remote"))?;
        let merge = self.config_value(&format!("branch.{branch}.merge"))?;
        let (Some(remote), Some(merge)) = (remote, merge) else {
            return Ok(None);
        };
        // "." tracks a local branch; there is no remote to talk to.
        if remote == "." {
            return Ok(None);
        }

        let remote_branch = merge.strip_prefix("refs/heads/").unwrap_or(&merge);
        let conventional = Upstream::conventional(&remote, remote_branch);
        // Custom fetch refspecs map the branch elsewhere; ask git where.
        let symbolic = format!("{branch}@{{upstream}}");
        match self.optional_line(&["rev-parse", "--symbolic-full-name", &symbolic])? {
            Some(tracking_ref) => Ok(Some(Upstream { tracking_ref, ..conventional })),
            None => Ok(Some(conventional)),
        }
    }

    fn resolve_ref(&self, reference: &str) -> Result<Option<String>, GitError> {
        let revision = format!("{reference}^{{commit}}");
        self.optional_line(&["rev-parse", "--verify", "--quiet", &revision])
    }

    fn merge_base(&self, left: &str, right: &str) -> Result<Option<String>, GitError> {
        self.optional_line(&["merge-base", left, right])
    }

    fn count_commits(&self, range: &str) -> Result<u32, GitError> {
        let stdout = self.run(&["rev-list", "--count", range])?;
        stdout.trim().parse().map_err(|_| GitError::UnexpectedOutput {
            command: format!("{GIT} rev-list --count {range}"),
            output: stdout.trim().to_string(),
        })
    }

    fn unmerged_paths(&self) -> Result<Vec<String>, GitError> {
        let stdout = self.run(&["diff", "--name-only", "-z", "--diff-filter=U"])?;
        Ok(porcelain::parse_paths(&stdout))
    }

    fn remote_reachable(&self, remote: &str) -> bool {
        self.run_with_env(&["ls-remote", "--heads", remote], &[NO_PROMPT]).is_ok()
    }

    fn recent_history(&self, limit: usize) -> Result<Vec<CommitSummary>, GitError> {
        // An unborn branch has no history yet.
        if self.resolve_ref("HEAD")?.is_none() {
            return Ok(Vec::new());
        }
        let count = format!("--max-count={limit}");
        let stdout = self.run(&["log", &count, "--format=%h%x09%s"])?;
        Ok(porcelain::parse_history(&stdout))
    }
}
