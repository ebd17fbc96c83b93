// State inspector: reads repository state from the client, never mutates it.

use reposync_common::action::Verb;
use reposync_common::state::{Divergence, RepoState};
use tracing::{debug, warn};

use crate::config::RepoConfig;
use crate::error::WorkflowError;
use crate::git::{Upstream, VcsClient};

pub struct Inspector<'a, C: ?Sized> {
    client: &'a C,
    config: &'a RepoConfig,
}

impl<'a, C: VcsClient + ?Sized> Inspector<'a, C> {
    pub fn new(client: &'a C, config: &'a RepoConfig) -> Self {
        Self { client, config }
    }

    pub fn ensure_repository(&self) -> Result<(), WorkflowError> {
        if self.client.is_repository() {
            Ok(())
        } else {
            Err(WorkflowError::NotARepository)
        }
    }

    /// Refuse history-rewriting verbs while a rebase is stopped.
    pub fn ensure_no_rebase(&self, verb: Verb) -> Result<(), WorkflowError> {
        if verb.blocked_during_rebase() && self.client.rebase_in_progress()? {
            return Err(WorkflowError::RebaseInProgress { verb });
        }
        Ok(())
    }

    /// Current branch, or `DetachedHead`.
    pub fn require_branch(&self) -> Result<String, WorkflowError> {
        self.client.current_branch()?.ok_or(WorkflowError::DetachedHead)
    }

    /// Upstream of `branch`: its tracking configuration, else the same-named
    /// branch on the configured remote.
    pub fn upstream(&self, branch: &str) -> Result<Upstream, WorkflowError> {
        match self.client.upstream(branch)? {
            Some(upstream) => {
                debug!(branch, upstream = %upstream.short_name(), "branch tracks upstream");
                Ok(upstream)
            }
            None => Ok(Upstream::conventional(&self.config.remote, branch)),
        }
    }

    /// Full inspection. Only `NotARepository` and client failures are fatal.
    pub fn inspect(&self) -> Result<RepoState, WorkflowError> {
        self.ensure_repository()?;

        let rebase_in_progress = self.client.rebase_in_progress()?;
        let branch = self.client.current_branch()?;
        let is_dirty = !self.client.status()?.is_empty();
        let upstream = branch.as_deref().map(|branch| self.upstream(branch)).transpose()?;
        let remote = upstream
            .as_ref()
            .map_or_else(|| self.config.remote.clone(), |upstream| upstream.remote.clone());
        let remote_reachable = self.client.remote_reachable(&remote);
        let divergence = match &upstream {
            Some(upstream) => self.divergence(upstream),
            None => Divergence::Unknown,
        };

        let state = RepoState {
            detached: branch.is_none(),
            branch: branch.unwrap_or_else(|| "HEAD".to_string()),
            is_dirty,
            rebase_in_progress,
            remote,
            upstream: upstream.as_ref().map(Upstream::short_name),
            remote_reachable,
            divergence,
        };
        debug!(?state, "inspected repository");
        Ok(state)
    }

    /// Compare local HEAD with the upstream's remote-tracking ref.
    ///
    /// Uses whatever was last fetched; unresolvable refs give `Unknown`.
    pub fn divergence(&self, upstream: &Upstream) -> Divergence {
        let tracking = upstream.tracking_ref.as_str();
        let local = self.resolve("HEAD");
        let remote = self.resolve(tracking);
        let base = match (&local, &remote) {
            (Some(_), Some(_)) => self.client.merge_base("HEAD", tracking).unwrap_or_else(|error| {
                warn!(%error, "merge-base lookup failed");
                None
            }),
            _ => None,
        };

        Divergence::classify(local.as_deref(), remote.as_deref(), base.as_deref())
    }

    fn resolve(&self, reference: &str) -> Option<String> {
        self.client.resolve_ref(reference).unwrap_or_else(|error| {
            warn!(reference, %error, "ref lookup failed");
            None
        })
    }
}
