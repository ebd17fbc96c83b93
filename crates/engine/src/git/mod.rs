// Version-control client: capability trait, git process implementation, output parsers.

pub mod cli;
pub mod client;
pub mod executor;
pub mod porcelain;

pub use cli::GitCli;
pub use client::{GitError, HookSignal, Upstream, VcsClient};
