// CLI argument parsing and command dispatch.

use std::io::{self, IsTerminal};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use reposync_common::action::{ActionRequest, Verb};
use reposync_engine::config::{GlobalConfig, RepoConfig};
use reposync_engine::dispatch::Controller;
use reposync_engine::git::{GitCli, VcsClient};
use reposync_engine::report::SilentReporter;

use crate::exit_code::ExitCode;
use crate::output::{self, OutputFormat, Style, TerminalReporter};

pub mod status;

#[derive(Debug, Parser)]
#[command(
    name = "reposync",
    version,
    about = "Save, sync and publish git work in one step",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Print the result as one JSON object instead of human output.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stage every change and commit it
    Save(MessageArgs),
    /// Save, sync with the remote, then push the current branch
    Push(MessageArgs),
    /// Fetch the remote and rebase local commits onto it
    Sync,
    /// Show branch, remote and working tree state
    Status,
    /// Diagnose the repository without changing anything
    Check,
    /// Continue a rebase after conflicts are fixed and staged
    Resolve,
    /// Abandon the in-progress rebase
    Abort,
}

#[derive(Debug, Args)]
pub struct MessageArgs {
    /// Commit message; multiple words are joined with spaces.
    message: Vec<String>,
}

impl MessageArgs {
    fn joined(&self) -> Option<String> {
        if self.message.is_empty() {
            None
        } else {
            Some(self.message.join(" "))
        }
    }
}

impl Command {
    pub fn request(&self) -> ActionRequest {
        match self {
            Self::Save(args) => ActionRequest::new(Verb::Save, args.joined()),
            Self::Push(args) => ActionRequest::new(Verb::Push, args.joined()),
            Self::Sync => ActionRequest::new(Verb::Sync, None),
            Self::Status => ActionRequest::new(Verb::Status, None),
            Self::Check => ActionRequest::new(Verb::Check, None),
            Self::Resolve => ActionRequest::new(Verb::Resolve, None),
            Self::Abort => ActionRequest::new(Verb::Abort, None),
        }
    }
}

/// Colour for this run, from the global config, the terminal and `NO_COLOR`.
pub fn detect_style() -> Style {
    Style::detect(GlobalConfig::load().color, io::stderr().is_terminal())
}

pub fn run(cli: Cli, style: Style) -> anyhow::Result<ExitCode> {
    let format = OutputFormat::from_flag(cli.json);
    let request = cli.command.request();

    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    let client = GitCli::new(&cwd);
    // Outside a repository the dispatcher reports the error; defaults are enough.
    let config = match client.repository_root() {
        Ok(root) => RepoConfig::load(&root),
        Err(error) => {
            debug!(%error, "no repository root; using default repository config");
            RepoConfig::default()
        }
    };

    let result = match format {
        OutputFormat::Json => Controller::new(client, config, SilentReporter).dispatch(&request),
        OutputFormat::Human => {
            Controller::new(client, config, TerminalReporter::new(style)).dispatch(&request)
        }
    };

    output::print_result(format, style, &result)?;
    Ok(ExitCode::from_result(&result))
}
