// Terminal and JSON rendering for the CLI.
//
// Human mode: progress lines on stderr while the action runs, then the
// result block. `--json`: no progress, one `ActionResult` object on stdout.

use std::io::{self, Write};

use anyhow::Context;
use reposync_common::action::ActionResult;
use reposync_engine::config::ColorMode;
use reposync_engine::report::Reporter;

use crate::commands::status;

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_RESET: &str = "\x1b[0m";

/// Output format for a command result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Human
        }
    }
}

/// Colour choice for one run. Carries no other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    color: bool,
}

impl Style {
    pub const PLAIN: Self = Self { color: false };

    /// Resolve the configured mode against the terminal and `NO_COLOR`.
    pub fn detect(mode: ColorMode, is_tty: bool) -> Self {
        Self::resolve(mode, is_tty, std::env::var_os("NO_COLOR").is_some())
    }

    /// Testable variant that takes the environment explicitly.
    pub fn resolve(mode: ColorMode, is_tty: bool, no_color: bool) -> Self {
        let color = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => is_tty && !no_color,
        };
        Self { color }
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(ANSI_RED, text)
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(ANSI_GREEN, text)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint(ANSI_YELLOW, text)
    }

    pub fn cyan(&self, text: &str) -> String {
        self.paint(ANSI_CYAN, text)
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(ANSI_BOLD, text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(ANSI_DIM, text)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Writes progress to stderr as the action runs.
#[derive(Debug, Clone, Copy)]
pub struct TerminalReporter {
    style: Style,
}

impl TerminalReporter {
    pub fn new(style: Style) -> Self {
        Self { style }
    }

    fn emit(&self, line: String) {
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}

impl Reporter for TerminalReporter {
    fn step(&self, message: &str) {
        self.emit(format!("{} {message}", self.style.cyan("==>")));
    }

    fn info(&self, message: &str) {
        self.emit(format!("    {}", self.style.dim(message)));
    }

    fn success(&self, message: &str) {
        self.emit(format!("{} {message}", self.style.green("ok:")));
    }

    fn warn(&self, message: &str) {
        self.emit(render_labeled(self.style, "warning", message, ANSI_YELLOW));
    }
}

/// Print the final result: JSON on stdout, or the human block on
/// stdout (success) / stderr (failure).
pub fn print_result(
    format: OutputFormat,
    style: Style,
    result: &ActionResult,
) -> anyhow::Result<()> {
    if format == OutputFormat::Human && !result.succeeded {
        let mut err = io::stderr().lock();
        return write_result(&mut err, format, style, result).context("failed to write to stderr");
    }
    let mut out = io::stdout().lock();
    write_result(&mut out, format, style, result).context("failed to write to stdout")
}

/// Write a result to a provided writer (useful for testing).
pub fn write_result<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    style: Style,
    result: &ActionResult,
) -> io::Result<()> {
    match format {
        OutputFormat::Human => writeln!(writer, "{}", render_human(style, result)),
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, result).map_err(io::Error::other)?;
            writeln!(writer)
        }
    }
}

/// Print an error that happened outside any action (I/O, environment).
pub fn print_anyhow_error(format: OutputFormat, style: Style, error: &anyhow::Error) {
    let mut err = io::stderr().lock();
    match format {
        OutputFormat::Human => {
            let _ = writeln!(err, "{}", render_error(style, error));
        }
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "error": {
                    "code": "INTERNAL_ERROR",
                    "message": format!("{error:#}"),
                }
            });
            let _ = serde_json::to_writer(&mut err, &obj);
            let _ = writeln!(err);
        }
    }
}

fn render_error(style: Style, error: &anyhow::Error) -> String {
    render_labeled(style, "error", &format!("{error:#}"), ANSI_RED)
}

pub fn render_human(style: Style, result: &ActionResult) -> String {
    let mut lines = Vec::new();

    match &result.failure {
        None => lines.push(format!("{} {}", style.green("✓"), style.bold(&result.message))),
        Some(failure) => {
            lines.push(render_labeled(style, "error", &failure.message, ANSI_RED));
            if !failure.paths.is_empty() {
                lines.push(format!("  Conflicting paths ({}):", failure.paths.len()));
                lines.extend(failure.paths.iter().map(|path| format!("    {path}")));
            }
            if let Some(remediation) = &failure.remediation {
                lines.push(render_labeled(style, "hint", remediation, ANSI_YELLOW));
            }
        }
    }

    if let Some(state) = &result.state {
        lines.push(String::new());
        lines.push(status::render(style, state, result.snapshot.as_ref()));
    }

    lines.join("\n")
}

fn render_labeled(style: Style, label: &str, message: &str, color: &str) -> String {
    format!("{} {message}", style.paint(color, &format!("{label}:")))
}
