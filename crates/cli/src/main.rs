// reposync CLI entry point.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_code;
mod output;

use commands::Cli;
use exit_code::ExitCode;
use output::OutputFormat;

fn main() -> process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return ExitCode::from_parse_error(error.kind()).into();
        }
    };

    let format = OutputFormat::from_flag(cli.json);
    let style = commands::detect_style();
    match commands::run(cli, style) {
        Ok(code) => code.into(),
        Err(error) => {
            output::print_anyhow_error(format, style, &error);
            ExitCode::Failure.into()
        }
    }
}
