// Exit codes for the reposync CLI.
//
//   0 = success, `--help`, `--version`
//   1 = any failed action, unknown or missing verb

use std::process;

use clap::error::ErrorKind;
use reposync_common::action::ActionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Failure = 1,
}

impl ExitCode {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_result(result: &ActionResult) -> Self {
        if result.exit_code == ActionResult::SUCCESS_EXIT_CODE {
            Self::Success
        } else {
            Self::Failure
        }
    }

    /// Argument errors exit 1 (not clap's 2); help and version exit 0.
    pub fn from_parse_error(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Self::Success,
            _ => Self::Failure,
        }
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code.code())
    }
}
