// reposync engine: repository inspection, action workflows, and dispatch.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod git;
pub mod inspector;
pub mod report;
pub mod retry;
pub mod workflow;

#[cfg(test)]
mod testing;
