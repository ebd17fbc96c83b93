// reposync-common: shared types for the reposync workspace

pub mod action;
pub mod state;
