//! witsync-cli library: command handlers exposed for tests.

pub mod commands;
pub mod report;
