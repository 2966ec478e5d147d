pub mod cache;
pub mod commands;
pub mod context;
pub mod help;
pub mod output;
pub mod render;
pub mod shell;

pub use context::{CliError, CliMode, CommandError, CommandResult, ShellContext};
pub use shell::run_cli;
