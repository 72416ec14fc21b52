pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompareArgs, OutputFormat, PlanArgs, RequestArgs, Verbosity};
