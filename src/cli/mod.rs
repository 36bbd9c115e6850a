//! CLI argument parsing and command dispatch.

pub mod args;
pub mod config;
pub mod interface;
pub mod predict;
pub mod run;

pub use args::{Cli, Commands, OutputFormat};
