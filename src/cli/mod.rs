//! CLI module - argument parsing and subcommands

mod args;
pub mod coverage;

pub use args::*;
