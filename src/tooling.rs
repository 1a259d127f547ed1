//! Tooling & Integration Layer
//!
//! The command-line front end over the library operations.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
