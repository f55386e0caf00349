//! CLI module
//!
//! Command-line interface over the projects API.
//!
//! # Commands
//!
//! - `list` - List projects, optionally filtered
//! - `get` - Show one project
//! - `create` - Create a project
//! - `delete` - Mark a project for deletion
//! - `undelete` - Restore a project marked for deletion
//!
//! Every command prints projects as JSON, one per line.

mod commands;
mod runner;

pub use commands::{parse_key_value, Cli, Commands};
pub use runner::Runner;

#[cfg(test)]
mod tests;
