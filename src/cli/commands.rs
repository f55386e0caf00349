//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Resource Manager projects CLI
#[derive(Parser, Debug)]
#[command(name = "resource-manager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Bearer token, overriding the configured credentials
    #[arg(short, long, global = true, env = "RESOURCE_MANAGER_TOKEN")]
    pub token: Option<String>,

    /// API base URL, overriding the configured one
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List projects
    List {
        /// Filter criterion as key=value (repeatable), e.g. labels.env=prod
        #[arg(short, long = "filter", value_parser = parse_key_value)]
        filters: Vec<(String, String)>,

        /// Page size hint sent to the server
        #[arg(long)]
        page_size: Option<u32>,

        /// Stop after this many projects
        #[arg(long)]
        max_results: Option<usize>,
    },

    /// Show a single project
    Get {
        /// Project ID
        project_id: String,
    },

    /// Create a project
    Create {
        /// Project ID
        project_id: String,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Label as key=value (repeatable)
        #[arg(short, long = "label", value_parser = parse_key_value)]
        labels: Vec<(String, String)>,
    },

    /// Mark a project for deletion
    Delete {
        /// Project ID
        project_id: String,
    },

    /// Restore a project marked for deletion
    Undelete {
        /// Project ID
        project_id: String,
    },
}

/// Parse a `key=value` argument
pub fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}
