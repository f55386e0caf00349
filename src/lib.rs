// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Resource Manager
//!
//! An async client for the Cloud Resource Manager projects API.
//!
//! ## Features
//!
//! - **Projects**: create, fetch, update, delete and undelete
//! - **Lazy Listing**: token-paginated iteration that fetches one page at a time
//! - **Server-side Filters**: `name`, `id` and `labels.<key>` criteria
//! - **Multiple Auth Types**: Bearer, API key, OAuth2 refresh, service account
//! - **YAML Configuration**: with `{{ env.NAME }}` interpolation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use resource_manager::{Client, ClientConfig, ProjectFilter, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::new(ClientConfig::from_file("resource-manager.yaml")?)?;
//!
//!     let filter = ProjectFilter::new().label("environment", "prod");
//!     let mut projects = client.list_projects(Some(&filter), Some(100))?;
//!     while let Some(project) = projects.next().await? {
//!         println!("{} {:?}", project.project_id(), project.status());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Client: new_project()  fetch_project()  list_projects()        │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴───────────┬─────────────────────┐
//! │   Project    │        Pagination         │        HTTP         │
//! ├──────────────┼───────────────────────────┼─────────────────────┤
//! │ create       │ ItemIterator (lazy pages) │ Connection (status) │
//! │ reload       │ Page (items + token)      │ Transport (reqwest) │
//! │ update       │ ItemConverter             │ Auth, Rate Limit    │
//! │ (un)delete   │                           │                     │
//! └──────────────┴───────────────────────────┴─────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// Transport, connection and rate limiting
pub mod http;

/// Token-based pagination
pub mod pagination;

/// Project resources and filters
pub mod project;

/// API client
pub mod client;

/// Client configuration
pub mod config;

/// Template interpolation
pub mod template;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::AuthConfig;
pub use client::Client;
pub use config::ClientConfig;
pub use pagination::{ItemIterator, ListOptions, Page};
pub use project::{LifecycleState, Project, ProjectFilter, ProjectIterator, ResourceId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
