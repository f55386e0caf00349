//! Pagination module
//!
//! Token-based pagination over list endpoints.
//!
//! # Overview
//!
//! A list call returns one `Page` at a time: a batch of items plus an opaque
//! `nextPageToken`. `ItemIterator` chains those pages into one lazy sequence
//! of domain objects, converting raw items through a per-resource
//! `ItemConverter` and honouring an optional cap on the number of results.
//!
//! ```rust,ignore
//! let mut projects = client.list_projects(None, Some(50))?;
//! while let Some(project) = projects.next().await? {
//!     println!("{}", project.project_id());
//! }
//! ```

mod iterator;
mod page;

pub use iterator::{
    IteratorState, ItemIterator, ListOptions, MAX_RESULTS_PARAM, PAGE_TOKEN_PARAM,
};
pub use page::{ItemConverter, Page, NEXT_PAGE_TOKEN_KEY};
