//! Resource Manager client
//!
//! `Client` is a cheap, cloneable handle bundling the connection every API
//! call goes through. Projects produced by a client keep a clone of it.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{Connection, Transport};
use crate::pagination::{ItemIterator, ListOptions};
use crate::project::{
    Project, ProjectConverter, ProjectFilter, ProjectIterator, PROJECTS_KEY, PROJECTS_PATH,
};
use crate::types::Labels;
use std::sync::Arc;
use tracing::debug;

/// Query parameter carrying the filter expression
pub const FILTER_PARAM: &str = "filter";

/// Query parameter carrying the page size hint
pub const PAGE_SIZE_PARAM: &str = "pageSize";

/// Client for the Resource Manager API
#[derive(Clone, Debug)]
pub struct Client {
    connection: Connection,
}

impl Client {
    /// Create a client talking HTTP according to `config`
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_connection(Connection::from_config(config)?))
    }

    /// Create a client over a custom transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::from_connection(Connection::new(transport))
    }

    /// Create a client from an existing connection
    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    /// The connection used for API calls
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Create a project bound to this client without calling the API
    ///
    /// Use `Project::reload` to fetch its metadata or `Project::create` to
    /// create it.
    pub fn new_project(
        &self,
        project_id: impl Into<String>,
        name: Option<&str>,
        labels: Option<Labels>,
    ) -> Project {
        Project::new(project_id, self, name.map(String::from), labels)
    }

    /// Fetch an existing project by ID
    ///
    /// Fails with `Error::NotFound` if the project does not exist.
    pub async fn fetch_project(&self, project_id: impl Into<String>) -> Result<Project> {
        let mut project = Project::new(project_id, self, None, None);
        project.reload().await?;
        Ok(project)
    }

    /// List the projects visible to this client
    ///
    /// `filter` is sent verbatim as the server-side filter expression and
    /// `page_size` as an advisory page size. Pages are fetched lazily while
    /// the returned iterator is consumed.
    pub fn list_projects(
        &self,
        filter: Option<&ProjectFilter>,
        page_size: Option<u32>,
    ) -> Result<ProjectIterator> {
        self.list_projects_with(filter, page_size, ListOptions::new())
    }

    /// List projects, also setting a start token or result cap
    pub fn list_projects_with(
        &self,
        filter: Option<&ProjectFilter>,
        page_size: Option<u32>,
        mut options: ListOptions,
    ) -> Result<ProjectIterator> {
        if let Some(size) = page_size {
            options = options.param(PAGE_SIZE_PARAM, size.to_string());
        }

        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            options = options.param(FILTER_PARAM, filter.to_query());
        }

        debug!("Listing projects with params {:?}", options.extra_params);

        ItemIterator::new(
            self.connection.clone(),
            PROJECTS_PATH,
            PROJECTS_KEY,
            ProjectConverter::new(self),
            options,
        )
    }
}
