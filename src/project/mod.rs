//! Project resources
//!
//! A `Project` holds the metadata of one Cloud project together with a handle
//! to the `Client` that produced it, so it can reload, update, delete and
//! undelete itself.
//!
//! ```rust,ignore
//! let mut project = client.new_project("my-project", Some("My Project"), None);
//! project.create().await?;
//! project.labels.insert("env".into(), "prod".into());
//! project.update().await?;
//! ```

mod filter;
mod types;

pub use filter::{ProjectFilter, MATCH_ANY};
pub use types::{LifecycleState, ProjectResource, ResourceId};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::http::ApiRequest;
use crate::pagination::{ItemConverter, ItemIterator};
use crate::types::{Labels, Method};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};
use types::{CreateProjectBody, UpdateProjectBody};

/// Collection path for projects
pub const PROJECTS_PATH: &str = "/projects";

/// Response key holding listed projects
pub const PROJECTS_KEY: &str = "projects";

/// Iterator returned by `Client::list_projects`
pub type ProjectIterator = ItemIterator<ProjectConverter>;

/// A project bound to a client
#[derive(Clone)]
pub struct Project {
    client: Client,
    project_id: String,
    /// Display name
    pub name: Option<String>,
    /// User labels
    pub labels: Labels,
    /// Owning organization or folder
    pub parent: Option<ResourceId>,
    number: Option<String>,
    status: Option<LifecycleState>,
    create_time: Option<DateTime<Utc>>,
}

impl Project {
    /// Create a local project; nothing is sent to the API
    pub fn new(
        project_id: impl Into<String>,
        client: &Client,
        name: Option<String>,
        labels: Option<Labels>,
    ) -> Self {
        Self {
            client: client.clone(),
            project_id: project_id.into(),
            name,
            labels: labels.unwrap_or_default(),
            parent: None,
            number: None,
            status: None,
            create_time: None,
        }
    }

    /// Build a project from its JSON representation
    pub fn from_api_repr(resource: Value, client: &Client) -> Result<Self> {
        let resource: ProjectResource = serde_json::from_value(resource)
            .map_err(|e| Error::decode(format!("Invalid project resource: {e}")))?;
        let mut project = Self::new(resource.project_id.clone(), client, None, None);
        project.apply_resource(resource);
        Ok(project)
    }

    /// Overwrite local metadata from an API response
    pub fn set_properties_from_api_repr(&mut self, resource: Value) -> Result<()> {
        let resource: ProjectResource = serde_json::from_value(resource)
            .map_err(|e| Error::decode(format!("Invalid project resource: {e}")))?;
        self.apply_resource(resource);
        Ok(())
    }

    fn apply_resource(&mut self, resource: ProjectResource) {
        self.name = resource.name;
        self.number = resource.project_number;
        self.labels = resource.labels;
        self.status = resource.lifecycle_state;
        if resource.parent.is_some() {
            self.parent = resource.parent;
        }
        self.create_time = resource.create_time;
    }

    /// Project ID
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Numeric identifier assigned by the server
    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    /// Lifecycle state, once loaded
    pub fn status(&self) -> Option<LifecycleState> {
        self.status
    }

    /// Creation time, once loaded
    pub fn create_time(&self) -> Option<DateTime<Utc>> {
        self.create_time
    }

    /// The client this project is bound to
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Resource path, e.g. `/projects/my-project`
    pub fn path(&self) -> String {
        format!("{PROJECTS_PATH}/{}", self.project_id)
    }

    /// JSON representation of the local state
    pub fn to_api_repr(&self) -> ProjectResource {
        ProjectResource {
            project_id: self.project_id.clone(),
            name: self.name.clone(),
            project_number: self.number.clone(),
            labels: self.labels.clone(),
            lifecycle_state: self.status,
            parent: self.parent.clone(),
            create_time: self.create_time,
        }
    }

    /// Create the project on the server
    pub async fn create(&mut self) -> Result<()> {
        let body = CreateProjectBody {
            project_id: &self.project_id,
            name: self.name.as_deref(),
            labels: &self.labels,
        };
        let request = ApiRequest::new(Method::POST, PROJECTS_PATH).json(serde_json::to_value(body)?);

        let response = self.client.connection().api_request(request).await?;
        info!("Created project {}", self.project_id);
        self.set_properties_from_api_repr(response)
    }

    /// Refresh local metadata from the server
    ///
    /// Fails with `Error::NotFound` if the project does not exist.
    pub async fn reload(&mut self) -> Result<()> {
        let response = self
            .client
            .connection()
            .api_request(ApiRequest::get(self.path()))
            .await?;
        debug!("Reloaded project {}", self.project_id);
        self.set_properties_from_api_repr(response)
    }

    /// Check whether the project exists on the server
    pub async fn exists(&self) -> Result<bool> {
        match self
            .client
            .connection()
            .api_request(ApiRequest::get(self.path()))
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Push the name, labels and parent to the server
    pub async fn update(&mut self) -> Result<()> {
        let body = UpdateProjectBody {
            name: self.name.as_deref(),
            labels: &self.labels,
            parent: self.parent.as_ref(),
        };
        let request = ApiRequest::new(Method::PUT, self.path()).json(serde_json::to_value(body)?);

        let response = self.client.connection().api_request(request).await?;
        info!("Updated project {}", self.project_id);
        self.set_properties_from_api_repr(response)
    }

    /// Mark the project for deletion, optionally reloading its state
    pub async fn delete(&mut self, reload: bool) -> Result<()> {
        self.client
            .connection()
            .api_request(ApiRequest::new(Method::DELETE, self.path()))
            .await?;
        info!("Requested deletion of project {}", self.project_id);

        if reload {
            self.reload().await?;
        }
        Ok(())
    }

    /// Restore a project marked for deletion, optionally reloading its state
    pub async fn undelete(&mut self, reload: bool) -> Result<()> {
        let path = format!("{}:undelete", self.path());
        self.client
            .connection()
            .api_request(ApiRequest::new(Method::POST, path).json(Value::Object(Default::default())))
            .await?;
        info!("Undeleted project {}", self.project_id);

        if reload {
            self.reload().await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("project_id", &self.project_id)
            .field("name", &self.name)
            .field("number", &self.number)
            .field("labels", &self.labels)
            .field("status", &self.status)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.to_api_repr() == other.to_api_repr()
    }
}

/// Turns listed project resources into `Project`s bound to a client
#[derive(Debug, Clone)]
pub struct ProjectConverter {
    client: Client,
}

impl ProjectConverter {
    /// Create a converter binding projects to `client`
    pub fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
        }
    }
}

impl ItemConverter for ProjectConverter {
    type Item = Project;

    fn convert(&self, raw: Value) -> Result<Project> {
        Project::from_api_repr(raw, &self.client)
    }
}
