//! Project wire types

use crate::types::Labels;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a project (`lifecycleState` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    /// Normal state
    Active,
    /// Marked for deletion; can still be undeleted
    DeleteRequested,
    /// Deletion has started and cannot be undone
    DeleteInProgress,
    /// Unknown or unset
    #[default]
    #[serde(other)]
    LifecycleStateUnspecified,
}

impl LifecycleState {
    /// Value as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Active => "ACTIVE",
            LifecycleState::DeleteRequested => "DELETE_REQUESTED",
            LifecycleState::DeleteInProgress => "DELETE_IN_PROGRESS",
            LifecycleState::LifecycleStateUnspecified => "LIFECYCLE_STATE_UNSPECIFIED",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the organization or folder that owns a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceId {
    /// Resource type, e.g. `organization`
    #[serde(rename = "type")]
    pub kind: String,
    /// Resource identifier
    pub id: String,
}

impl ResourceId {
    /// Create a resource reference
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Organization parent
    pub fn organization(id: impl Into<String>) -> Self {
        Self::new("organization", id)
    }

    /// Folder parent
    pub fn folder(id: impl Into<String>) -> Self {
        Self::new("folder", id)
    }
}

/// JSON representation of a project resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResource {
    pub project_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_number: Option<String>,

    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<LifecycleState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ResourceId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
}

/// Body of `POST /projects`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateProjectBody<'a> {
    pub project_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub labels: &'a Labels,
}

/// Body of `PUT /projects/{id}`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateProjectBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub labels: &'a Labels,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<&'a ResourceId>,
}
