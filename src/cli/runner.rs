//! CLI runner - executes commands

use crate::auth::AuthConfig;
use crate::cli::commands::{Cli, Commands};
use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::{Result, ResultExt};
use crate::pagination::ListOptions;
use crate::project::{Project, ProjectFilter};
use crate::types::Labels;
use std::io::Write;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, printing results to stdout
    pub async fn run(&self) -> Result<()> {
        let client = Client::new(self.client_config()?)?;
        let mut out = std::io::stdout();
        self.run_with(&client, &mut out).await
    }

    /// Run the CLI command against `client`, writing results to `out`
    pub async fn run_with<W: Write>(&self, client: &Client, out: &mut W) -> Result<()> {
        match &self.cli.command {
            Commands::List {
                filters,
                page_size,
                max_results,
            } => {
                self.list(client, out, filters, *page_size, *max_results)
                    .await
            }
            Commands::Get { project_id } => {
                let project = client.fetch_project(project_id.as_str()).await?;
                write_project(out, &project)
            }
            Commands::Create {
                project_id,
                name,
                labels,
            } => {
                let labels: Labels = labels.iter().cloned().collect();
                let mut project =
                    client.new_project(project_id.as_str(), name.as_deref(), Some(labels));
                project.create().await?;
                write_project(out, &project)
            }
            Commands::Delete { project_id } => {
                let mut project = client.new_project(project_id.as_str(), None, None);
                project.delete(true).await?;
                write_project(out, &project)
            }
            Commands::Undelete { project_id } => {
                let mut project = client.new_project(project_id.as_str(), None, None);
                project.undelete(true).await?;
                write_project(out, &project)
            }
        }
    }

    /// Build the client configuration from the config file and flags
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ClientConfig::default(),
        };

        if let Some(token) = &self.cli.token {
            config.auth = AuthConfig::bearer(token.clone());
        }
        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }

        Ok(config)
    }

    async fn list<W: Write>(
        &self,
        client: &Client,
        out: &mut W,
        filters: &[(String, String)],
        page_size: Option<u32>,
        max_results: Option<usize>,
    ) -> Result<()> {
        let filter: ProjectFilter = filters.iter().cloned().collect();
        let mut options = ListOptions::new();
        if let Some(max) = max_results {
            options = options.max_results(max);
        }

        let mut projects = client.list_projects_with(Some(&filter), page_size, options)?;
        while let Some(project) = projects.next().await? {
            write_project(out, &project)?;
        }

        info!(
            "Listed {} projects over {} pages",
            projects.num_results(),
            projects.page_number()
        );
        Ok(())
    }
}

fn write_project<W: Write>(out: &mut W, project: &Project) -> Result<()> {
    serde_json::to_writer(&mut *out, &project.to_api_repr())?;
    writeln!(out)?;
    Ok(())
}
