//! Client configuration
//!
//! `ClientConfig` carries everything the HTTP transport needs: endpoint,
//! API version, timeouts, throttling and credentials. It is built in code
//! with `ClientConfig::builder()` or loaded from a YAML file.
//!
//! ```yaml
//! base_url: "https://cloudresourcemanager.googleapis.com"
//! api_version: v1beta1
//! timeout_secs: 30
//! rate_limit:
//!   requests: 600
//!   per: minute
//! auth:
//!   type: bearer
//!   token: "{{ env.GCP_ACCESS_TOKEN }}"
//! ```

use crate::auth::{AuthConfig, CLOUD_PLATFORM_SCOPE, DEFAULT_TOKEN_URI};
use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use crate::template;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Production endpoint of the Resource Manager API
pub const DEFAULT_BASE_URL: &str = "https://cloudresourcemanager.googleapis.com";

/// API version prefixed to every request path
pub const DEFAULT_API_VERSION: &str = "v1beta1";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Runtime Config
// ============================================================================

/// Configuration for the client transport
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (scheme and host)
    pub base_url: String,
    /// API version segment
    pub api_version: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// Optional client-side throttling
    pub rate_limit: Option<RateLimiterConfig>,
    /// Credentials
    pub auth: AuthConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
            default_headers: HashMap::new(),
            rate_limit: None,
            auth: AuthConfig::None,
        }
    }
}

fn default_user_agent() -> String {
    format!("resource-manager/{}", env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML, interpolating `{{ env.NAME }}`
    /// placeholders from the process environment
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::from_yaml_str_with(yaml, |name| std::env::var(name).ok())
    }

    /// Parse configuration from YAML with a custom variable lookup
    pub fn from_yaml_str_with<F>(yaml: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: ConfigFile = serde_yaml::from_str(yaml)?;
        file.resolve(&lookup)
    }

    /// Full URL for an API path such as `/projects`
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the API version
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Enable client-side throttling
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable client-side throttling
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set credentials
    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.config.auth = auth;
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// ============================================================================
// File Format
// ============================================================================

/// On-disk configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub api_version: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub user_agent: Option<String>,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    #[serde(default)]
    pub auth: AuthConfigDef,
}

/// Credentials section of the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfigDef {
    #[default]
    None,

    Bearer {
        token: String,
    },

    ApiKey {
        value: String,
    },

    Oauth2Refresh {
        #[serde(default = "default_token_uri")]
        token_url: String,
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },

    ServiceAccount {
        /// Path to a JSON key file
        key_file: String,
        #[serde(default)]
        scopes: Vec<String>,
        #[serde(default)]
        subject: Option<String>,
    },
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ConfigFile {
    /// Interpolate placeholders and produce the runtime config
    pub fn resolve<F>(self, lookup: &F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let render = |s: &str| template::render(s, lookup);
        let mut config = ClientConfig::default();

        if let Some(url) = self.base_url {
            config.base_url = render(&url)?;
        }
        if let Some(version) = self.api_version {
            config.api_version = version;
        }
        if let Some(secs) = self.timeout_secs {
            if secs == 0 {
                return Err(Error::invalid_value("timeout_secs", "must be positive"));
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = self.user_agent {
            config.user_agent = agent;
        }
        for (key, value) in self.headers {
            config.default_headers.insert(key, render(&value)?);
        }
        config.rate_limit = self.rate_limit;
        config.auth = self.auth.resolve(lookup)?;

        Ok(config)
    }
}

impl AuthConfigDef {
    /// Interpolate placeholders and produce the runtime auth config
    pub fn resolve<F>(self, lookup: &F) -> Result<AuthConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let render = |s: &str| template::render(s, lookup);

        match self {
            AuthConfigDef::None => Ok(AuthConfig::None),
            AuthConfigDef::Bearer { token } => Ok(AuthConfig::bearer(render(&token)?)),
            AuthConfigDef::ApiKey { value } => Ok(AuthConfig::api_key(render(&value)?)),
            AuthConfigDef::Oauth2Refresh {
                token_url,
                client_id,
                client_secret,
                refresh_token,
            } => Ok(AuthConfig::Oauth2Refresh {
                token_url: render(&token_url)?,
                client_id: render(&client_id)?,
                client_secret: render(&client_secret)?,
                refresh_token: render(&refresh_token)?,
            }),
            AuthConfigDef::ServiceAccount {
                key_file,
                scopes,
                subject,
            } => {
                let mut auth = AuthConfig::from_service_account_file(render(&key_file)?)?;
                if let AuthConfig::ServiceAccount {
                    scopes: ref mut key_scopes,
                    subject: ref mut key_subject,
                    ..
                } = auth
                {
                    if !scopes.is_empty() {
                        *key_scopes = scopes;
                    } else if key_scopes.is_empty() {
                        key_scopes.push(CLOUD_PLATFORM_SCOPE.to_string());
                    }
                    *key_subject = subject.map(|s| render(&s)).transpose()?;
                }
                Ok(auth)
            }
        }
    }
}
