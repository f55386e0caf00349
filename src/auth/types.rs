//! Auth configuration types
//!
//! These types describe the credentials bound into the transport. They are
//! built directly, or loaded from a config file or a service-account key.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

/// Default OAuth2 token endpoint
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scope required by the Resource Manager API
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Lifetime requested for service-account assertions
pub const ASSERTION_LIFETIME_SECONDS: i64 = 3600;

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// No authentication (local emulators, tests)
    #[default]
    None,

    /// Pre-issued OAuth2 access token
    Bearer {
        /// The bearer token
        token: String,
    },

    /// API key, sent as the `key` query parameter
    ApiKey {
        /// The API key value
        value: String,
    },

    /// User credentials exchanged through the refresh token flow
    Oauth2Refresh {
        /// Token endpoint URL
        token_url: String,
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Refresh token
        refresh_token: String,
    },

    /// Service account signing its own RS256 assertion
    ServiceAccount {
        /// Service account email (`iss` claim)
        client_email: String,
        /// Private key (PEM format)
        private_key: String,
        /// Token endpoint (`aud` claim and exchange URL)
        token_uri: String,
        /// Requested scopes
        scopes: Vec<String>,
        /// Account to impersonate with domain-wide delegation
        subject: Option<String>,
    },
}

impl AuthConfig {
    /// Bearer token auth
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// API key auth
    pub fn api_key(value: impl Into<String>) -> Self {
        Self::ApiKey {
            value: value.into(),
        }
    }

    /// Load a service-account JSON key file
    pub fn from_service_account_file(path: impl AsRef<Path>) -> Result<Self> {
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
        Self::from_service_account_json(&content)
    }

    /// Parse a service-account JSON key
    pub fn from_service_account_json(json: &str) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_str(json)?;
        key.into_auth_config()
    }

    /// Check if requests carry no credentials
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Service-account key file contents
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Key type, must be `service_account`
    #[serde(rename = "type")]
    pub key_type: String,
    /// Owning project
    #[serde(default)]
    pub project_id: Option<String>,
    /// Service account email
    pub client_email: String,
    /// PEM private key
    pub private_key: String,
    /// Token endpoint
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Convert into an auth config with the cloud-platform scope
    pub fn into_auth_config(self) -> Result<AuthConfig> {
        if self.key_type != "service_account" {
            return Err(Error::invalid_value(
                "type",
                format!("expected 'service_account', got '{}'", self.key_type),
            ));
        }

        Ok(AuthConfig::ServiceAccount {
            client_email: self.client_email,
            private_key: self.private_key,
            token_uri: self
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            scopes: vec![CLOUD_PLATFORM_SCOPE.to_string()],
            subject: None,
        })
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}
