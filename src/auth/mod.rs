//! Authentication module
//!
//! Supports: Bearer token, API key, OAuth2 refresh token, service account
//!
//! The `Authenticator` applies credentials to outgoing requests and caches
//! access tokens for the flows that have to mint them.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{
    AuthConfig, CachedToken, ServiceAccountKey, ASSERTION_LIFETIME_SECONDS, CLOUD_PLATFORM_SCOPE,
    DEFAULT_TOKEN_URI,
};
