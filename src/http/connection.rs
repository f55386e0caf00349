//! Status handling on top of a transport
//!
//! `Connection` is the cheap, cloneable handle every API object shares. It
//! turns non-success statuses into errors: 404 becomes `Error::NotFound`,
//! anything else outside 2xx becomes `Error::HttpStatus`.

use super::transport::{ApiRequest, HttpTransport, Transport};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Shared handle to a transport
#[derive(Clone)]
pub struct Connection {
    transport: Arc<dyn Transport>,
}

impl Connection {
    /// Wrap an existing transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Build an HTTP connection from config
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Execute a request and return the decoded body of a 2xx response
    pub async fn api_request(&self, request: ApiRequest) -> Result<Value> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.transport.execute(request).await?;

        if response.is_success() {
            return Ok(response.body);
        }

        warn!("{} {} failed with {}", method, path, response.status);

        if response.status == 404 {
            return Err(Error::not_found(path));
        }

        Err(Error::http_status(
            response.status,
            error_message(&response.body),
        ))
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").finish_non_exhaustive()
    }
}

/// Pull a readable message out of an error body
fn error_message(body: &Value) -> String {
    if let Some(message) = body
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return message.to_string();
    }

    match body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod connection_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_from_api_error() {
        let body = json!({
            "error": {
                "code": 403,
                "message": "The caller does not have permission",
                "status": "PERMISSION_DENIED"
            }
        });
        assert_eq!(error_message(&body), "The caller does not have permission");
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(&json!("plain text")), "plain text");
        assert_eq!(error_message(&json!({"detail": 1})), "{\"detail\":1}");
    }
}
