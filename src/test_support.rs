//! In-memory transport for unit tests

use crate::error::{Error, Result};
use crate::http::{ApiRequest, ApiResponse, Connection, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays canned responses in order and records every request
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a 200 response
    pub fn push_ok(&self, body: Value) -> &Self {
        self.push(Ok(ApiResponse::ok(body)))
    }

    /// Queue a response with an explicit status
    pub fn push_status(&self, status: u16, body: Value) -> &Self {
        self.push(Ok(ApiResponse::new(status, body)))
    }

    /// Queue a transport failure
    pub fn push_err(&self, err: Error) -> &Self {
        self.push(Err(err))
    }

    fn push(&self, response: Result<ApiResponse>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn connection(self: &Arc<Self>) -> Connection {
        Connection::new(self.clone())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(Error::Other(format!(
                "unexpected request: {} {}",
                request.method, request.path
            )))
        })
    }
}
