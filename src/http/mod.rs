//! HTTP module
//!
//! Request execution against the Resource Manager REST API.
//!
//! # Features
//!
//! - **Transport seam**: `Transport` trait, reqwest-backed `HttpTransport`
//! - **Status mapping**: `Connection` surfaces 404 as `Error::NotFound`
//! - **Rate Limiting**: optional token bucket limiter using governor
//! - **Authentication**: integration with the auth module

mod connection;
mod rate_limit;
mod transport;

pub use connection::Connection;
pub use rate_limit::{QuotaPeriod, RateLimiter, RateLimiterConfig};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
