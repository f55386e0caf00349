//! Client-side request throttling
//!
//! API quotas are stated as requests per minute (or per second for short
//! bursts). The limiter delays requests before they are sent so a client
//! stays under its quota; it never retries a failed request.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Window a quota is counted over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaPeriod {
    Second,
    #[default]
    Minute,
}

/// Request quota enforced before sending
///
/// ```yaml
/// rate_limit:
///   requests: 600
///   per: minute
///   burst: 20
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Requests allowed per period
    pub requests: u32,
    #[serde(default)]
    pub per: QuotaPeriod,
    /// Requests that may go out back to back; defaults to one
    #[serde(default)]
    pub burst: Option<u32>,
}

impl RateLimiterConfig {
    /// Quota of `requests` per second with the given burst
    pub fn per_second(requests: u32, burst: u32) -> Self {
        Self {
            requests,
            per: QuotaPeriod::Second,
            burst: Some(burst),
        }
    }

    /// Quota of `requests` per minute with the given burst
    pub fn per_minute(requests: u32, burst: u32) -> Self {
        Self {
            requests,
            per: QuotaPeriod::Minute,
            burst: Some(burst),
        }
    }

    fn quota(&self) -> Quota {
        let requests = NonZeroU32::new(self.requests).unwrap_or(NonZeroU32::MIN);
        let burst = self
            .burst
            .and_then(NonZeroU32::new)
            .unwrap_or(NonZeroU32::MIN);

        let quota = match self.per {
            QuotaPeriod::Second => Quota::per_second(requests),
            QuotaPeriod::Minute => Quota::per_minute(requests),
        };
        quota.allow_burst(burst)
    }
}

/// Shared quota gate used by the HTTP transport
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            limiter: Arc::new(Governor::direct(config.quota())),
            config: config.clone(),
        }
    }

    /// Wait for a permit
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Take a permit if one is free right now
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("requests", &self.config.requests)
            .field("per", &self.config.per)
            .field("burst", &self.config.burst)
            .finish_non_exhaustive()
    }
}
