// src/ratelimit.rs
use crate::types::{OsintError, ServerConfig};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::IpAddr;
use std::num::NonZeroU32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    General,
    Search,
}

impl RouteClass {
    pub fn for_path(path: &str) -> Self {
        if path == "/search" || path == "/api/search" {
            RouteClass::Search
        } else {
            RouteClass::General
        }
    }
}

/// Inbound per-client-IP quotas, one limiter per route class.
pub struct RateLimits {
    general: DefaultKeyedRateLimiter<IpAddr>,
    search: DefaultKeyedRateLimiter<IpAddr>,
}

fn per_minute(count: u32, label: &str) -> Result<Quota, OsintError> {
    NonZeroU32::new(count)
        .map(Quota::per_minute)
        .ok_or_else(|| OsintError::ConfigError(format!("{} rate limit must be greater than 0", label)))
}

impl RateLimits {
    pub fn new(config: &ServerConfig) -> Result<Self, OsintError> {
        Ok(Self {
            general: RateLimiter::keyed(per_minute(config.general_per_minute, "General")?),
            search: RateLimiter::keyed(per_minute(config.search_per_minute, "Search")?),
        })
    }

    /// Charge one request. Search routes pay into both buckets.
    pub fn check(&self, class: RouteClass, client: IpAddr) -> Result<(), OsintError> {
        self.general
            .check_key(&client)
            .map_err(|_| OsintError::RateLimitError("Too many requests".to_string()))?;

        if class == RouteClass::Search {
            self.search
                .check_key(&client)
                .map_err(|_| OsintError::RateLimitError("Too many searches".to_string()))?;
        }
        Ok(())
    }

    /// Drop keys whose buckets have refilled.
    pub fn prune(&self) {
        self.general.retain_recent();
        self.search.retain_recent();
    }

    pub fn tracked_clients(&self) -> usize {
        self.general.len()
    }
}
