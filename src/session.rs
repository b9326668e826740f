// src/session.rs
use crate::types::{Config, OsintError};
use governor::{Jitter, Quota};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Shared outbound HTTP state: one pooled client plus per-source limiters.
#[derive(Clone)]
pub struct Session {
    pub client: Client,
    rate_limiters: Arc<HashMap<String, Arc<governor::DefaultDirectRateLimiter>>>,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self, OsintError> {
        // Existence checks read the raw status, so redirects are never followed
        let mut client_builder = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(config.connect_timeout())
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10);

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| OsintError::ConfigError(format!("Invalid proxy URL: {}", e)))?;
            client_builder = client_builder.proxy(proxy);
        }

        let client = client_builder
            .build()
            .map_err(|e| OsintError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let mut rate_limiters = HashMap::new();
        for (source, rate_limit) in &config.rate_limits {
            if let Some(limit) = rate_limit.and_then(NonZeroU32::new) {
                let quota = Quota::per_second(limit).allow_burst(NonZeroU32::MIN);
                rate_limiters.insert(source.clone(), Arc::new(governor::RateLimiter::direct(quota)));
            }
        }

        Ok(Session {
            client,
            rate_limiters: Arc::new(rate_limiters),
        })
    }

    /// Wait until the named source may send another request.
    pub async fn check_rate_limit(&self, source: &str) {
        if let Some(limiter) = self.rate_limiters.get(source) {
            limiter
                .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
                .await;
        }
    }

    pub fn has_rate_limit(&self, source: &str) -> bool {
        self.rate_limiters.contains_key(source)
    }

    pub async fn get(&self, url: &str) -> Result<reqwest::Response, OsintError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::classify_send_error(url, e))
    }

    /// Status code of a single GET, body discarded.
    pub async fn status_of(&self, url: &str) -> Result<StatusCode, OsintError> {
        Ok(self.get(url).await?.status())
    }

    fn classify_send_error(url: &str, e: reqwest::Error) -> OsintError {
        if e.is_timeout() {
            OsintError::TimeoutError(format!("{} timed out", crate::utils::host_of(url)))
        } else {
            OsintError::NetworkError(e.to_string())
        }
    }
}
