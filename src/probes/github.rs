// src/probes/github.rs
use crate::probes::{Probe, ProbeContext};
use crate::types::{OsintError, ProbeInfo, ProbeResult, QueryType};
use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
    name: Option<String>,
    public_repos: Option<u64>,
    followers: Option<u64>,
    html_url: Option<String>,
    created_at: Option<String>,
}

/// GitHub public user API lookup.
#[derive(Debug, Clone)]
pub struct GitHubProbe {
    name: String,
    api_base: String,
    api_keys: Vec<String>,
}

impl GitHubProbe {
    pub fn new(api_base: &str) -> Self {
        Self {
            name: "GitHub".to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_keys: Vec::new(),
        }
    }

    pub fn with_api_keys(mut self, keys: Vec<String>) -> Self {
        self.api_keys = keys;
        self
    }

    fn get_random_api_key(&self) -> Option<&String> {
        if self.api_keys.is_empty() {
            None
        } else {
            use rand::seq::SliceRandom;
            let mut rng = rand::thread_rng();
            self.api_keys.choose(&mut rng)
        }
    }

    fn summarize(user: &GitHubUser) -> String {
        let mut parts = vec![format!("Login: {}", user.login)];
        if let Some(name) = user.name.as_deref().filter(|n| !n.is_empty()) {
            parts.push(format!("Name: {}", name));
        }
        if let Some(repos) = user.public_repos {
            parts.push(format!("Public repos: {}", repos));
        }
        if let Some(followers) = user.followers {
            parts.push(format!("Followers: {}", followers));
        }
        if let Some(created) = user.created_at.as_deref() {
            parts.push(format!("Joined: {}", created.split('T').next().unwrap_or(created)));
        }
        parts.join(", ")
    }
}

#[async_trait]
impl Probe for GitHubProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> ProbeInfo {
        ProbeInfo {
            name: self.name.clone(),
            query_type: QueryType::Social,
            uses_network: true,
        }
    }

    async fn run(&self, username: &str, ctx: &ProbeContext) -> Result<ProbeResult, OsintError> {
        ctx.session.check_rate_limit("github").await;

        let url = format!("{}/users/{}", self.api_base, urlencoding::encode(username));
        let mut request = ctx
            .session
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = self.get_random_api_key() {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request.send().await.map_err(|e| OsintError::ProbeError {
            probe_name: self.name.clone(),
            message: format!("HTTP request failed: {}", e),
        })?;

        let status = response.status();
        debug!("[{}] {} -> {}", self.name, url, status);

        match status {
            StatusCode::OK => {
                let user: GitHubUser = response
                    .json()
                    .await
                    .map_err(|e| OsintError::ParseError(format!("GitHub user payload: {}", e)))?;
                let profile_url = user
                    .html_url
                    .clone()
                    .unwrap_or_else(|| format!("https://github.com/{}", user.login));
                Ok(ProbeResult::success(&self.name, Self::summarize(&user), Some(profile_url)))
            }
            StatusCode::NOT_FOUND => Ok(ProbeResult::error(&self.name, "User not found", None)),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Ok(ProbeResult::warning(
                &self.name,
                format!("Rate limited by GitHub (HTTP {})", status.as_u16()),
                None,
            )),
            other => Ok(ProbeResult::error(
                &self.name,
                format!("Unexpected response (HTTP {})", other.as_u16()),
                None,
            )),
        }
    }
}
