// src/probes/reddit.rs
use crate::probes::{Probe, ProbeContext};
use crate::types::{OsintError, ProbeInfo, ProbeResult, QueryType};
use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RedditAbout {
    data: RedditUser,
}

#[derive(Debug, Deserialize)]
struct RedditUser {
    name: String,
    link_karma: Option<i64>,
    comment_karma: Option<i64>,
    created_utc: Option<f64>,
    #[serde(default)]
    is_suspended: bool,
}

/// Reddit `about.json` profile lookup.
#[derive(Debug, Clone)]
pub struct RedditProbe {
    name: String,
    api_base: String,
}

impl RedditProbe {
    pub fn new(api_base: &str) -> Self {
        Self {
            name: "Reddit".to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn summarize(user: &RedditUser) -> String {
        if user.is_suspended {
            return format!("u/{} (suspended)", user.name);
        }
        let mut parts = vec![format!("u/{}", user.name)];
        if let Some(karma) = user.link_karma {
            parts.push(format!("Link karma: {}", karma));
        }
        if let Some(karma) = user.comment_karma {
            parts.push(format!("Comment karma: {}", karma));
        }
        if let Some(created) = user
            .created_utc
            .and_then(|ts| chrono::DateTime::from_timestamp(ts as i64, 0))
        {
            parts.push(format!("Joined: {}", created.format("%Y-%m-%d")));
        }
        parts.join(", ")
    }
}

#[async_trait]
impl Probe for RedditProbe {
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
        ctx.session.check_rate_limit("reddit").await;

        let encoded = urlencoding::encode(username);
        let url = format!("{}/user/{}/about.json", self.api_base, encoded);
        let profile_url = format!("https://www.reddit.com/user/{}", encoded);

        let response = ctx.session.get(&url).await?;
        let status = response.status();
        debug!("[{}] {} -> {}", self.name, url, status);

        match status {
            StatusCode::OK => {
                let about: RedditAbout = response
                    .json()
                    .await
                    .map_err(|e| OsintError::ParseError(format!("Reddit about payload: {}", e)))?;
                if about.data.is_suspended {
                    return Ok(ProbeResult::warning(&self.name, Self::summarize(&about.data), Some(profile_url)));
                }
                Ok(ProbeResult::success(&self.name, Self::summarize(&about.data), Some(profile_url)))
            }
            StatusCode::NOT_FOUND => Ok(ProbeResult::error(&self.name, "User not found", None)),
            StatusCode::TOO_MANY_REQUESTS => Ok(ProbeResult::warning(
                &self.name,
                "Rate limited by Reddit (HTTP 429)",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::tests_support::offline_context;
    use crate::types::ProbeStatus;

    #[tokio::test]
    async fn test_existing_user() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/user/spez/about.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"kind":"t2","data":{"name":"spez","link_karma":1500,"comment_karma":700,"created_utc":1118030400.0}}"#)
            .create_async()
            .await;

        let probe = RedditProbe::new(&server.url());
        let result = probe.run("spez", &offline_context()).await.unwrap();

        assert_eq!(result.status, ProbeStatus::Success);
        assert_eq!(result.data, "u/spez, Link karma: 1500, Comment karma: 700, Joined: 2005-06-06");
        assert_eq!(result.url.as_deref(), Some("https://www.reddit.com/user/spez"));
    }

    #[tokio::test]
    async fn test_suspended_user_is_warning() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/user/gone/about.json")
            .with_status(200)
            .with_body(r#"{"kind":"t2","data":{"name":"gone","is_suspended":true}}"#)
            .create_async()
            .await;

        let probe = RedditProbe::new(&server.url());
        let result = probe.run("gone", &offline_context()).await.unwrap();
        assert_eq!(result.status, ProbeStatus::Warning);
        assert!(result.data.contains("suspended"));
    }

    #[tokio::test]
    async fn test_missing_user() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/user/nobody/about.json")
            .with_status(404)
            .create_async()
            .await;

        let probe = RedditProbe::new(&server.url());
        let result = probe.run("nobody", &offline_context()).await.unwrap();
        assert_eq!(result.status, ProbeStatus::Error);
    }
}
