// src/probes/profile.rs
use crate::probes::{Probe, ProbeContext};
use crate::types::{OsintError, ProbeInfo, ProbeResult, ProfileTemplate, QueryType};
use crate::utils::fill_template;
use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;

/// Statuses that mean the profile page is there.
pub fn indicates_profile(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK | StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND | StatusCode::SEE_OTHER
    )
}

/// Plain GET against a profile URL template.
#[derive(Debug, Clone)]
pub struct ProfileProbe {
    template: ProfileTemplate,
}

impl ProfileProbe {
    pub fn new(template: ProfileTemplate) -> Self {
        Self { template }
    }
}

#[async_trait]
impl Probe for ProfileProbe {
    fn name(&self) -> &str {
        &self.template.name
    }

    fn info(&self) -> ProbeInfo {
        ProbeInfo {
            name: self.template.name.clone(),
            query_type: QueryType::Social,
            uses_network: true,
        }
    }

    async fn run(&self, username: &str, ctx: &ProbeContext) -> Result<ProbeResult, OsintError> {
        let url = fill_template(&self.template.url, username)?;
        let status = ctx.session.status_of(&url).await?;
        debug!("[{}] {} -> {}", self.template.name, url, status);

        if indicates_profile(status) {
            Ok(ProbeResult::success(&self.template.name, "Profile exists", Some(url)))
        } else {
            Ok(ProbeResult::error(
                &self.template.name,
                format!("Profile not found (HTTP {})", status.as_u16()),
                None,
            ))
        }
    }
}
