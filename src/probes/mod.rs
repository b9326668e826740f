// src/probes/mod.rs
use crate::resolver::DnsLookup;
use crate::session::Session;
use crate::types::{Config, OsintError, ProbeInfo, ProbeResult, QueryType};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

mod crypto;
mod dns;
mod email;
mod github;
mod phone;
mod port;
mod profile;
mod reddit;

pub use crypto::{AddressFormatProbe, ExplorerProbe};
pub use dns::{DnsRecordProbe, SubdomainProbe};
pub use email::{EmailFormatProbe, MailExchangerProbe};
pub use github::GitHubProbe;
pub use phone::{CountryCodeProbe, PhoneFormatProbe};
pub use port::PortProbe;
pub use profile::ProfileProbe;
pub use reddit::RedditProbe;

/// Everything a probe may reach out through.
#[derive(Clone)]
pub struct ProbeContext {
    pub session: Session,
    pub dns: Arc<dyn DnsLookup>,
    pub connect_timeout: Duration,
}

/// One bounded outbound check against one source.
///
/// `run` returns `Err` for failures the dispatcher should record as an
/// `error` result; a probe may also build its own `error` result when it has
/// something more specific to say (a 404, an empty DNS answer).
#[async_trait]
pub trait Probe: Send + Sync {
    fn name(&self) -> &str;
    fn info(&self) -> ProbeInfo;
    async fn run(&self, target: &str, ctx: &ProbeContext) -> Result<ProbeResult, OsintError>;
}

pub type ProbePlan = Vec<Box<dyn Probe>>;

/// Ordered probes for one query type. Order here is the order of results.
pub fn build_plan(query_type: QueryType, config: &Config) -> ProbePlan {
    let mut plan: ProbePlan = Vec::new();

    match query_type {
        QueryType::Social => {
            let github_keys = config.api_keys.get("github").cloned().unwrap_or_default();
            plan.push(Box::new(
                GitHubProbe::new(&config.endpoints.github_api).with_api_keys(github_keys),
            ));
            plan.push(Box::new(RedditProbe::new(&config.endpoints.reddit_api)));
            for template in &config.profiles {
                plan.push(Box::new(ProfileProbe::new(template.clone())));
            }
        }
        QueryType::Email => {
            plan.push(Box::new(EmailFormatProbe::new()));
            plan.push(Box::new(MailExchangerProbe::new()));
        }
        QueryType::Phone => {
            plan.push(Box::new(PhoneFormatProbe::new()));
            plan.push(Box::new(CountryCodeProbe::new()));
        }
        QueryType::Domain => {
            use crate::resolver::RecordKind;
            for kind in [RecordKind::A, RecordKind::Mx, RecordKind::Txt, RecordKind::Ns] {
                plan.push(Box::new(DnsRecordProbe::new(kind)));
            }
            if !config.subdomains.is_empty() {
                plan.push(Box::new(SubdomainProbe::new(config.subdomains.clone())));
            }
            for port in &config.ports {
                plan.push(Box::new(PortProbe::new(*port)));
            }
        }
        QueryType::Crypto => {
            plan.push(Box::new(AddressFormatProbe::new()));
            plan.push(Box::new(ExplorerProbe::new()));
        }
    }

    plan
}

pub fn build_all_plans(config: &Config) -> HashMap<QueryType, ProbePlan> {
    QueryType::ALL
        .iter()
        .map(|query_type| (*query_type, build_plan(*query_type, config)))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    fn names(plan: &ProbePlan) -> Vec<String> {
        plan.iter().map(|p| p.name().to_string()).collect()
    }

    #[test]
    fn test_social_plan_order() {
        let config = Config::default();
        let plan = build_plan(QueryType::Social, &config);
        let names = names(&plan);
        assert_eq!(names[0], "GitHub");
        assert_eq!(names[1], "Reddit");
        assert_eq!(names.len(), 2 + config.profiles.len());
        assert_eq!(names[2], config.profiles[0].name);
    }

    #[test]
    fn test_domain_plan_order() {
        let config = Config::default();
        let plan = build_plan(QueryType::Domain, &config);
        assert_eq!(
            names(&plan),
            vec!["DNS A", "DNS MX", "DNS TXT", "DNS NS", "Subdomains", "Port 80", "Port 443"]
        );
    }

    #[test]
    fn test_offline_plans_never_touch_network() {
        let config = Config::default();
        for query_type in [QueryType::Phone, QueryType::Crypto] {
            for probe in build_plan(query_type, &config) {
                let info = probe.info();
                assert!(!info.uses_network, "{} should be offline", info.name);
                assert_eq!(info.query_type, query_type);
            }
        }
    }

    #[test]
    fn test_all_plans_cover_every_type() {
        let plans = build_all_plans(&Config::default());
        for query_type in QueryType::ALL {
            assert!(!plans[&query_type].is_empty());
        }
    }
}
