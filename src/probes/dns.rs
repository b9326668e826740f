// src/probes/dns.rs
use crate::probes::{Probe, ProbeContext};
use crate::resolver::RecordKind;
use crate::types::{OsintError, ProbeInfo, ProbeResult, QueryType};
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;

/// Turn a lookup outcome into a result record. Empty answers count as errors.
pub(crate) fn records_result(
    platform: &str,
    kind: RecordKind,
    name: &str,
    outcome: Result<Vec<String>, OsintError>,
) -> ProbeResult {
    match outcome {
        Ok(records) if !records.is_empty() => ProbeResult::success(platform, records.join(", "), None),
        Ok(_) => ProbeResult::error(platform, format!("No {} records for {}", kind, name), None),
        Err(e) => ProbeResult::error(platform, e.to_string(), None),
    }
}

/// A single record-type lookup on the queried domain.
#[derive(Debug, Clone)]
pub struct DnsRecordProbe {
    name: String,
    kind: RecordKind,
}

impl DnsRecordProbe {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            name: format!("DNS {}", kind),
            kind,
        }
    }
}

#[async_trait]
impl Probe for DnsRecordProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> ProbeInfo {
        ProbeInfo {
            name: self.name.clone(),
            query_type: QueryType::Domain,
            uses_network: true,
        }
    }

    async fn run(&self, domain: &str, ctx: &ProbeContext) -> Result<ProbeResult, OsintError> {
        let outcome = ctx.dns.lookup(domain, self.kind).await;
        debug!("[{}] {} -> {:?}", self.name, domain, outcome);
        Ok(records_result(&self.name, self.kind, domain, outcome))
    }
}

/// `A` lookups for a fixed list of common labels under the domain.
#[derive(Debug, Clone)]
pub struct SubdomainProbe {
    name: String,
    candidates: Vec<String>,
}

impl SubdomainProbe {
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            name: "Subdomains".to_string(),
            candidates,
        }
    }
}

#[async_trait]
impl Probe for SubdomainProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> ProbeInfo {
        ProbeInfo {
            name: self.name.clone(),
            query_type: QueryType::Domain,
            uses_network: true,
        }
    }

    async fn run(&self, domain: &str, ctx: &ProbeContext) -> Result<ProbeResult, OsintError> {
        let mut futures = FuturesUnordered::new();

        for (idx, label) in self.candidates.iter().enumerate() {
            let host = format!("{}.{}", label, domain);
            let dns = ctx.dns.clone();
            futures.push(async move {
                let outcome = dns.lookup(&host, RecordKind::A).await;
                (idx, host, outcome)
            });
        }

        let mut found: Vec<Option<String>> = vec![None; self.candidates.len()];
        while let Some((idx, host, outcome)) = futures.next().await {
            match outcome {
                Ok(ips) if !ips.is_empty() => {
                    found[idx] = Some(format!("{} ({})", host, ips.join(", ")));
                }
                Ok(_) => {}
                Err(e) => debug!("[{}] {} did not resolve: {}", self.name, host, e),
            }
        }

        let found: Vec<String> = found.into_iter().flatten().collect();
        if found.is_empty() {
            Ok(ProbeResult::info(
                &self.name,
                format!("None of {} common subdomains resolved", self.candidates.len()),
                None,
            ))
        } else {
            Ok(ProbeResult::success(
                &self.name,
                format!("Found {}/{}: {}", found.len(), self.candidates.len(), found.join(", ")),
                None,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::tests_support::context_with_dns;
    use crate::resolver::testing::StaticDns;
    use crate::types::ProbeStatus;
    use std::time::Duration;

    #[tokio::test]
    async fn test_record_lookup_success() {
        let ctx = context_with_dns(
            StaticDns::new().with("example.com", RecordKind::Mx, &["mx1.example.com (priority 10)"]),
        );
        let result = DnsRecordProbe::new(RecordKind::Mx).run("example.com", &ctx).await.unwrap();
        assert_eq!(result.platform, "DNS MX");
        assert_eq!(result.status, ProbeStatus::Success);
        assert_eq!(result.data, "mx1.example.com (priority 10)");
    }

    #[tokio::test]
    async fn test_record_lookup_failure_is_error_result() {
        let ctx = context_with_dns(StaticDns::new());
        let result = DnsRecordProbe::new(RecordKind::A)
            .run("nonexistent-domain-xyz.invalid", &ctx)
            .await
            .unwrap();
        assert_eq!(result.status, ProbeStatus::Error);
        assert!(result.data.contains("nonexistent-domain-xyz.invalid"));
    }

    #[tokio::test]
    async fn test_empty_answer_is_error() {
        let ctx = context_with_dns(StaticDns::new().with("example.com", RecordKind::Txt, &[]));
        let result = DnsRecordProbe::new(RecordKind::Txt).run("example.com", &ctx).await.unwrap();
        assert_eq!(result.status, ProbeStatus::Error);
        assert_eq!(result.data, "No TXT records for example.com");
    }

    #[tokio::test]
    async fn test_subdomains_keep_candidate_order() {
        let dns = StaticDns::new()
            .with("www.example.com", RecordKind::A, &["1.1.1.1"])
            .with("api.example.com", RecordKind::A, &["2.2.2.2"])
            .with_delay("www.example.com", Duration::from_millis(50));
        let ctx = context_with_dns(dns);
        let probe = SubdomainProbe::new(vec!["www".into(), "mail".into(), "api".into()]);

        let result = probe.run("example.com", &ctx).await.unwrap();
        assert_eq!(result.status, ProbeStatus::Success);
        assert_eq!(
            result.data,
            "Found 2/3: www.example.com (1.1.1.1), api.example.com (2.2.2.2)"
        );
    }

    #[tokio::test]
    async fn test_no_subdomains_is_info() {
        let ctx = context_with_dns(StaticDns::new());
        let probe = SubdomainProbe::new(vec!["www".into()]);
        let result = probe.run("example.com", &ctx).await.unwrap();
        assert_eq!(result.status, ProbeStatus::Info);
    }
}
