// src/resolver.rs
use crate::types::{OsintError, ResolverConfig};
use crate::utils::trim_dns_name;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Semaphore;
use trust_dns_resolver::config::{ResolverConfig as DnsResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    A,
    Mx,
    Txt,
    Ns,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::A => "A",
            RecordKind::Mx => "MX",
            RecordKind::Txt => "TXT",
            RecordKind::Ns => "NS",
        };
        f.write_str(label)
    }
}

/// Record lookups as the probes see them. Each answer is rendered to a
/// display string; an empty answer is `Ok(vec![])`.
#[async_trait]
pub trait DnsLookup: Send + Sync {
    async fn lookup(&self, name: &str, kind: RecordKind) -> Result<Vec<String>, OsintError>;
}

pub struct Resolver {
    resolver: TokioAsyncResolver,
    semaphore: Arc<Semaphore>,
}

impl Resolver {
    pub fn new(config: &ResolverConfig) -> Result<Self, OsintError> {
        let resolver = if config.use_system_resolver {
            TokioAsyncResolver::tokio_from_system_conf()
                .map_err(|e| OsintError::ResolutionError(format!("Failed to create system resolver: {}", e)))?
        } else {
            let mut resolver_config = DnsResolverConfig::new();

            for ns in &config.nameservers {
                let socket_addr = SocketAddr::from_str(ns)
                    .map_err(|e| OsintError::ConfigError(format!("Invalid nameserver address {}: {}", ns, e)))?;
                resolver_config.add_name_server(trust_dns_resolver::config::NameServerConfig {
                    socket_addr,
                    protocol: trust_dns_resolver::config::Protocol::Udp,
                    tls_dns_name: None,
                    trust_negative_responses: false,
                    bind_addr: None,
                });
            }

            let mut opts = ResolverOpts::default();
            opts.timeout = config.timeout();
            opts.attempts = 1;

            TokioAsyncResolver::tokio(resolver_config, opts)
        };

        Ok(Self {
            resolver,
            semaphore: Arc::new(Semaphore::new(config.threads)),
        })
    }

    async fn lookup_inner(&self, name: &str, kind: RecordKind) -> Result<Vec<String>, trust_dns_resolver::error::ResolveError> {
        let records: Vec<String> = match kind {
            RecordKind::A => self
                .resolver
                .ipv4_lookup(name)
                .await?
                .iter()
                .map(|ip| ip.to_string())
                .collect(),
            RecordKind::Mx => {
                let mut mx: Vec<(u16, String)> = self
                    .resolver
                    .mx_lookup(name)
                    .await?
                    .iter()
                    .map(|r| (r.preference(), trim_dns_name(&r.exchange().to_string())))
                    .collect();
                mx.sort();
                mx.into_iter()
                    .map(|(preference, exchange)| format!("{} (priority {})", exchange, preference))
                    .collect()
            }
            RecordKind::Txt => self
                .resolver
                .txt_lookup(name)
                .await?
                .iter()
                .map(|txt| {
                    txt.iter()
                        .map(|data| String::from_utf8_lossy(data).to_string())
                        .collect::<Vec<_>>()
                        .join("")
                })
                .collect(),
            RecordKind::Ns => self
                .resolver
                .ns_lookup(name)
                .await?
                .iter()
                .map(|ns| trim_dns_name(&ns.to_string()))
                .collect(),
        };
        Ok(records)
    }
}

#[async_trait]
impl DnsLookup for Resolver {
    async fn lookup(&self, name: &str, kind: RecordKind) -> Result<Vec<String>, OsintError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| OsintError::ResolutionError(format!("Failed to acquire semaphore: {}", e)))?;

        self.lookup_inner(name, kind)
            .await
            .map_err(|e| OsintError::ResolutionError(format!("{} lookup for {} failed: {}", kind, name, e)))
    }
}
