// src/probes/email.rs
use crate::classifier::is_email;
use crate::probes::dns::records_result;
use crate::probes::{Probe, ProbeContext};
use crate::resolver::RecordKind;
use crate::types::{OsintError, ProbeInfo, ProbeResult, QueryType};
use async_trait::async_trait;

fn split_address(address: &str) -> Result<(&str, &str), OsintError> {
    if !is_email(address) {
        return Err(OsintError::ValidationError(format!("Not an email address: {}", address)));
    }
    address
        .rsplit_once('@')
        .ok_or_else(|| OsintError::ValidationError(format!("Not an email address: {}", address)))
}

#[derive(Debug, Clone)]
pub struct EmailFormatProbe {
    name: String,
}

impl EmailFormatProbe {
    pub fn new() -> Self {
        Self {
            name: "Email Format".to_string(),
        }
    }
}

#[async_trait]
impl Probe for EmailFormatProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> ProbeInfo {
        ProbeInfo {
            name: self.name.clone(),
            query_type: QueryType::Email,
            uses_network: false,
        }
    }

    async fn run(&self, address: &str, _ctx: &ProbeContext) -> Result<ProbeResult, OsintError> {
        let (local, domain) = split_address(address)?;
        Ok(ProbeResult::info(
            &self.name,
            format!("Valid syntax (local part: {}, domain: {})", local, domain.to_lowercase()),
            None,
        ))
    }
}

/// MX lookup on the domain part of an address.
#[derive(Debug, Clone)]
pub struct MailExchangerProbe {
    name: String,
}

impl MailExchangerProbe {
    pub fn new() -> Self {
        Self {
            name: "MX Records".to_string(),
        }
    }
}

#[async_trait]
impl Probe for MailExchangerProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> ProbeInfo {
        ProbeInfo {
            name: self.name.clone(),
            query_type: QueryType::Email,
            uses_network: true,
        }
    }

    async fn run(&self, address: &str, ctx: &ProbeContext) -> Result<ProbeResult, OsintError> {
        let (_, domain) = split_address(address)?;
        let domain = domain.to_lowercase();
        let outcome = ctx.dns.lookup(&domain, RecordKind::Mx).await;
        Ok(records_result(&self.name, RecordKind::Mx, &domain, outcome))
    }
}
