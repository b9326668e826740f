// src/probes/port.rs
use crate::probes::{Probe, ProbeContext};
use crate::types::{OsintError, ProbeInfo, ProbeResult, QueryType};
use async_trait::async_trait;
use log::debug;
use tokio::net::TcpStream;
use tokio::time::timeout;

fn service_name(port: u16) -> Option<&'static str> {
    match port {
        21 => Some("ftp"),
        22 => Some("ssh"),
        25 => Some("smtp"),
        53 => Some("dns"),
        80 => Some("http"),
        110 => Some("pop3"),
        143 => Some("imap"),
        443 => Some("https"),
        3306 => Some("mysql"),
        5432 => Some("postgres"),
        8080 => Some("http-alt"),
        8443 => Some("https-alt"),
        _ => None,
    }
}

/// Plain TCP connect to one port.
#[derive(Debug, Clone)]
pub struct PortProbe {
    name: String,
    port: u16,
}

impl PortProbe {
    pub fn new(port: u16) -> Self {
        Self {
            name: format!("Port {}", port),
            port,
        }
    }

    fn describe(&self) -> String {
        match service_name(self.port) {
            Some(service) => format!("{}/tcp ({})", self.port, service),
            None => format!("{}/tcp", self.port),
        }
    }
}

#[async_trait]
impl Probe for PortProbe {
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

    async fn run(&self, host: &str, ctx: &ProbeContext) -> Result<ProbeResult, OsintError> {
        let attempt = timeout(ctx.connect_timeout, TcpStream::connect((host, self.port))).await;
        debug!("[{}] {} -> {:?}", self.name, host, attempt.as_ref().map(|r| r.is_ok()));

        match attempt {
            Ok(Ok(_stream)) => Ok(ProbeResult::success(&self.name, format!("{} open", self.describe()), None)),
            Ok(Err(e)) => Ok(ProbeResult::error(
                &self.name,
                format!("{} closed ({})", self.describe(), e),
                None,
            )),
            Err(_) => Ok(ProbeResult::error(
                &self.name,
                format!("{} filtered (no answer in {}s)", self.describe(), ctx.connect_timeout.as_secs()),
                None,
            )),
        }
    }
}
