// src/types.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-probe budget in seconds, enforced around every probe.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    pub proxy: Option<String>,
    /// Outbound requests per second, keyed by probe source.
    pub rate_limits: HashMap<String, Option<u32>>,
    pub api_keys: HashMap<String, Vec<String>>,
    pub output: OutputConfig,
    pub resolver: ResolverConfig,
    pub server: ServerConfig,
    pub endpoints: EndpointConfig,
    pub history_capacity: usize,
    pub profiles: Vec<ProfileTemplate>,
    pub subdomains: Vec<String>,
    pub ports: Vec<u16>,
}

impl Default for Config {
    fn default() -> Self {
        let mut rate_limits = HashMap::new();
        rate_limits.insert("github".to_string(), Some(5));
        rate_limits.insert("reddit".to_string(), Some(2));

        Self {
            timeout_secs: 8,
            connect_timeout_secs: 5,
            user_agent: format!("OsintFinder/{}", env!("CARGO_PKG_VERSION")),
            proxy: None,
            rate_limits,
            api_keys: HashMap::new(),
            output: OutputConfig::default(),
            resolver: ResolverConfig::default(),
            server: ServerConfig::default(),
            endpoints: EndpointConfig::default(),
            history_capacity: crate::history::DEFAULT_CAPACITY,
            profiles: ProfileTemplate::defaults(),
            subdomains: ["www", "mail", "api", "ftp", "dev", "staging", "admin", "blog"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ports: vec![80, 443],
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub file: Option<String>,
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            file: None,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Upper bound on lookups in flight at once.
    pub threads: usize,
    pub timeout_secs: u64,
    pub nameservers: Vec<String>,
    pub use_system_resolver: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            threads: 20,
            timeout_secs: 5,
            nameservers: vec![
                "8.8.8.8:53".to_string(),
                "8.8.4.4:53".to_string(),
                "1.1.1.1:53".to_string(),
                "1.0.0.1:53".to_string(),
            ],
            use_system_resolver: false,
        }
    }
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Development mode exposes internal error messages in 500 responses.
    pub development: bool,
    pub general_per_minute: u32,
    pub search_per_minute: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            development: false,
            general_per_minute: 100,
            search_per_minute: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub github_api: String,
    pub reddit_api: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            github_api: "https://api.github.com".to_string(),
            reddit_api: "https://www.reddit.com".to_string(),
        }
    }
}

/// A profile page whose existence is checked with a plain GET.
/// `url` must contain a `{username}` placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileTemplate {
    pub name: String,
    pub url: String,
}

impl ProfileTemplate {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Twitter", "https://twitter.com/{username}"),
            Self::new("Instagram", "https://www.instagram.com/{username}/"),
            Self::new("TikTok", "https://www.tiktok.com/@{username}"),
            Self::new("YouTube", "https://www.youtube.com/@{username}"),
            Self::new("Twitch", "https://www.twitch.tv/{username}"),
            Self::new("GitLab", "https://gitlab.com/{username}"),
            Self::new("Medium", "https://medium.com/@{username}"),
            Self::new("Keybase", "https://keybase.io/{username}"),
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Social,
    Email,
    Phone,
    Domain,
    Crypto,
}

impl QueryType {
    pub const ALL: [QueryType; 5] = [
        QueryType::Social,
        QueryType::Email,
        QueryType::Phone,
        QueryType::Domain,
        QueryType::Crypto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Social => "social",
            QueryType::Email => "email",
            QueryType::Phone => "phone",
            QueryType::Domain => "domain",
            QueryType::Crypto => "crypto",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = OsintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "social" | "username" => Ok(QueryType::Social),
            "email" => Ok(QueryType::Email),
            "phone" => Ok(QueryType::Phone),
            "domain" => Ok(QueryType::Domain),
            "crypto" => Ok(QueryType::Crypto),
            other => Err(OsintError::ValidationError(format!("Unknown query type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Success,
    Warning,
    Error,
    Info,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProbeStatus::Success => "success",
            ProbeStatus::Warning => "warning",
            ProbeStatus::Error => "error",
            ProbeStatus::Info => "info",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeResult {
    pub platform: String,
    pub status: ProbeStatus,
    pub data: String,
    pub url: Option<String>,
}

impl ProbeResult {
    pub fn new(platform: &str, status: ProbeStatus, data: impl Into<String>, url: Option<String>) -> Self {
        Self {
            platform: platform.to_string(),
            status,
            data: data.into(),
            url,
        }
    }

    pub fn success(platform: &str, data: impl Into<String>, url: Option<String>) -> Self {
        Self::new(platform, ProbeStatus::Success, data, url)
    }

    pub fn warning(platform: &str, data: impl Into<String>, url: Option<String>) -> Self {
        Self::new(platform, ProbeStatus::Warning, data, url)
    }

    pub fn error(platform: &str, data: impl Into<String>, url: Option<String>) -> Self {
        Self::new(platform, ProbeStatus::Error, data, url)
    }

    pub fn info(platform: &str, data: impl Into<String>, url: Option<String>) -> Self {
        Self::new(platform, ProbeStatus::Info, data, url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchReport {
    pub query: String,
    #[serde(rename = "type")]
    pub query_type: QueryType,
    pub results: Vec<ProbeResult>,
    pub timestamp: String,
}

pub struct ProbeInfo {
    pub name: String,
    pub query_type: QueryType,
    pub uses_network: bool,
}

#[derive(Debug, Error)]
pub enum OsintError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("Probe error in {probe_name}: {message}")]
    ProbeError {
        probe_name: String,
        message: String,
    },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Resolution error: {0}")]
    ResolutionError(String),

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("Unknown error: {0}")]
    Unknown(#[from] anyhow::Error),
}
