use crate::error::ErrorContext;
use crate::types::{Config, OsintError};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;

const MAX_TIMEOUT_SECS: u64 = 60;

pub fn load_config(config_path_str: &str) -> Result<Config, OsintError> {
    if !Path::new(config_path_str).exists() {
        return Err(OsintError::ConfigError(format!(
            "Config file not found: {}",
            config_path_str
        )));
    }

    let contents = fs::read_to_string(config_path_str)
        .with_context(|| format!("Failed to read config file {}", config_path_str))?;
    let mut config = toml::from_str::<Config>(&contents)
        .with_context(|| format!("Failed to parse config file {}", config_path_str))?;

    apply_env_overrides(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

/// Defaults plus environment overrides, for runs without a config file.
pub fn default_config() -> Result<Config, OsintError> {
    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn apply_env_overrides(config: &mut Config) -> Result<(), OsintError> {
    apply_overrides(config, |key| env::var(key).ok())
}

fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), OsintError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(tokens) = lookup("GITHUB_TOKENS") {
        let tokens: Vec<String> = tokens
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        config.api_keys.insert("github".to_string(), tokens);
    }
    if let Some(bind) = lookup("OSINT_BIND") {
        config.server.bind = bind;
    }
    if let Some(dev) = lookup("OSINT_DEVELOPMENT") {
        config.server.development = matches!(dev.to_lowercase().as_str(), "1" | "true" | "yes");
    }
    Ok(())
}

pub fn validate_config(config: &Config) -> Result<(), OsintError> {
    if config.timeout_secs == 0 || config.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(OsintError::ConfigError(format!(
            "Probe timeout must be between 1 and {} seconds",
            MAX_TIMEOUT_SECS
        )));
    }
    if config.connect_timeout_secs == 0 {
        return Err(OsintError::ConfigError("Connect timeout must be greater than 0".to_string()));
    }
    if config.resolver.threads == 0 {
        return Err(OsintError::ConfigError("Resolver threads must be greater than 0".to_string()));
    }
    if config.resolver.timeout_secs == 0 {
        return Err(OsintError::ConfigError("Resolver timeout must be greater than 0".to_string()));
    }
    if !config.resolver.use_system_resolver {
        for ns in &config.resolver.nameservers {
            SocketAddr::from_str(ns)
                .with_context(|| format!("Invalid nameserver address {}", ns))?;
        }
    }
    if config.history_capacity == 0 {
        return Err(OsintError::ConfigError("History capacity must be greater than 0".to_string()));
    }
    if config.server.general_per_minute == 0 || config.server.search_per_minute == 0 {
        return Err(OsintError::ConfigError("Rate limits must be greater than 0".to_string()));
    }
    for (source, limit) in &config.rate_limits {
        if *limit == Some(0) {
            return Err(OsintError::ConfigError(format!("Rate limit for {} must be greater than 0", source)));
        }
    }
    for profile in &config.profiles {
        if !profile.url.contains("{username}") {
            return Err(OsintError::ConfigError(format!(
                "Profile template for {} has no {{username}} placeholder",
                profile.name
            )));
        }
        url::Url::parse(&profile.url.replace("{username}", "probe"))
            .with_context(|| format!("Invalid profile URL for {}", profile.name))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_load_config_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
timeout_secs = 6
history_capacity = 10
ports = [22]

[server]
bind = "0.0.0.0:8080"
search_per_minute = 3

[api_keys]
github = ["ghp_one", "ghp_two"]

[[profiles]]
name = "Codeberg"
url = "https://codeberg.org/{{username}}"
"#
        )
        .unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.timeout_secs, 6);
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.ports, vec![22]);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.search_per_minute, 3);
        assert_eq!(config.server.general_per_minute, 100);
        assert_eq!(config.api_keys["github"].len(), 2);
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.profiles[0].name, "Codeberg");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = load_config("/definitely/not/here.toml");
        assert!(matches!(result, Err(OsintError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_toml_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = \"soon\"").unwrap();
        assert!(load_config(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.timeout_secs = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.history_capacity = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.profiles[0].url = "https://example.com/static".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.resolver.nameservers = vec!["not-an-address".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        apply_overrides(&mut config, |key| match key {
            "GITHUB_TOKENS" => Some("a, b,,c".to_string()),
            "OSINT_BIND" => Some("0.0.0.0:9000".to_string()),
            "OSINT_DEVELOPMENT" => Some("true".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.api_keys["github"], vec!["a", "b", "c"]);
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert!(config.server.development);
    }
}
