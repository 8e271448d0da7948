use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Everything has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// When unset, mentor sessions live in process memory.
    pub redis_url: Option<String>,
    pub session_ttl: Duration,
    pub session_max_messages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            redis_url: None,
            session_ttl: Duration::from_secs(86_400),
            session_max_messages: 50,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let session_ttl_secs =
            parse_or(&lookup, "SESSION_TTL_SECS", defaults.session_ttl.as_secs())
                .context("SESSION_TTL_SECS must be a whole number of seconds")?;
        if session_ttl_secs == 0 {
            bail!("SESSION_TTL_SECS must be at least 1 second");
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            redis_url: lookup("REDIS_URL").filter(|url| !url.trim().is_empty()),
            session_ttl: Duration::from_secs(session_ttl_secs),
            session_max_messages: parse_or(
                &lookup,
                "SESSION_MAX_MESSAGES",
                defaults.session_max_messages,
            )
            .context("SESSION_MAX_MESSAGES must be a positive integer")?
            .max(1),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value for '{key}': {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert!(config.redis_url.is_none());
        assert_eq!(config.session_ttl, Duration::from_secs(86_400));
        assert_eq!(config.session_max_messages, 50);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9090"),
            ("REDIS_URL", "redis://localhost:6379"),
            ("SESSION_TTL_SECS", "600"),
            ("SESSION_MAX_MESSAGES", "20"),
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.session_ttl, Duration::from_secs(600));
        assert_eq!(config.session_max_messages, 20);
    }

    #[test]
    fn test_blank_redis_url_means_memory() {
        let config = config_from(&[("REDIS_URL", "  ")]).unwrap();
        assert!(config.redis_url.is_none());
    }

    #[test]
    fn test_zero_session_ttl_fails() {
        let err = config_from(&[("SESSION_TTL_SECS", "0")]).unwrap_err();
        assert!(format!("{err:#}").contains("SESSION_TTL_SECS"));
    }

    #[test]
    fn test_invalid_port_fails() {
        let err = config_from(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(format!("{err:#}").contains("PORT"));
    }
}
