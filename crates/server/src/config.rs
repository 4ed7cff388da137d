//! Server configuration from `VERTO_*` environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use verto_core::{RetryPolicy, VertoConfig};

/// Listening address and pipeline settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Upper bound on one HTTP request, translation included.
    pub request_timeout: Duration,
    pub verto: VertoConfig,
}

impl ServerConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("VERTO_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = parse_or(&lookup, "VERTO_PORT", 5002)?;
        let addr = format!("{host}:{port}")
            .parse()
            .with_context(|| format!("VERTO_HOST must be an IP address, got {host}"))?;

        let mut builder = VertoConfig::builder()
            .model_timeout(parse_or(&lookup, "VERTO_MODEL_TIMEOUT", VertoConfig::default().model_timeout)?)
            .chunk_size(parse_or(&lookup, "VERTO_CHUNK_SIZE", VertoConfig::default().chunk_size)?)
            .chunk_overlap(parse_or(&lookup, "VERTO_CHUNK_OVERLAP", VertoConfig::default().chunk_overlap)?)
            .pacing(Duration::from_millis(parse_or(&lookup, "VERTO_PACING_MS", 200)?))
            .retry(RetryPolicy::attempts(parse_or(&lookup, "VERTO_RETRY_ATTEMPTS", 1)?))
            .min_content_chars(parse_or(&lookup, "VERTO_MIN_CONTENT_CHARS", 100)?)
            .fetch_timeout(parse_or(&lookup, "VERTO_FETCH_TIMEOUT", 15)?);

        if let Some(model) = lookup("VERTO_MODEL") {
            builder = builder.model(model);
        }
        if let Some(url) = lookup("VERTO_OLLAMA_URL") {
            builder = builder.base_url(url);
        }

        let verto = builder.build();
        verto.chunker().context("VERTO_CHUNK_SIZE must be greater than zero")?;

        Ok(Self {
            addr,
            request_timeout: Duration::from_secs(parse_or(&lookup, "VERTO_REQUEST_TIMEOUT", 900)?),
            verto,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value.trim().parse().with_context(|| format!("{key} must be a valid number, got {value:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig> {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.addr.to_string(), "127.0.0.1:5002");
        assert_eq!(config.request_timeout, Duration::from_secs(900));
        assert_eq!(config.verto, VertoConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("VERTO_HOST", "0.0.0.0"),
            ("VERTO_PORT", "8080"),
            ("VERTO_MODEL", "llama3:8b"),
            ("VERTO_OLLAMA_URL", "http://gpu:11434"),
            ("VERTO_CHUNK_SIZE", "1200"),
            ("VERTO_PACING_MS", "0"),
            ("VERTO_RETRY_ATTEMPTS", "3"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.verto.model, "llama3:8b");
        assert_eq!(config.verto.base_url, "http://gpu:11434");
        assert_eq!(config.verto.chunk_size, 1200);
        assert_eq!(config.verto.pacing, Duration::ZERO);
        assert_eq!(config.verto.retry.max_attempts, 3);
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("VERTO_PORT", "eighty")]).is_err());
        assert!(config_from(&[("VERTO_CHUNK_SIZE", "0")]).is_err());
        assert!(config_from(&[("VERTO_HOST", "not a host")]).is_err());
    }
}
