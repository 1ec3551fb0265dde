use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) database_url: String,
    pub(crate) database_max_connections: u32,
    pub(crate) http_addr: String,
    pub(crate) log_level: String,
    pub(crate) http_request_body_limit_bytes: usize,
    pub(crate) http_concurrency_limit: usize,
    pub(crate) http_request_timeout_secs: u64,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    fn from_source(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url =
            get_required(&var, "DATABASE_URL").context("DATABASE_URL is required")?;
        let database_max_connections = u32::try_from(parse_positive(
            &var,
            "DATABASE_MAX_CONNECTIONS",
            10,
        )?)
        .context("DATABASE_MAX_CONNECTIONS is too large")?;

        let http_addr = var("HTTP_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let log_level = var("LOG_LEVEL")
            .or_else(|| var("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());
        let http_request_body_limit_bytes =
            parse_positive(&var, "HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)? as usize;
        let http_concurrency_limit = parse_positive(&var, "HTTP_CONCURRENCY_LIMIT", 256)? as usize;
        let http_request_timeout_secs = parse_positive(&var, "HTTP_REQUEST_TIMEOUT_SECS", 10)?;

        Ok(Self {
            database_url,
            database_max_connections,
            http_addr,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
        })
    }
}

fn get_required(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    let value = var(key).ok_or_else(|| anyhow!("{key} is not set"))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_positive(var: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    let value = match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?,
        None => default,
    };

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::Settings;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_source(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let settings = load(&[("DATABASE_URL", "postgres://localhost/blog")])
            .expect("settings must load");

        assert_eq!(settings.database_url, "postgres://localhost/blog");
        assert_eq!(settings.database_max_connections, 10);
        assert_eq!(settings.http_addr, "0.0.0.0:8080");
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.http_request_body_limit_bytes, 1024 * 1024);
        assert_eq!(settings.http_concurrency_limit, 256);
        assert_eq!(settings.http_request_timeout_secs, 10);
    }

    #[test]
    fn missing_database_url_fails() {
        assert!(load(&[]).is_err());
        assert!(load(&[("DATABASE_URL", "   ")]).is_err());
    }

    #[test]
    fn log_level_falls_back_to_rust_log() {
        let settings = load(&[("DATABASE_URL", "postgres://x"), ("RUST_LOG", "debug")])
            .expect("settings must load");

        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn zero_and_garbage_limits_are_rejected() {
        assert!(load(&[("DATABASE_URL", "postgres://x"), ("HTTP_CONCURRENCY_LIMIT", "0")]).is_err());
        assert!(
            load(&[("DATABASE_URL", "postgres://x"), ("HTTP_REQUEST_TIMEOUT_SECS", "soon")])
                .is_err()
        );
    }
}
