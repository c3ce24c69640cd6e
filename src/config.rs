// src/config.rs

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;
use url::Url;

pub const DEFAULT_EXPLAIN_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_EXPLAIN_MODEL: &str = "openai/gpt-oss-20b";
pub const DEFAULT_SECRETS_FILE: &str = "secrets.env";
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the explanation service. `None` disables explanations.
    pub groq_api_key: Option<String>,
    pub explain_base_url: Url,
    pub explain_model: String,
    pub explain_timeout: Duration,
    pub session_idle: chrono::Duration,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            explain_base_url: Url::parse(DEFAULT_EXPLAIN_BASE_URL)
                .expect("default explanation URL is valid"),
            explain_model: DEFAULT_EXPLAIN_MODEL.to_string(),
            explain_timeout: Duration::from_secs(30),
            session_idle: chrono::Duration::minutes(120),
            port: 3000,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let secrets_file = env::var("SECRETS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SECRETS_FILE));
        let groq_api_key = resolve_api_key(&secrets_file, env::var(API_KEY_VAR).ok());

        let explain_base_url = match env::var("EXPLAIN_BASE_URL") {
            Ok(raw) => Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
                name: "EXPLAIN_BASE_URL",
                source,
            })?,
            Err(_) => defaults.explain_base_url,
        };

        let explain_model = env::var("EXPLAIN_MODEL").unwrap_or(defaults.explain_model);

        let explain_timeout = match parse_positive("EXPLAIN_TIMEOUT_SECS")? {
            Some(secs) => Duration::from_secs(secs),
            None => defaults.explain_timeout,
        };

        let session_idle = match parse_positive("SESSION_IDLE_MINUTES")? {
            Some(minutes) => chrono::Duration::minutes(minutes as i64),
            None => defaults.session_idle,
        };

        let port = match parse_positive("PORT")? {
            Some(port) => u16::try_from(port).map_err(|_| ConfigError::InvalidNumber {
                name: "PORT",
                value: port.to_string(),
            })?,
            None => defaults.port,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            groq_api_key,
            explain_base_url,
            explain_model,
            explain_timeout,
            session_idle,
            port,
            cors_origins,
            rust_log,
        })
    }
}

fn parse_positive(name: &'static str) -> Result<Option<u64>, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(Some(value)),
        _ => Err(ConfigError::InvalidNumber { name, value: raw }),
    }
}

/// Looks up the API key in the secrets file first, then in `env_value`.
///
/// The secrets file uses dotenv syntax. A missing or unreadable file is not
/// an error. Blank keys count as absent.
pub fn resolve_api_key(secrets_file: &Path, env_value: Option<String>) -> Option<String> {
    read_secret(secrets_file, API_KEY_VAR)
        .or(env_value)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

fn read_secret(path: &Path, name: &str) -> Option<String> {
    let iter = dotenvy::from_path_iter(path).ok()?;
    iter.filter_map(Result::ok)
        .find(|(key, value)| key == name && !value.trim().is_empty())
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn secrets_file(contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("semiquiz-secrets-{}.env", uuid::Uuid::new_v4()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_secret_store_takes_priority() {
        let path = secrets_file("GROQ_API_KEY=from-store\nOTHER=x\n");
        let key = resolve_api_key(&path, Some("from-env".to_string()));
        fs::remove_file(&path).unwrap();
        assert_eq!(key.as_deref(), Some("from-store"));
    }

    #[test]
    fn test_falls_back_to_environment() {
        let path = secrets_file("OTHER=x\n");
        let key = resolve_api_key(&path, Some("from-env".to_string()));
        fs::remove_file(&path).unwrap();
        assert_eq!(key.as_deref(), Some("from-env"));

        let missing = env::temp_dir().join("semiquiz-does-not-exist.env");
        assert_eq!(
            resolve_api_key(&missing, Some("from-env".to_string())).as_deref(),
            Some("from-env")
        );
    }

    #[test]
    fn test_blank_key_means_disabled() {
        let missing = env::temp_dir().join("semiquiz-does-not-exist.env");
        assert_eq!(resolve_api_key(&missing, None), None);
        assert_eq!(resolve_api_key(&missing, Some("   ".to_string())), None);

        let path = secrets_file("GROQ_API_KEY=\n");
        let key = resolve_api_key(&path, None);
        fs::remove_file(&path).unwrap();
        assert_eq!(key, None);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.groq_api_key.is_none());
        assert_eq!(config.explain_base_url.as_str(), "https://api.groq.com/openai/v1");
        assert_eq!(config.port, 3000);
    }
}
