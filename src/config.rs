use std::collections::HashMap;
use std::env;
use std::fs;
use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;

use crate::tasks::refresh_loop::DEFAULT_REFRESH_INTERVAL;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// `KEY=value` pairs from a dotenv-style file.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    // File values win over the process environment.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).or_else(|| env::var(key).ok())
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub timezone: Option<Tz>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            timezone: None,
        }
    }
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| config.lookup(key))
    }

    pub fn from_lookup<F>(get_prop: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(url) = get_prop("API_BASE_URL") {
            let parsed = reqwest::Url::parse(&url).map_err(|e| ConfigError::InvalidValue {
                key: "API_BASE_URL",
                value: url.clone(),
                reason: e.to_string(),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidValue {
                    key: "API_BASE_URL",
                    value: url,
                    reason: "scheme must be http or https".to_string(),
                });
            }
            settings.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(secs) = get_prop("REFRESH_INTERVAL_SECS") {
            settings.refresh_interval = parse_seconds("REFRESH_INTERVAL_SECS", &secs)?;
        }

        if let Some(secs) = get_prop("REQUEST_TIMEOUT_SECS") {
            settings.request_timeout = parse_seconds("REQUEST_TIMEOUT_SECS", &secs)?;
        }

        if let Some(name) = get_prop("TIMEZONE").filter(|name| !name.trim().is_empty()) {
            let tz = name
                .trim()
                .parse::<Tz>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "TIMEZONE",
                    value: name.clone(),
                    reason: e.to_string(),
                })?;
            settings.timezone = Some(tz);
        }

        Ok(settings)
    }
}

fn parse_seconds(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        Ok(_) => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "must be at least 1 second".to_string(),
        }),
        Err(e) => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
