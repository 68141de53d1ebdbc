//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{env, num::NonZeroU64, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

mod cli;

pub use cli::{CheckRoleArgs, CliArgs, Command, Overrides};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "fanhub";
const ENV_PREFIX: &str = "FANHUB";
const DEFAULT_CACHE_REQUEST_TIMEOUT_MS: u64 = 2_000;

/// Conventional variable names set by hosted REST cache providers.
pub const CACHE_URL_ENV_ALIAS: &str = "UPSTASH_REDIS_REST_URL";
pub const CACHE_TOKEN_ENV_ALIAS: &str = "UPSTASH_REDIS_REST_TOKEN";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Remote cache settings.
///
/// Endpoint and token stay unvalidated here: a missing or malformed value
/// selects the no-op cache client instead of failing start-up.
#[derive(Clone)]
pub struct CacheSettings {
    pub url: Option<String>,
    pub token: Option<String>,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for CacheSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheSettings")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_env_aliases(|name| env::var(name).ok());
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    cache: RawCacheSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    url: Option<String>,
    token: Option<String>,
    request_timeout_ms: Option<u64>,
}

impl RawSettings {
    /// Fill cache endpoint and token from the provider aliases when the
    /// layered sources left them unset.
    fn apply_env_aliases(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.cache.url.is_none() {
            self.cache.url = lookup(CACHE_URL_ENV_ALIAS);
        }
        if self.cache.token.is_none() {
            self.cache.token = lookup(CACHE_TOKEN_ENV_ALIAS);
        }
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.cache_url.as_ref() {
            self.cache.url = Some(url.clone());
        }
        if let Some(token) = overrides.cache_token.as_ref() {
            self.cache.token = Some(token.clone());
        }
        if let Some(timeout) = overrides.cache_request_timeout_ms {
            self.cache.request_timeout_ms = Some(timeout);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings { logging, cache } = raw;

        let logging = build_logging_settings(logging)?;
        let cache = build_cache_settings(cache)?;

        Ok(Self { logging, cache })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let timeout_ms = cache
        .request_timeout_ms
        .unwrap_or(DEFAULT_CACHE_REQUEST_TIMEOUT_MS);
    let timeout_ms = NonZeroU64::new(timeout_ms).ok_or_else(|| {
        LoadError::invalid("cache.request_timeout_ms", "must be greater than zero")
    })?;

    Ok(CacheSettings {
        url: non_blank(cache.url),
        token: non_blank(cache.token),
        request_timeout: Duration::from_millis(timeout_ms.get()),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[cfg(test)]
mod tests;
