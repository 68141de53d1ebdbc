//! REST client for a hosted Redis-compatible cache.
//!
//! Each command is a `POST` to the base URL with a JSON array body such as
//! `["SET", "key", "value", "EX", "60"]` and a bearer token. Replies are
//! `{"result": ...}` on success or `{"error": "..."}` on failure.

use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::infra::telemetry::{CACHE_COMMAND_ERROR_TOTAL, CACHE_COMMAND_MS, CACHE_COMMAND_TOTAL};

use super::{
    client::{CacheBackend, SetOptions},
    config::CacheConfig,
    error::CacheError,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RestReply {
    result: Option<Value>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RestCache {
    client: Client,
    endpoint: Url,
}

impl RestCache {
    /// Validates the configuration and builds the HTTP client. No request is sent.
    pub fn connect(config: &CacheConfig) -> Result<Self, CacheError> {
        let raw_url = config.url.as_deref().ok_or(CacheError::MissingUrl)?;
        let endpoint = Url::parse(raw_url)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(CacheError::UnsupportedScheme(endpoint.scheme().to_string()));
        }

        let token = config
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(CacheError::MissingToken)?;
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| CacheError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(Self::user_agent())
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(CacheError::Build)?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn user_agent() -> &'static str {
        concat!("fanhub/", env!("CARGO_PKG_VERSION"))
    }

    async fn execute(&self, command: &'static str, args: &[&str]) -> Result<Value, CacheError> {
        let started = Instant::now();
        let result = self.send(command, args).await;

        counter!(CACHE_COMMAND_TOTAL, "command" => command).increment(1);
        histogram!(CACHE_COMMAND_MS, "command" => command)
            .record(started.elapsed().as_secs_f64() * 1_000.0);
        if let Err(error) = &result {
            counter!(CACHE_COMMAND_ERROR_TOTAL, "command" => command).increment(1);
            debug!(command, error = %error, "remote cache command failed");
        }

        result
    }

    async fn send(&self, command: &'static str, args: &[&str]) -> Result<Value, CacheError> {
        let mut body = Vec::with_capacity(args.len() + 1);
        body.push(command);
        body.extend_from_slice(args);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let reply = match serde_json::from_slice::<RestReply>(&bytes) {
            Ok(reply) => reply,
            Err(err) if status.is_success() => return Err(CacheError::Serde(err)),
            Err(_) => RestReply {
                result: None,
                error: Some(String::from_utf8_lossy(&bytes).into_owned()),
            },
        };

        if let Some(message) = reply.error {
            return Err(CacheError::Remote {
                command,
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            return Err(CacheError::Remote {
                command,
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        Ok(reply.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl CacheBackend for RestCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self.execute("GET", &[key]).await? {
            Value::Null => Ok(None),
            Value::String(value) => Ok(Some(value)),
            Value::Number(number) => Ok(Some(number.to_string())),
            other => Err(CacheError::unexpected("GET", &other)),
        }
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        options: SetOptions,
    ) -> Result<Option<String>, CacheError> {
        let reply = match options.expiry_seconds {
            Some(seconds) => {
                let seconds = seconds.to_string();
                self.execute("SET", &[key, value, "EX", seconds.as_str()]).await?
            }
            None => self.execute("SET", &[key, value]).await?,
        };

        match reply {
            Value::Null => Ok(None),
            Value::String(ack) => Ok(Some(ack)),
            other => Err(CacheError::unexpected("SET", &other)),
        }
    }

    async fn increment(&self, key: &str, amount: i64) -> Result<i64, CacheError> {
        let amount = amount.to_string();
        let reply = self.execute("INCRBY", &[key, amount.as_str()]).await?;

        match &reply {
            Value::Number(number) => number
                .as_i64()
                .ok_or_else(|| CacheError::unexpected("INCRBY", &reply)),
            Value::String(text) => text
                .parse()
                .map_err(|_| CacheError::unexpected("INCRBY", &reply)),
            _ => Err(CacheError::unexpected("INCRBY", &reply)),
        }
    }

    async fn ping(&self) -> Result<String, CacheError> {
        match self.execute("PING", &[]).await? {
            Value::String(reply) => Ok(reply),
            other => Err(CacheError::unexpected("PING", &other)),
        }
    }
}
