//! Cache client capability set and its live/fallback variants.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use super::error::CacheError;

/// Reply of [`CacheClient::ping`] when the no-op client is in use.
pub const FALLBACK_PING: &str = "noop";

/// Options accepted by [`CacheClient::set`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Expire the entry after this many seconds.
    pub expiry_seconds: Option<u64>,
}

impl SetOptions {
    pub fn expire_in(seconds: u64) -> Self {
        Self {
            expiry_seconds: Some(seconds),
        }
    }
}

/// Operations a remote key-value service must provide.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Value stored under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key` and returns the service acknowledgement.
    async fn set(
        &self,
        key: &str,
        value: &str,
        options: SetOptions,
    ) -> Result<Option<String>, CacheError>;

    /// Adds `amount` to the integer at `key`, treating a missing key as 0.
    async fn increment(&self, key: &str, amount: i64) -> Result<i64, CacheError>;

    async fn ping(&self) -> Result<String, CacheError>;
}

/// Cache handle handed to callers.
///
/// `Live` forwards every call to the remote service and surfaces its
/// failures. `Fallback` answers locally without doing anything.
#[derive(Clone)]
pub enum CacheClient {
    Live(Arc<dyn CacheBackend>),
    Fallback,
}

impl std::fmt::Debug for CacheClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live(_) => f.write_str("CacheClient::Live"),
            Self::Fallback => f.write_str("CacheClient::Fallback"),
        }
    }
}

impl CacheClient {
    pub fn live(backend: impl CacheBackend + 'static) -> Self {
        Self::Live(Arc::new(backend))
    }

    /// True for the live variant.
    pub fn enabled(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self {
            Self::Live(backend) => backend.get(key).await,
            Self::Fallback => Ok(None),
        }
    }

    pub async fn set(
        &self,
        key: &str,
        value: &str,
        options: SetOptions,
    ) -> Result<Option<String>, CacheError> {
        match self {
            Self::Live(backend) => backend.set(key, value, options).await,
            Self::Fallback => Ok(None),
        }
    }

    pub async fn increment(&self, key: &str, amount: i64) -> Result<i64, CacheError> {
        match self {
            Self::Live(backend) => backend.increment(key, amount).await,
            Self::Fallback => Ok(0),
        }
    }

    pub async fn ping(&self) -> Result<String, CacheError> {
        match self {
            Self::Live(backend) => backend.ping().await,
            Self::Fallback => Ok(FALLBACK_PING.to_string()),
        }
    }

    /// Reads and deserializes a JSON value stored by [`CacheClient::set_json`].
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn set_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        options: SetOptions,
    ) -> Result<Option<String>, CacheError> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw, options).await
    }
}
