//! Memoized construction of the shared cache client.

use std::sync::Arc;

use metrics::counter;
use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::info;

use crate::infra::{
    logging::{LogContext, Logger},
    telemetry::CACHE_FALLBACK_TOTAL,
};

use super::{
    client::{CacheBackend, CacheClient},
    config::CacheConfig,
    error::CacheError,
    remote::RestCache,
};

pub const FALLBACK_WARNING: &str = "cache unavailable, using no-op client";

/// Builds the live backend from configuration.
pub type Connector =
    dyn Fn(&CacheConfig) -> Result<Arc<dyn CacheBackend>, CacheError> + Send + Sync;

/// Owns the process-wide cache client.
///
/// The first call to [`CacheProvider::client`] decides between the live and
/// the fallback variant; every later call returns that same instance. A
/// fallback is never upgraded.
pub struct CacheProvider {
    config: CacheConfig,
    logger: Logger,
    connector: Box<Connector>,
    client: OnceCell<Arc<CacheClient>>,
}

impl std::fmt::Debug for CacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheProvider")
            .field("config", &self.config)
            .field("client", &self.client.get())
            .finish_non_exhaustive()
    }
}

impl CacheProvider {
    /// Provider backed by the REST client.
    pub fn new(config: CacheConfig, logger: Logger) -> Self {
        Self::with_connector(config, logger, |config| {
            let backend: Arc<dyn CacheBackend> = Arc::new(RestCache::connect(config)?);
            Ok(backend)
        })
    }

    /// Provider with a custom backend constructor.
    pub fn with_connector<F>(config: CacheConfig, logger: Logger, connector: F) -> Self
    where
        F: Fn(&CacheConfig) -> Result<Arc<dyn CacheBackend>, CacheError> + Send + Sync + 'static,
    {
        Self {
            config,
            logger,
            connector: Box::new(connector),
            client: OnceCell::new(),
        }
    }

    /// Shared client, constructed on first use. Never fails.
    pub fn client(&self) -> Arc<CacheClient> {
        self.client
            .get_or_init(|| Arc::new(self.build()))
            .clone()
    }

    /// True once [`CacheProvider::client`] has produced an instance.
    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }

    fn build(&self) -> CacheClient {
        match (self.connector)(&self.config) {
            Ok(backend) => {
                let endpoint = self.config.redacted_url().unwrap_or_default();
                info!(endpoint = %endpoint, "remote cache client ready");
                CacheClient::Live(backend)
            }
            Err(error) => {
                let mut context = LogContext::new();
                context.insert("error".to_string(), Value::String(error.to_string()));
                self.logger.warn(FALLBACK_WARNING, context);
                counter!(CACHE_FALLBACK_TOTAL).increment(1);
                CacheClient::Fallback
            }
        }
    }
}
