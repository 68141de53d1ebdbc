//! Remote cache client with graceful fallback.
//!
//! [`CacheProvider`] hands out one shared [`CacheClient`]. When the remote
//! service cannot be configured, the provider logs a single warning and
//! substitutes a no-op client with the same interface:
//!
//! ```toml
//! [cache]
//! url = "https://example-cache.upstash.io"
//! token = "..."
//! request_timeout_ms = 2000
//! ```
//!
//! Construction is the only guarded step. Failures of individual commands
//! on a live client are returned to the caller.

mod client;
mod config;
mod error;
mod provider;
mod remote;

pub use client::{CacheBackend, CacheClient, FALLBACK_PING, SetOptions};
pub use config::CacheConfig;
pub use error::CacheError;
pub use provider::{CacheProvider, Connector, FALLBACK_WARNING};
pub use remote::RestCache;
