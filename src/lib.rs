//! Support utilities for the fanhub backend.
//!
//! - [`cache`]: remote key-value cache client with a no-op fallback.
//! - [`application::access`]: role and tenant checks over request sessions.
//! - [`infra::logging`]: structured log records emitted through `tracing`.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
