//! Infrastructure adapters and runtime bootstrap.

pub mod error;
mod lock;
pub mod logging;
pub mod telemetry;
