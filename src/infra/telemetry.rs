use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

pub const CACHE_FALLBACK_TOTAL: &str = "fanhub_cache_fallback_total";
pub const CACHE_COMMAND_TOTAL: &str = "fanhub_cache_command_total";
pub const CACHE_COMMAND_ERROR_TOTAL: &str = "fanhub_cache_command_error_total";
pub const CACHE_COMMAND_MS: &str = "fanhub_cache_command_ms";

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Log lines go to stderr so stdout carries only command output.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            CACHE_FALLBACK_TOTAL,
            Unit::Count,
            "Times the no-op cache client was substituted for the remote client."
        );
        describe_counter!(
            CACHE_COMMAND_TOTAL,
            Unit::Count,
            "Total number of commands sent to the remote cache."
        );
        describe_counter!(
            CACHE_COMMAND_ERROR_TOTAL,
            Unit::Count,
            "Total number of remote cache commands that failed."
        );
        describe_histogram!(
            CACHE_COMMAND_MS,
            Unit::Milliseconds,
            "Remote cache command latency in milliseconds."
        );
    });
}
