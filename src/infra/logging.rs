//! Structured log records.
//!
//! Every record carries `level`, `message`, an RFC 3339 `timestamp`, and the
//! `requestId`/`tenantId` placeholders (JSON `null` until a caller supplies
//! them). Caller context is an open map of loosely-typed fields merged on top
//! of the placeholders. `level`, `message`, and `timestamp` cannot be
//! replaced by context.

use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::{Map, Value};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, error, info, warn};

use super::lock::mutex_lock;

const SOURCE: &str = "infra::logging";
const TRACING_TARGET: &str = "fanhub::log";

pub const REQUEST_ID_FIELD: &str = "requestId";
pub const TENANT_ID_FIELD: &str = "tenantId";

/// Caller-supplied fields merged into a record.
pub type LogContext = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    level: LogLevel,
    message: String,
    fields: Map<String, Value>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>, context: LogContext) -> Self {
        Self::at(level, message, context, OffsetDateTime::now_utc())
    }

    pub fn at(
        level: LogLevel,
        message: impl Into<String>,
        context: LogContext,
        timestamp: OffsetDateTime,
    ) -> Self {
        let message = message.into();
        let timestamp = timestamp
            .format(&Rfc3339)
            .unwrap_or_else(|_| timestamp.to_string());

        let mut fields = Map::new();
        fields.insert(REQUEST_ID_FIELD.to_string(), Value::Null);
        fields.insert(TENANT_ID_FIELD.to_string(), Value::Null);
        fields.extend(context);
        fields.insert("level".to_string(), Value::from(level.as_str()));
        fields.insert("message".to_string(), Value::from(message.clone()));
        fields.insert("timestamp".to_string(), Value::from(timestamp));

        Self {
            level,
            message,
            fields,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }
}

/// Destination for structured records.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: &LogRecord);
}

/// Emits records as `tracing` events, serialized into the `record` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, record: &LogRecord) {
        let json = record.to_json();
        let message = record.message();
        match record.level() {
            LogLevel::Debug => debug!(target: TRACING_TARGET, record = %json, "{message}"),
            LogLevel::Info => info!(target: TRACING_TARGET, record = %json, "{message}"),
            LogLevel::Warn => warn!(target: TRACING_TARGET, record = %json, "{message}"),
            LogLevel::Error => error!(target: TRACING_TARGET, record = %json, "{message}"),
        }
    }
}

/// Keeps records in memory for later inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        mutex_lock(&self.records, SOURCE, "records").clone()
    }

    pub fn records_at(&self, level: LogLevel) -> Vec<LogRecord> {
        mutex_lock(&self.records, SOURCE, "records_at")
            .iter()
            .filter(|record| record.level() == level)
            .cloned()
            .collect()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, record: &LogRecord) {
        mutex_lock(&self.records, SOURCE, "emit").push(record.clone());
    }
}

#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>, context: LogContext) {
        self.sink.emit(&LogRecord::new(level, message, context));
    }

    pub fn debug(&self, message: impl Into<String>, context: LogContext) {
        self.log(LogLevel::Debug, message, context);
    }

    pub fn info(&self, message: impl Into<String>, context: LogContext) {
        self.log(LogLevel::Info, message, context);
    }

    pub fn warn(&self, message: impl Into<String>, context: LogContext) {
        self.log(LogLevel::Warn, message, context);
    }

    pub fn error(&self, message: impl Into<String>, context: LogContext) {
        self.log(LogLevel::Error, message, context);
    }
}
