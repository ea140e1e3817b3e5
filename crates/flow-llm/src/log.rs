//! Injected logging collaborator
//!
//! Adapters report call outcomes through a [`LogSink`] instead of a global
//! logger so embedders and tests can observe them directly.

use std::sync::{Mutex, PoisonError};

use serde_json::Value;
use tracing::Level;

/// Prefix carried by every message the adapters emit
pub const LOG_TAG: &str = "[Agent Controller]";

/// Leveled log destination for adapter events
pub trait LogSink: Send + Sync {
    /// Record one message with optional structured extras
    fn log(&self, level: Level, message: &str, extras: Option<&Value>);
}

/// Forwards records to the `tracing` ecosystem
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str, extras: Option<&Value>) {
        let extras = extras.map(tracing::field::display);

        if level == Level::ERROR {
            tracing::error!(extras, "{message}");
        } else if level == Level::WARN {
            tracing::warn!(extras, "{message}");
        } else if level == Level::INFO {
            tracing::info!(extras, "{message}");
        } else if level == Level::DEBUG {
            tracing::debug!(extras, "{message}");
        } else {
            tracing::trace!(extras, "{message}");
        }
    }
}

/// A single captured log entry
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub extras: Option<Value>,
}

/// Keeps every record in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Records logged at exactly `level`
    pub fn at(&self, level: Level) -> Vec<LogRecord> {
        self.records().into_iter().filter(|r| r.level == level).collect()
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: Level, message: &str, extras: Option<&Value>) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogRecord {
                level,
                message: message.to_owned(),
                extras: extras.cloned(),
            });
    }
}
