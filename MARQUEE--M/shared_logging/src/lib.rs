#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Structured JSON-lines logging shared by the Marquee crates.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Log severity level, ordered from least to most severe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Debug information.
    Debug,
    /// Informational events.
    Info,
    /// Warning indicator.
    Warn,
    /// Error indicator.
    Error,
}

/// Structured log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Timestamp in ISO8601.
    pub timestamp: DateTime<Utc>,
    /// Module emitting the log.
    pub module: String,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Arbitrary JSON payload for metrics/fields.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl LogRecord {
    /// Creates a record with the provided info.
    #[must_use]
    pub fn new(module: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            module: module.into(),
            level,
            message: message.into(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Attaches a single metadata field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

enum Sink {
    File { path: PathBuf, writer: Mutex<File> },
    Memory(Mutex<Vec<LogRecord>>),
}

/// Thread-safe JSON logger with append-only semantics.
///
/// Records below the configured minimum level are dropped. The memory sink
/// keeps records in process for tests and embedders that do not want files.
pub struct JsonLogger {
    sink: Sink,
    min_level: LogLevel,
}

impl std::fmt::Debug for JsonLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sink = match &self.sink {
            Sink::File { path, .. } => format!("file:{}", path.display()),
            Sink::Memory(_) => "memory".to_string(),
        };
        f.debug_struct("JsonLogger")
            .field("sink", &sink)
            .field("min_level", &self.min_level)
            .finish()
    }
}

impl JsonLogger {
    /// Creates or opens a logger appending to the given path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating log dir {}", parent.display()))?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        Ok(Self {
            sink: Sink::File {
                path,
                writer: Mutex::new(file),
            },
            min_level: LogLevel::Debug,
        })
    }

    /// Creates a logger that keeps records in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            sink: Sink::Memory(Mutex::new(Vec::new())),
            min_level: LogLevel::Debug,
        }
    }

    /// Drops every record less severe than `level`.
    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Writes a log record as a JSON line (or buffers it in memory).
    pub fn log(&self, record: &LogRecord) -> Result<()> {
        if record.level < self.min_level {
            return Ok(());
        }
        match &self.sink {
            Sink::File { writer, .. } => {
                let mut writer = writer.lock();
                serde_json::to_writer(&mut *writer, record)?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
            Sink::Memory(records) => records.lock().push(record.clone()),
        }
        Ok(())
    }

    /// Snapshot of buffered records. Always empty for file sinks.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        match &self.sink {
            Sink::Memory(records) => records.lock().clone(),
            Sink::File { .. } => Vec::new(),
        }
    }

    /// Returns the underlying file path, if file-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.sink {
            Sink::File { path, .. } => Some(path),
            Sink::Memory(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_json_lines() {
        let dir = tempdir().unwrap();
        let logger = JsonLogger::new(dir.path().join("nested").join("test.log")).unwrap();
        logger
            .log(&LogRecord::new("module", LogLevel::Info, "hello").with_field("score", 71.5))
            .unwrap();
        let content = fs::read_to_string(logger.path().unwrap()).unwrap();
        assert!(content.contains("\"message\":\"hello\""));
        assert!(content.contains("\"score\":71.5"));
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn memory_sink_filters_by_level() {
        let logger = JsonLogger::in_memory().with_min_level(LogLevel::Warn);
        logger
            .log(&LogRecord::new("engine", LogLevel::Debug, "noise"))
            .unwrap();
        logger
            .log(&LogRecord::new("engine", LogLevel::Error, "boom"))
            .unwrap();
        let records = logger.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "boom");
        assert!(logger.path().is_none());
    }

    #[test]
    fn levels_are_ordered() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }
}
