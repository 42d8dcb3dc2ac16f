use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use serde_json::Value;
use shared_logging::{JsonLogger, LogLevel, LogRecord};

/// Telemetry builder for the prediction engine.
pub struct PredictionTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    in_memory: bool,
    min_level: LogLevel,
}

impl PredictionTelemetryBuilder {
    /// Creates a new builder scoped to a module label.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            in_memory: false,
            min_level: LogLevel::Debug,
        }
    }

    /// Appends JSON lines to the given file.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Keeps records in memory instead of writing a file.
    #[must_use]
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Drops records below `level`.
    #[must_use]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Builds telemetry.
    pub fn build(self) -> Result<PredictionTelemetry> {
        let logger = match (self.log_path, self.in_memory) {
            (Some(path), _) => Some(JsonLogger::new(path)?),
            (None, true) => Some(JsonLogger::in_memory()),
            (None, false) => None,
        };
        Ok(PredictionTelemetry {
            inner: Arc::new(TelemetryInner {
                module: self.module,
                logger: logger.map(|logger| logger.with_min_level(self.min_level)),
            }),
        })
    }
}

/// Telemetry handle shared by engine clones.
#[derive(Clone)]
pub struct PredictionTelemetry {
    inner: Arc<TelemetryInner>,
}

impl fmt::Debug for PredictionTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionTelemetry")
            .field("module", &self.inner.module)
            .finish()
    }
}

struct TelemetryInner {
    module: String,
    logger: Option<JsonLogger>,
}

impl PredictionTelemetry {
    /// Returns a builder.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> PredictionTelemetryBuilder {
        PredictionTelemetryBuilder::new(module)
    }

    /// Logs a message with object metadata.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        if let Some(logger) = &self.inner.logger {
            let mut record = LogRecord::new(&self.inner.module, level, message);
            if let Value::Object(fields) = metadata {
                for (key, value) in fields {
                    record = record.with_field(key, value);
                }
            }
            logger.log(&record)?;
        }
        Ok(())
    }

    /// Records buffered by an in-memory sink.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.inner
            .logger
            .as_ref()
            .map(JsonLogger::records)
            .unwrap_or_default()
    }

    /// File the records are appended to, if file-backed.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.inner.logger.as_ref().and_then(JsonLogger::path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn telemetry_writes_log_file() {
        let tmp = tempdir().unwrap();
        let log_path = tmp.path().join("predict.log");
        let telemetry = PredictionTelemetry::builder("prediction")
            .log_path(&log_path)
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Info, "prediction.completed", json!({ "probability": 73.6 }))
            .unwrap();
        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("prediction.completed"));
        assert!(content.contains("\"module\":\"prediction\""));
        assert_eq!(telemetry.log_path(), Some(log_path.as_path()));
    }

    #[test]
    fn in_memory_respects_min_level() {
        let telemetry = PredictionTelemetry::builder("prediction")
            .in_memory()
            .min_level(LogLevel::Info)
            .build()
            .unwrap();
        telemetry.log(LogLevel::Debug, "skipped", json!({})).unwrap();
        telemetry.log(LogLevel::Warn, "kept", json!({ "field": "genre" })).unwrap();
        let records = telemetry.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].metadata["field"], "genre");
    }

    #[test]
    fn disabled_telemetry_is_silent() {
        let telemetry = PredictionTelemetry::builder("prediction").build().unwrap();
        telemetry.log(LogLevel::Error, "nothing", Value::Null).unwrap();
        assert!(telemetry.records().is_empty());
        assert!(telemetry.log_path().is_none());
    }
}
