// SPDX-License-Identifier: MIT

//! Per-node logging shim
//!
//! Nodes with a debug toggle log through a [`NodeLogger`]. When the toggle
//! is off every call is a no-op. When on, each line is prefixed with a UTC
//! timestamp and the node name, and structured arguments are pretty-printed
//! as JSON before being handed to the sink.

use chrono::{DateTime, SecondsFormat, Utc};
use log::Level;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Destination for formatted log lines
pub trait LogSink: Send + Sync {
    fn write(&self, level: Level, line: &str);
}

/// Forwards lines to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacadeSink;

impl LogSink for LogFacadeSink {
    fn write(&self, level: Level, line: &str) {
        log::log!(target: "gemini_nodes", level, "{}", line);
    }
}

/// Conditional logger tagged with a node name
#[derive(Clone)]
pub struct NodeLogger {
    name: String,
    enabled: bool,
    sink: Arc<dyn LogSink>,
}

impl NodeLogger {
    /// Create a logger writing to the `log` facade
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self::with_sink(name, enabled, Arc::new(LogFacadeSink))
    }

    pub fn with_sink(name: impl Into<String>, enabled: bool, sink: Arc<dyn LogSink>) -> Self {
        Self {
            name: name.into(),
            enabled,
            sink,
        }
    }

    /// A logger that never writes
    pub fn disabled(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    pub fn debug(&self, args: &[Value]) {
        self.emit(Level::Debug, args);
    }

    pub fn error(&self, args: &[Value]) {
        self.emit(Level::Error, args);
    }

    fn emit(&self, level: Level, args: &[Value]) {
        if !self.enabled {
            return;
        }
        let line = format_line(&self.name, Utc::now(), args);
        self.sink.write(level, &line);
    }
}

impl fmt::Debug for NodeLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeLogger")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Render one log line: `[timestamp] [name]` followed by the arguments on the next line
pub fn format_line(name: &str, timestamp: DateTime<Utc>, args: &[Value]) -> String {
    let rendered: Vec<String> = args.iter().map(format_arg).collect();
    format!(
        "[{}] [{}]\n{}",
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        name,
        rendered.join(" ")
    )
}

fn format_arg(arg: &Value) -> String {
    match arg {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(arg).unwrap_or_else(|_| arg.to_string())
        }
        primitive => primitive.to_string(),
    }
}
