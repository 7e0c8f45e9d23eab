//! Structured JSON-lines logging for the layout editor.
//!
//! Events carry a level, a dotted target (`cavvy::layout.editor`), a short
//! message and free-form JSON fields. Sinks decide where they go.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

pub type LogFields = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub ts_ms: u128,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "LogFields::is_empty", default)]
    pub fields: LogFields,
}

impl LogEvent {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ts_ms: current_ms(),
            level,
            target: target.into(),
            message: message.into(),
            fields: LogFields::new(),
        }
    }

    pub fn with_fields(
        level: LogLevel,
        target: impl Into<String>,
        message: impl Into<String>,
        fields: LogFields,
    ) -> Self {
        Self {
            fields,
            ..Self::new(level, target, message)
        }
    }
}

fn current_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

pub type LoggingResult<T> = std::result::Result<T, LoggingError>;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("log sink lock poisoned")]
    Poisoned,
}

pub trait LogSink: Send + Sync {
    fn log(&self, event: &LogEvent) -> LoggingResult<()>;
}

/// Cloneable logger handle with a minimum level filter.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    min_level: LogLevel,
}

impl Logger {
    pub fn new<S>(sink: S) -> Self
    where
        S: LogSink + 'static,
    {
        Self::from_arc(Arc::new(sink))
    }

    /// Share a sink the caller keeps a handle to (e.g. a [`MemorySink`]).
    pub fn from_arc(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            min_level: LogLevel::Trace,
        }
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    pub fn log(&self, level: LogLevel, target: &str, message: &str) -> LoggingResult<()> {
        self.log_event(LogEvent::new(level, target, message))
    }

    pub fn log_event(&self, event: LogEvent) -> LoggingResult<()> {
        if !self.enabled(event.level) {
            return Ok(());
        }
        self.sink.log(&event)
    }
}

/// Appends one JSON object per line to `path`.
///
/// When a write would push the file past `max_bytes`, the file is moved to
/// `<path>.1` (replacing any older backup) and a fresh one is started.
/// `max_bytes == 0` never rotates.
pub struct FileSink {
    path: PathBuf,
    max_bytes: u64,
    state: Mutex<FileState>,
}

struct FileState {
    writer: BufWriter<File>,
    written: u64,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>, max_bytes: u64) -> LoggingResult<Self> {
        let path = path.as_ref().to_path_buf();
        let state = open_append(&path)?;
        Ok(Self {
            path,
            max_bytes,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".1");
        PathBuf::from(name)
    }

    fn needs_rotation(&self, state: &FileState, incoming: u64) -> bool {
        self.max_bytes > 0 && state.written > 0 && state.written + incoming > self.max_bytes
    }

    fn rotate(&self, state: &mut FileState) -> LoggingResult<()> {
        state.writer.flush()?;
        std::fs::rename(&self.path, self.backup_path())?;
        *state = open_append(&self.path)?;
        Ok(())
    }
}

fn open_append(path: &Path) -> std::io::Result<FileState> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let written = file.metadata()?.len();
    Ok(FileState {
        writer: BufWriter::new(file),
        written,
    })
}

impl LogSink for FileSink {
    fn log(&self, event: &LogEvent) -> LoggingResult<()> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let mut state = self.state.lock().map_err(|_| LoggingError::Poisoned)?;
        if self.needs_rotation(&state, line.len() as u64) {
            self.rotate(&mut state)?;
        }
        state.writer.write_all(&line)?;
        state.writer.flush()?;
        state.written += line.len() as u64;
        Ok(())
    }
}

/// Keeps events in memory. Hosts embedding the editor can drain it into
/// their own log pipeline.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn drain(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn log(&self, event: &LogEvent) -> LoggingResult<()> {
        self.events
            .lock()
            .map_err(|_| LoggingError::Poisoned)?
            .push(event.clone());
        Ok(())
    }
}

pub fn event_with_fields(
    level: LogLevel,
    target: &str,
    message: &str,
    fields: impl IntoIterator<Item = (String, Value)>,
) -> LogEvent {
    let map: LogFields = fields.into_iter().collect();
    LogEvent::with_fields(level, target, message, map)
}

pub fn json_kv(key: &str, value: impl Into<Value>) -> (String, Value) {
    (key.to_string(), value.into())
}

pub fn json_str(key: &str, value: impl Into<String>) -> (String, Value) {
    (key.to_string(), json!(value.into()))
}
