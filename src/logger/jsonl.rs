//! JSONL interaction log: append-only line-delimited JSON.
//!
//! Each line is a self-contained JSON object. Lines are assembled in memory
//! and written atomically via `write_all` so a tailing process never sees a
//! partial line.
//!
//! Three-level fallback chain:
//! 1. The configured log file
//! 2. stderr with a `[SIB-LOG]` prefix
//! 3. Silent discard (the browser must never crash for logging failures)

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions, rename};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SibError};

/// How loud an entry is. The browser only ever emits two levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// Event types matching the browser activity model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionEvent {
    SessionStart,
    SessionStop,
    FilterChange,
    SearchCommit,
    SortChange,
    ViewReset,
    PageChange,
    FormSubmit,
    FormReject,
    CatalogLoad,
    Error,
}

/// A single log line. Only `ts`, `event`, and `severity` always appear;
/// the rest are filled per event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 UTC timestamp.
    pub ts: String,
    pub event: InteractionEvent,
    pub severity: Severity,
    /// Page shown when the event fired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Active category filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Committed search term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    /// Selected sort criterion token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Cards visible after the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<u64>,
    /// Cards in the collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Form field a rejection points at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Error code when the event records a failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Anything that fits no other slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Start an entry timestamped now, all optional slots empty.
    #[must_use]
    pub fn new(event: InteractionEvent, severity: Severity) -> Self {
        Self {
            ts: utc_timestamp(),
            event,
            severity,
            page: None,
            filter: None,
            term: None,
            sort: None,
            visible: None,
            total: None,
            field: None,
            error_code: None,
            error_message: None,
            duration_ms: None,
            details: None,
        }
    }
}

/// Degradation state of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    /// Writing to the configured file.
    Normal,
    /// The file failed, writing to stderr.
    Stderr,
    /// Everything failed or logging is off, silently discarding.
    Discard,
}

/// Append-only JSONL writer with single-slot rotation and fallback.
pub struct InteractionLog {
    path: PathBuf,
    max_size_bytes: u64,
    writer: Option<BufWriter<File>>,
    state: WriterState,
    bytes_written: u64,
}

impl InteractionLog {
    /// Open the log file, degrading through the fallback chain on failure.
    pub fn open(path: PathBuf, max_size_kb: u64) -> Self {
        let mut log = Self {
            path,
            max_size_bytes: max_size_kb.saturating_mul(1024),
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
        };
        match open_append(&log.path) {
            Ok((file, size)) => {
                log.writer = Some(BufWriter::with_capacity(16 * 1024, file));
                log.state = WriterState::Normal;
                log.bytes_written = size;
            }
            Err(_) => {
                log.state = WriterState::Stderr;
                let _ = writeln!(
                    io::stderr(),
                    "[SIB-LOG] log path failed, using stderr: {}",
                    log.path.display()
                );
            }
        }
        log
    }

    /// A log that drops everything. Used when logging is disabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            path: PathBuf::new(),
            max_size_bytes: 0,
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
        }
    }

    /// Write one entry as one atomic line.
    pub fn record(&mut self, entry: &LogEntry) {
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(err) => {
                let _ = writeln!(io::stderr(), "[SIB-LOG] serialize error: {err}");
                return;
            }
        };
        self.write_line(&line);
    }

    pub fn flush(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writer.flush();
        }
    }

    /// Current degradation state, for diagnostics.
    #[must_use]
    pub const fn state(&self) -> &'static str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    // ──────────────────────── internals ────────────────────────

    fn write_line(&mut self, line: &str) {
        if self.state == WriterState::Normal
            && self.bytes_written + line.len() as u64 > self.max_size_bytes
        {
            self.rotate();
        }

        match self.state {
            WriterState::Normal => {
                if let Some(writer) = self.writer.as_mut() {
                    if writer.write_all(line.as_bytes()).is_err() {
                        self.degrade();
                        self.write_line(line);
                        return;
                    }
                    self.bytes_written += line.len() as u64;
                } else {
                    self.degrade();
                    self.write_line(line);
                }
            }
            WriterState::Stderr => {
                let _ = write!(io::stderr(), "[SIB-LOG] {line}");
            }
            WriterState::Discard => {}
        }
    }

    fn degrade(&mut self) {
        self.writer = None;
        match self.state {
            WriterState::Normal => {
                self.state = WriterState::Stderr;
                let _ = writeln!(io::stderr(), "[SIB-LOG] log write failed, using stderr");
            }
            WriterState::Stderr => {
                self.state = WriterState::Discard;
            }
            WriterState::Discard => {}
        }
    }

    /// Single-slot rotation: the full file replaces `.1`, then a fresh
    /// file opens at the primary path.
    fn rotate(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writer.flush();
        }
        self.writer = None;

        let _ = rename(&self.path, rotated_name(&self.path));

        match open_append(&self.path) {
            Ok((file, _)) => {
                self.writer = Some(BufWriter::with_capacity(16 * 1024, file));
                self.bytes_written = 0;
            }
            Err(_) => self.degrade(),
        }
    }
}

// ──────────────────────── helpers ────────────────────────

/// Open the file in append mode, creating parents as needed, and report
/// how many bytes it already holds.
fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SibError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| SibError::io(path, source))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    Ok((file, size))
}

/// Build the rotated filename: `interactions.jsonl` → `interactions.jsonl.1`.
fn rotated_name(base: &Path) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(".1");
    PathBuf::from(name)
}

/// Millisecond-precision RFC 3339 timestamp in UTC.
fn utc_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ──────────────────────── tests ────────────────────────
