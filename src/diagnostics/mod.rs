//! Diagnostic channel.
//!
//! Pipeline failures (fetch errors, parse errors, empty batches, stale
//! responses) are never shown in the dashboard. They are appended here
//! instead, one JSON object per line, to `~/.apichart/diagnostics.jsonl` by
//! default.
//!
//! Writing is best-effort: an unwritable log never interrupts the pipeline.

use std::fmt;
use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::config::schema::DiagnosticsConfig;
use crate::http::PipelineError;

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single line in the diagnostics log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    pub timestamp: String,
    pub level: Level,
    /// Pipeline operation that produced the entry: `discover`, `fetch`, ...
    pub operation: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Handle to the diagnostics log.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    path: Option<PathBuf>,
}

impl Diagnostics {
    /// Build from the `[diagnostics]` config section. Disabled config or an
    /// unresolvable path gives a sink that drops everything.
    pub fn from_config(config: &DiagnosticsConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            path: config::expand_home(&config.path),
        }
    }

    /// Log to an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn record(&self, level: Level, operation: &str, message: &str, url: Option<&str>) {
        let entry = DiagnosticEntry {
            timestamp: Utc::now().to_rfc3339(),
            level,
            operation: operation.to_string(),
            message: message.to_string(),
            url: url.map(str::to_string),
        };
        let _ = self.append(&entry);
    }

    /// Record a failed network call.
    pub fn pipeline_error(&self, operation: &str, error: &PipelineError) {
        self.record(Level::Error, operation, &error.to_string(), Some(error.url()));
    }

    pub fn warn(&self, operation: &str, message: &str) {
        self.record(Level::Warn, operation, message, None);
    }

    pub fn info(&self, operation: &str, message: &str) {
        self.record(Level::Info, operation, message, None);
    }

    fn append(&self, entry: &DiagnosticEntry) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    /// Read every entry, skipping malformed lines. A missing file reads as
    /// empty.
    pub fn read_all(&self) -> Vec<DiagnosticEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<DiagnosticEntry>(&line).ok())
            .collect()
    }

    /// The last `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> Vec<DiagnosticEntry> {
        let mut entries = self.read_all();
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
        entries
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
