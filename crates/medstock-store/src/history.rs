//! Append-only action history.
//!
//! Each entry is one line of the form `[YYYY-MM-DD HH:MM:SS] message`,
//! stamped with local time. Appending is best-effort: a failed write is
//! logged and otherwise ignored so that it never blocks an inventory change.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use time::macros::format_description;
use tracing::warn;

use crate::error::{Error, Result};
use crate::store::ensure_parent_dir;

/// A parsed history line.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HistoryEntry {
    /// The bracketed timestamp, without brackets, if the line has one.
    pub timestamp: Option<String>,
    /// Everything after the timestamp.
    pub message: String,
}

impl HistoryEntry {
    /// Split a raw line into timestamp and message.
    pub fn parse(line: &str) -> Self {
        if let Some(rest) = line.strip_prefix('[') {
            if let Some((timestamp, message)) = rest.split_once(']') {
                return Self {
                    timestamp: Some(timestamp.to_string()),
                    message: message.strip_prefix(' ').unwrap_or(message).to_string(),
                };
            }
        }
        Self {
            timestamp: None,
            message: line.to_string(),
        }
    }
}

/// Handle to a history file.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `message` stamped with the current local time.
    ///
    /// Failures are logged at warn level and swallowed.
    pub fn append(&self, message: &str) {
        if let Err(e) = self.try_append(message) {
            warn!("Failed to write history entry: {}", e);
        }
    }

    /// Append `message`, reporting write failures.
    pub fn try_append(&self, message: &str) -> Result<()> {
        self.append_at(local_now(), message)
    }

    /// Append `message` with an explicit timestamp.
    pub fn append_at(&self, at: OffsetDateTime, message: &str) -> Result<()> {
        ensure_parent_dir(&self.path)?;
        let line = format_entry(at, message);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        writeln!(file, "{}", line).map_err(|source| self.io_error(source))
    }

    /// Every line ever appended, in order.
    ///
    /// Returns `None` when the file is missing or holds no entries.
    pub fn read_all(&self) -> Result<Option<Vec<String>>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        let lines: Vec<String> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();

        Ok((!lines.is_empty()).then_some(lines))
    }

    /// Every entry, split into timestamp and message.
    pub fn entries(&self) -> Result<Option<Vec<HistoryEntry>>> {
        Ok(self
            .read_all()?
            .map(|lines| lines.iter().map(|l| HistoryEntry::parse(l)).collect()))
    }

    /// Copy the history file to `dest`, returning the bytes copied.
    pub fn export_to(&self, dest: &Path) -> Result<u64> {
        if self.read_all()?.is_none() {
            return Err(Error::NoHistory(self.path.clone()));
        }
        ensure_parent_dir(dest)?;
        fs::copy(&self.path, dest).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::History {
            path: self.path.clone(),
            source,
        }
    }
}

/// Format a history line: `[YYYY-MM-DD HH:MM:SS] message`.
pub fn format_entry(at: OffsetDateTime, message: &str) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let stamp = at
        .format(&format)
        .unwrap_or_else(|_| at.unix_timestamp().to_string());
    format!("[{}] {}", stamp, message)
}

/// Current wall-clock time in the local offset, falling back to UTC when
/// the offset cannot be determined.
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
