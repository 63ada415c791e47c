//! Append-only audit trail of translation requests.
//!
//! Each entry is one line:
//!
//! ```text
//! Original: <raw input> | Translated: <result> | Timestamp: yyyy-MM-dd HH:mm:ss
//! ```
//!
//! The timestamp is local wall-clock time. The file is never read back or
//! truncated by the tool.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use chrono::{DateTime, Local};

use crate::error::{Error, Result};

pub const DEFAULT_LOG_FILE: &str = "translation_log.txt";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One translation request, as written to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub original: String,
    pub translated: String,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    pub fn now(original: impl Into<String>, translated: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translated: translated.into(),
            timestamp: Local::now(),
        }
    }

    pub fn to_line(&self) -> String {
        format!(
            "Original: {} | Translated: {} | Timestamp: {}\n",
            self.original,
            self.translated,
            self.timestamp.format(TIMESTAMP_FORMAT)
        )
    }
}

/// Handle to the request log file.
///
/// The file is opened, appended to and closed on every call. Appends are
/// serialised by `write_lock` so lines from concurrent workers never
/// interleave.
#[derive(Debug)]
pub struct RequestLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RequestLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends an entry for `original` -> `translated`, stamped with the
    /// current time.
    pub fn log(&self, original: &str, translated: &str) -> Result<()> {
        self.append(&LogEntry::now(original, translated))
    }

    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        let line = entry.to_line();
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(|source| Error::AppendLog {
                path: self.path.clone(),
                source,
            })
    }
}
