//! Persistent key-value dictionary backed by a `key=value` text file.
//!
//! The whole mapping is held in memory for the lifetime of the process and
//! the backing file is rewritten from it on every update, so the file is
//! always a complete snapshot.

use std::{
    borrow::Cow,
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Comment line written at the top of every snapshot.
const SNAPSHOT_HEADER: &str = "#Updated translations";

/// Default dictionaries compiled into the binary, keyed by file name.
const BUNDLED: &[(&str, &str)] = &[
    (
        "translations_es.properties",
        include_str!("../assets/translations_es.properties"),
    ),
    (
        "translations_fr.properties",
        include_str!("../assets/translations_fr.properties"),
    ),
];

/// What to do when the dictionary file does not exist at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingDictionary {
    /// Start empty and create an empty file in its place.
    #[default]
    Create,
    /// Fall back to the bundled default with the same file name, if any.
    Bundled,
}

/// How startup loading went. Loading never fails outright; the caller
/// reports the outcome and the session continues.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded { entries: usize },
    Created,
    Bundled { entries: usize },
    NotFound,
    Failed(Error),
}

/// The translation dictionary and its backing file.
///
/// `BTreeMap` keeps snapshots in a stable, sorted order. The mutex is held
/// across "update map, rewrite file" so concurrent writers cannot interleave
/// snapshots.
#[derive(Debug)]
pub struct DictionaryStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl DictionaryStore {
    /// Creates an empty store that will persist to `path` on the first update.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::with_entries(path.into(), BTreeMap::new())
    }

    fn with_entries(path: PathBuf, entries: BTreeMap<String, String>) -> Self {
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Loads the dictionary at `path`.
    ///
    /// Read errors fall back to an empty mapping. A missing file is handled
    /// according to `missing`.
    pub fn load(path: impl Into<PathBuf>, missing: MissingDictionary) -> (Self, LoadOutcome) {
        let path = path.into();
        match fs::read(&path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                if let Cow::Owned(_) = text {
                    warn!(
                        path = %path.display(),
                        "dictionary is not valid UTF-8; undecodable bytes replaced"
                    );
                }
                let entries = parse(&text);
                let count = entries.len();
                info!(path = %path.display(), entries = count, "loaded dictionary");
                (
                    Self::with_entries(path, entries),
                    LoadOutcome::Loaded { entries: count },
                )
            }
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                Self::load_missing(path, missing)
            }
            Err(source) => {
                let error = Error::ReadDictionary {
                    path: path.clone(),
                    source,
                };
                (Self::empty(path), LoadOutcome::Failed(error))
            }
        }
    }

    fn load_missing(path: PathBuf, missing: MissingDictionary) -> (Self, LoadOutcome) {
        match missing {
            MissingDictionary::Create => {
                let created = OpenOptions::new().write(true).create_new(true).open(&path);
                match created {
                    Ok(_) => {
                        info!(path = %path.display(), "created empty dictionary");
                        (Self::empty(path), LoadOutcome::Created)
                    }
                    Err(source) => {
                        let error = Error::CreateDictionary {
                            path: path.clone(),
                            source,
                        };
                        (Self::empty(path), LoadOutcome::Failed(error))
                    }
                }
            }
            MissingDictionary::Bundled => {
                let bundled = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(bundled);
                match bundled {
                    Some(text) => {
                        let entries = parse(text);
                        let count = entries.len();
                        info!(path = %path.display(), entries = count, "loaded bundled dictionary");
                        (
                            Self::with_entries(path, entries),
                            LoadOutcome::Bundled { entries: count },
                        )
                    }
                    None => (Self::empty(path), LoadOutcome::NotFound),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Inserts or replaces `key`, then rewrites the backing file.
    ///
    /// On a write error the new value stays visible in memory but is lost on
    /// the next restart.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let mut entries = self.lock();
        entries.insert(key.into(), value.into());
        fs::write(&self.path, render(&entries)).map_err(|source| Error::WriteDictionary {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), entries = entries.len(), "dictionary persisted");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the bundled default dictionary for `file_name`, if one exists.
pub fn bundled(file_name: &str) -> Option<&'static str> {
    BUNDLED
        .iter()
        .find(|(name, _)| *name == file_name)
        .map(|(_, text)| *text)
}

/// Parses `key=value` lines. Comments (`#`, `!`), blank lines and lines
/// without a usable key are skipped.
///
/// The key ends at the first `=` not preceded by `\`. Backslash escapes
/// (`\n`, `\r`, `\t`, `\\` and `\` before any other character) are
/// resolved in both key and value.
pub fn parse(text: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    for line in text.lines() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some((key, value)) = split_entry(line) else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        entries.insert(key, unescape(value.trim_start()));
    }
    entries
}

/// Splits a line at its first unescaped `=`, returning the unescaped key
/// (unescaped trailing whitespace dropped) and the raw value text.
fn split_entry(line: &str) -> Option<(String, &str)> {
    let mut key = String::new();
    // Length of `key` up to its last character that must be kept.
    let mut significant = 0;
    let mut chars = line.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                if let Some((_, escaped)) = chars.next() {
                    key.push(unescaped_char(escaped));
                    significant = key.len();
                }
            }
            '=' => {
                key.truncate(significant);
                return Some((key, &line[i + 1..]));
            }
            c => {
                key.push(c);
                if !c.is_whitespace() {
                    significant = key.len();
                }
            }
        }
    }
    None
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(unescaped_char(escaped));
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn unescaped_char(escaped: char) -> char {
    match escaped {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        other => other,
    }
}

fn escape_key(key: &str, out: &mut String) {
    for c in key.chars() {
        match c {
            '\\' | '=' | '#' | '!' | ' ' => {
                out.push('\\');
                out.push(c);
            }
            _ => push_escaped_control(c, out),
        }
    }
}

fn escape_value(value: &str, out: &mut String) {
    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            // A leading space would otherwise be trimmed by `parse`.
            ' ' if i == 0 => out.push_str("\\ "),
            _ => push_escaped_control(c, out),
        }
    }
}

fn push_escaped_control(c: char, out: &mut String) {
    match c {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c => out.push(c),
    }
}

fn render(entries: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    out.push_str(SNAPSHOT_HEADER);
    out.push('\n');
    out.push('#');
    out.push_str(&chrono::Local::now().format("%a %b %d %H:%M:%S %Y").to_string());
    out.push('\n');
    for (key, value) in entries {
        escape_key(key, &mut out);
        out.push('=');
        escape_value(value, &mut out);
        out.push('\n');
    }
    out
}
