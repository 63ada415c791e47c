//! Per-request orchestration: normalize, look up, optionally ask the
//! operator, report and log.

use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use tracing::{debug, warn};

use crate::{log::RequestLog, normalize::normalize, store::DictionaryStore};

/// Result reported when no translation is known and none was supplied.
pub const NOT_FOUND: &str = "Translation not found.";

/// How the handler resolves a dictionary miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Ask the operator for the missing translation and store it.
    #[default]
    Interactive,
    /// Answer with [`NOT_FOUND`]; never prompts and never writes the dictionary.
    Batch,
}

#[derive(Debug, Clone)]
pub struct RequestHandler {
    store: Arc<DictionaryStore>,
    log: Arc<RequestLog>,
    mode: Mode,
}

impl RequestHandler {
    pub fn new(store: Arc<DictionaryStore>, log: Arc<RequestLog>, mode: Mode) -> Self {
        Self { store, log, mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn store(&self) -> &DictionaryStore {
        &self.store
    }

    pub fn request_log(&self) -> &RequestLog {
        &self.log
    }

    /// Resolves `raw` and returns the translation that was reported.
    ///
    /// `input` is only read in [`Mode::Interactive`], for the operator's reply
    /// on a miss. Dictionary and log failures are reported on `out` and do not
    /// fail the request; only console I/O errors are returned.
    pub fn handle<R, W>(&self, raw: &str, input: &mut R, out: &mut W) -> io::Result<String>
    where
        R: BufRead + ?Sized,
        W: Write + ?Sized,
    {
        let key = normalize(raw);
        let translated = match self.store.get(&key) {
            Some(found) => {
                debug!(%key, "dictionary hit");
                found
            }
            None => self.resolve_miss(raw, &key, input, out)?,
        };

        writeln!(out, "Translation: {translated}")?;

        if let Err(error) = self.log.log(raw, &translated) {
            warn!(%error, "request log append failed");
            writeln!(out, "Error writing to log file: {error}")?;
        }
        out.flush()?;

        Ok(translated)
    }

    fn resolve_miss<R, W>(
        &self,
        raw: &str,
        key: &str,
        input: &mut R,
        out: &mut W,
    ) -> io::Result<String>
    where
        R: BufRead + ?Sized,
        W: Write + ?Sized,
    {
        debug!(%key, mode = ?self.mode, "dictionary miss");
        if self.mode == Mode::Batch {
            return Ok(NOT_FOUND.to_string());
        }

        writeln!(out, "Translation not found for '{raw}'.")?;
        write!(out, "Please provide a translation: ")?;
        out.flush()?;

        let Some(supplied) = read_reply(input)? else {
            return Ok(NOT_FOUND.to_string());
        };

        match self.store.set(key, supplied.as_str()) {
            Ok(()) => writeln!(out, "Translation saved: {raw} -> {supplied}")?,
            Err(error) => {
                warn!(%error, %key, "translation kept in memory only");
                writeln!(out, "Error saving translation to file: {error}")?;
            }
        }

        Ok(supplied)
    }
}

/// Reads the operator's reply. End of input and blank replies yield `None`.
fn read_reply<R: BufRead + ?Sized>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let reply = line.trim();
    Ok((!reply.is_empty()).then(|| reply.to_string()))
}
