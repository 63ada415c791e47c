//! The read-translate-print loop.
//!
//! [`open`] loads the dictionary and builds the [`RequestHandler`] shared by
//! every request of the session. [`run_session`] then reads one request per
//! line until `exit` (any case) or end of input. In interactive mode each
//! request is handled on the calling thread, prompt included; in batch mode
//! lines are handed to a [`WorkerPool`] which is drained before returning.

use std::{
    io::{BufRead, Write},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::{info, warn};

use crate::{
    config::Config,
    error::Result,
    handler::{Mode, RequestHandler},
    log::RequestLog,
    pool::WorkerPool,
    store::{DictionaryStore, LoadOutcome},
};

/// Case-insensitive command that ends the session.
pub const EXIT_COMMAND: &str = "exit";

const LINE_ENDINGS: &[char] = &['\n', '\r'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Requests accepted and handled during the session.
    pub requests: usize,
}

/// One line of console input, classified.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Request(String),
    Exit,
    End,
}

/// Loads the configured dictionary, reports how that went on `out` and wires
/// up the request handler.
pub fn open<W: Write + ?Sized>(config: &Config, out: &mut W) -> Result<RequestHandler> {
    let (store, outcome) = DictionaryStore::load(&config.dictionary, config.missing);
    let path = config.dictionary.display();
    match outcome {
        LoadOutcome::Loaded { .. } => writeln!(out, "Loaded translations from {path}")?,
        LoadOutcome::Created => {
            writeln!(out, "Translations file not found. Creating a new one...")?;
            writeln!(out, "New translations file created: {path}")?;
        }
        LoadOutcome::Bundled { .. } => {
            writeln!(out, "Translations file not found. Loaded bundled defaults for {path}")?
        }
        LoadOutcome::NotFound => writeln!(out, "Translations file not found: {path}")?,
        LoadOutcome::Failed(error) => {
            warn!(%error, "starting with an empty dictionary");
            writeln!(out, "Error loading translations file: {error}")?;
        }
    }

    let log = RequestLog::new(&config.log);
    Ok(RequestHandler::new(Arc::new(store), Arc::new(log), config.mode))
}

/// Runs the loop until the exit command or end of input.
///
/// `workers` is only used in [`Mode::Batch`].
pub fn run_session<R, W>(
    handler: RequestHandler,
    workers: usize,
    mut input: R,
    out: W,
) -> Result<SessionSummary>
where
    R: BufRead,
    W: Write + Send + 'static,
{
    let out = Arc::new(Mutex::new(out));
    {
        let mut console = lock(&out);
        writeln!(console, "Welcome to the Translation Tool!")?;
        writeln!(console, "Enter text to translate (type '{EXIT_COMMAND}' to quit):")?;
    }

    let (requests, exited) = match handler.mode() {
        Mode::Interactive => run_synchronous(&handler, &mut input, &out)?,
        Mode::Batch => run_pooled(handler, workers, &mut input, &out)?,
    };

    let mut console = lock(&out);
    if exited {
        writeln!(console, "Exiting the Translation Tool. Goodbye!")?;
    }
    console.flush()?;
    info!(requests, "session finished");
    Ok(SessionSummary { requests })
}

fn run_synchronous<R, W>(
    handler: &RequestHandler,
    input: &mut R,
    out: &Mutex<W>,
) -> Result<(usize, bool)>
where
    R: BufRead,
    W: Write,
{
    let mut requests = 0;
    loop {
        prompt(out)?;
        match read_line(input)? {
            Line::Request(text) => {
                handler.handle(&text, input, &mut *lock(out))?;
                requests += 1;
            }
            Line::Exit => return Ok((requests, true)),
            Line::End => return Ok((requests, false)),
        }
    }
}

fn run_pooled<R, W>(
    handler: RequestHandler,
    workers: usize,
    input: &mut R,
    out: &Arc<Mutex<W>>,
) -> Result<(usize, bool)>
where
    R: BufRead,
    W: Write + Send + 'static,
{
    let pool = WorkerPool::spawn(workers, handler, Arc::clone(out))?;
    let exited = loop {
        prompt(out)?;
        match read_line(input)? {
            Line::Request(text) => pool.submit(text)?,
            Line::Exit => break true,
            Line::End => break false,
        }
    };
    Ok((pool.shutdown(), exited))
}

fn prompt<W: Write>(out: &Mutex<W>) -> Result<()> {
    let mut console = lock(out);
    write!(console, "> ")?;
    console.flush()?;
    Ok(())
}

/// Reads until a non-blank line, the exit command or end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Line> {
    let mut buffer = String::new();
    loop {
        buffer.clear();
        if input.read_line(&mut buffer)? == 0 {
            return Ok(Line::End);
        }
        let text = buffer.trim_end_matches(LINE_ENDINGS);
        if text.trim().eq_ignore_ascii_case(EXIT_COMMAND) {
            return Ok(Line::Exit);
        }
        if !text.trim().is_empty() {
            return Ok(Line::Request(text.to_string()));
        }
    }
}

fn lock<W>(out: &Mutex<W>) -> MutexGuard<'_, W> {
    out.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn exit_is_case_insensitive() {
        for text in ["exit\n", "EXIT\n", "Exit\r\n", "  eXiT  \n"] {
            assert_eq!(read_line(&mut Cursor::new(text)).expect("read"), Line::Exit);
        }
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut input = Cursor::new("\n   \r\n  Hello \nexit\n");
        assert_eq!(
            read_line(&mut input).expect("read"),
            Line::Request("  Hello ".into())
        );
        assert_eq!(read_line(&mut input).expect("read"), Line::Exit);
        assert_eq!(read_line(&mut input).expect("read"), Line::End);
    }

    #[test]
    fn exit_must_be_the_whole_line() {
        assert_eq!(
            read_line(&mut Cursor::new("exit now\n")).expect("read"),
            Line::Request("exit now".into())
        );
    }
}
