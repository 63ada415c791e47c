//! Interactive word-translation tool over a flat `key=value` dictionary.
//!
//! See `README.md` for usage and file formats. Each module focuses on a
//! concrete responsibility:
//!
//! - [`cli`] parses the command line; [`config`] resolves it, together with
//!   the startup language menu, into a [`config::Config`].
//! - [`normalize`] turns raw input into dictionary keys.
//! - [`store`] owns the in-memory dictionary and rewrites its file on update.
//! - [`log`] appends one audit line per request to the request log.
//! - [`handler`] resolves a single request in interactive or batch mode.
//! - [`pool`] runs batch-mode requests on a fixed set of worker threads.
//! - [`shell`] is the console loop tying the above together.
//!
//! Unit tests live next to each module; `tests/` drives whole sessions and
//! the built binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod log;
pub mod normalize;
pub mod pool;
pub mod shell;
pub mod store;

pub use error::{Error, Result};
