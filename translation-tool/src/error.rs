use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while serving a translation session.
///
/// Dictionary and log errors never abort a session: callers report them and
/// carry on with whatever state is still in memory.
#[derive(Error, Debug)]
pub enum Error {
    /// The dictionary file exists but could not be read.
    #[error("failed to read dictionary {}: {source}", .path.display())]
    ReadDictionary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The missing dictionary file could not be created.
    #[error("failed to create dictionary {}: {source}", .path.display())]
    CreateDictionary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Rewriting the dictionary snapshot failed; the update only lives in memory.
    #[error("failed to write dictionary {}: {source}", .path.display())]
    WriteDictionary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to append to request log {}: {source}", .path.display())]
    AppendLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Reading from or writing to the console failed.
    #[error("console I/O failed: {0}")]
    Console(#[from] io::Error),
    #[error("failed to start worker thread: {0}")]
    SpawnWorker(#[source] io::Error),
    /// Every worker has exited, so the request cannot be accepted.
    #[error("worker pool is closed")]
    PoolClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
