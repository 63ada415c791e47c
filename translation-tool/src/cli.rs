use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{config::LanguagePair, log::DEFAULT_LOG_FILE, pool::DEFAULT_WORKERS};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Language pair to translate into. Skips the startup menu.
    #[arg(long, value_enum)]
    pub language: Option<LanguagePair>,

    /// Dictionary file to use instead of the language's default file.
    #[arg(long, value_name = "PATH")]
    pub dict: Option<PathBuf>,

    /// File every translation request is appended to.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    pub log: PathBuf,

    /// How unknown words are handled.
    #[arg(long, value_enum, default_value_t = ModeArg::Interactive)]
    pub mode: ModeArg,

    /// Number of worker threads used in batch mode.
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// What to do when the dictionary file does not exist yet.
    #[arg(long, value_enum, default_value_t = MissingArg::Create)]
    pub missing: MissingArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Prompt for missing translations and save them.
    Interactive,
    /// Report missing translations and keep going; requests run on a worker pool.
    Batch,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingArg {
    /// Create an empty dictionary file.
    Create,
    /// Load the built-in dictionary with the same file name.
    Bundled,
}
