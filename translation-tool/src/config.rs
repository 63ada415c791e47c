//! Resolved session settings.
//!
//! [`Config::resolve`] merges the command line with the interactive language
//! menu. The menu is only shown when neither `--language` nor `--dict` picks
//! the dictionary.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use clap::ValueEnum;
use tracing::info;

use crate::{
    cli::{Cli, MissingArg, ModeArg},
    handler::Mode,
    store::MissingDictionary,
};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguagePair {
    /// English to Spanish
    #[default]
    #[value(name = "es")]
    EnglishToSpanish,
    /// English to French
    #[value(name = "fr")]
    EnglishToFrench,
}

impl LanguagePair {
    /// Menu order; the menu number is the index plus one.
    pub const ALL: [LanguagePair; 2] = [Self::EnglishToSpanish, Self::EnglishToFrench];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::EnglishToSpanish => "translations_es.properties",
            Self::EnglishToFrench => "translations_fr.properties",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::EnglishToSpanish => "English to Spanish",
            Self::EnglishToFrench => "English to French",
        }
    }

    /// Maps a menu answer (`"1"`, `"2"`) to a pair.
    pub fn from_choice(choice: &str) -> Option<Self> {
        let index = choice.trim().parse::<usize>().ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dictionary: PathBuf,
    pub log: PathBuf,
    pub mode: Mode,
    pub workers: usize,
    pub missing: MissingDictionary,
}

impl Config {
    /// Builds the session settings, asking for a language pair on `input`
    /// when the command line does not determine the dictionary.
    pub fn resolve<R, W>(cli: Cli, input: &mut R, out: &mut W) -> io::Result<Self>
    where
        R: BufRead + ?Sized,
        W: Write + ?Sized,
    {
        let dictionary = match (cli.dict, cli.language) {
            (Some(path), _) => path,
            (None, Some(language)) => PathBuf::from(language.file_name()),
            (None, None) => PathBuf::from(choose_language(input, out)?.file_name()),
        };

        let config = Self {
            dictionary,
            log: cli.log,
            mode: cli.mode.into(),
            workers: cli.workers.max(1),
            missing: cli.missing.into(),
        };
        info!(
            dictionary = %config.dictionary.display(),
            log = %config.log.display(),
            mode = ?config.mode,
            workers = config.workers,
            "session configured"
        );
        Ok(config)
    }
}

/// Shows the numbered language menu and reads one answer. Anything that is
/// not a listed number, including end of input, falls back to Spanish.
pub fn choose_language<R, W>(input: &mut R, out: &mut W) -> io::Result<LanguagePair>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "Welcome! Please choose a language for translation!")?;
    for (number, pair) in LanguagePair::ALL.iter().enumerate() {
        writeln!(out, "{}. {}", number + 1, pair.label())?;
    }
    write!(out, "Enter your choice (1 or 2): ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    match LanguagePair::from_choice(&answer) {
        Some(pair) => Ok(pair),
        None => {
            let fallback = LanguagePair::default();
            writeln!(out, "Invalid choice. Defaulting to {}.", fallback.label())?;
            Ok(fallback)
        }
    }
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Interactive => Mode::Interactive,
            ModeArg::Batch => Mode::Batch,
        }
    }
}

impl From<MissingArg> for MissingDictionary {
    fn from(missing: MissingArg) -> Self {
        match missing {
            MissingArg::Create => MissingDictionary::Create,
            MissingArg::Bundled => MissingDictionary::Bundled,
        }
    }
}
