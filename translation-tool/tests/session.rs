use std::{
    fs,
    io::{self, Cursor, Write},
    path::Path,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use tempfile::TempDir;
use translation_tool::{
    config::Config,
    handler::{Mode, NOT_FOUND},
    shell::{self, SessionSummary},
    store::{DictionaryStore, MissingDictionary},
};

/// Console sink the test can read back after the session hands it to workers.
#[derive(Clone, Default)]
struct SharedConsole(Arc<Mutex<Vec<u8>>>);

impl SharedConsole {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("console lock")).into_owned()
    }
}

impl Write for SharedConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("console lock").write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn config(dir: &TempDir, mode: Mode) -> Config {
    Config {
        dictionary: dir.path().join("translations_es.properties"),
        log: dir.path().join("translation_log.txt"),
        mode,
        workers: 3,
        missing: MissingDictionary::Create,
    }
}

fn run(config: &Config, input: &str) -> Result<(SessionSummary, String)> {
    let console = SharedConsole::default();
    let mut startup = console.clone();
    let handler = shell::open(config, &mut startup)?;
    let summary = shell::run_session(
        handler,
        config.workers,
        Cursor::new(input.to_string()),
        console.clone(),
    )?;
    Ok((summary, console.contents()))
}

fn log_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn assert_well_formed(line: &str) {
    let original = line.find("Original:").expect("Original: field");
    let translated = line.find("Translated:").expect("Translated: field");
    let timestamp = line.find("Timestamp:").expect("Timestamp: field");
    assert!(original < translated && translated < timestamp, "{line}");
}

#[test]
fn miss_then_supply_is_remembered_across_restarts() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config(&dir, Mode::Interactive);

    let (summary, console) = run(&config, "cat\ngato\ncat\nexit\n")?;

    assert_eq!(summary.requests, 2);
    assert!(console.contains("Translations file not found. Creating a new one..."));
    assert!(console.contains("Translation not found for 'cat'."));
    assert_eq!(console.matches("Please provide a translation: ").count(), 1);
    assert!(console.contains("Translation saved: cat -> gato"));
    assert_eq!(console.matches("Translation: gato").count(), 2);
    assert!(console.ends_with("Exiting the Translation Tool. Goodbye!\n"));

    let (store, _) = DictionaryStore::load(&config.dictionary, MissingDictionary::Create);
    assert_eq!(store.get("cat").as_deref(), Some("gato"));

    let (_, console) = run(&config, "CAT\nexit\n")?;
    assert!(console.contains("Loaded translations from"));
    assert!(!console.contains("Please provide a translation"));
    assert!(console.contains("Translation: gato"));
    Ok(())
}

#[test]
fn case_and_whitespace_variants_share_one_entry() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config(&dir, Mode::Interactive);

    let (summary, console) = run(&config, "  Hello \nhola\nhello\nHELLO\nexit\n")?;

    assert_eq!(summary.requests, 3);
    assert_eq!(console.matches("Please provide a translation: ").count(), 1);
    assert_eq!(console.matches("Translation: hola").count(), 3);
    Ok(())
}

#[test]
fn log_has_one_well_formed_line_per_request() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config(&dir, Mode::Interactive);

    run(&config, "dog\nperro\ndog\n\nGood Morning\nbuenos días\nexit\n")?;
    run(&config, "good morning\nEXIT\n")?;

    let lines = log_lines(&config.log);
    assert_eq!(lines.len(), 4);
    for line in &lines {
        assert_well_formed(line);
    }
    assert!(lines[3].starts_with("Original: good morning | Translated: buenos días | "));
    Ok(())
}

#[test]
fn supplied_translations_with_separator_characters_reload() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config(&dir, Mode::Interactive);

    run(&config, "1+1=2\ndos\n#hashtag\netiqueta\n!wow\nguau\nexit\n")?;

    let (store, _) = DictionaryStore::load(&config.dictionary, MissingDictionary::Create);
    assert_eq!(store.len(), 3);
    assert_eq!(store.get("1+1=2").as_deref(), Some("dos"));
    assert_eq!(store.get("#hashtag").as_deref(), Some("etiqueta"));
    assert_eq!(store.get("!wow").as_deref(), Some("guau"));

    let (_, console) = run(&config, "1+1=2\n#HashTag\nexit\n")?;
    assert!(!console.contains("Please provide a translation"));
    assert!(console.contains("Translation: dos"));
    assert!(console.contains("Translation: etiqueta"));
    Ok(())
}

#[test]
fn end_of_input_ends_session_without_goodbye() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config(&dir, Mode::Interactive);

    let (summary, console) = run(&config, "")?;

    assert_eq!(summary.requests, 0);
    assert!(!console.contains("Goodbye"));
    assert!(log_lines(&config.log).is_empty());
    Ok(())
}

#[test]
fn batch_mode_logs_every_pooled_request() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config(&dir, Mode::Batch);
    const REQUESTS: usize = 40;

    let input: String = (0..REQUESTS)
        .map(|i| format!("mystery {i}\n"))
        .chain(std::iter::once("exit\n".to_string()))
        .collect();
    let (summary, console) = run(&config, &input)?;

    assert_eq!(summary.requests, REQUESTS);
    assert_eq!(console.matches(&format!("Translation: {NOT_FOUND}")).count(), REQUESTS);
    assert!(!console.contains("Please provide"));
    assert!(console.ends_with("Exiting the Translation Tool. Goodbye!\n"));

    let lines = log_lines(&config.log);
    assert_eq!(lines.len(), REQUESTS);
    for i in 0..REQUESTS {
        let prefix = format!("Original: mystery {i} | Translated: {NOT_FOUND} | Timestamp: ");
        assert_eq!(lines.iter().filter(|line| line.starts_with(&prefix)).count(), 1);
    }

    let (store, _) = DictionaryStore::load(&config.dictionary, MissingDictionary::Create);
    assert!(store.is_empty());
    Ok(())
}

#[test]
fn batch_mode_answers_known_words() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = config(&dir, Mode::Batch);
    config.missing = MissingDictionary::Bundled;

    let (summary, console) = run(&config, "Thank You\nwater\nexit\n")?;

    assert_eq!(summary.requests, 2);
    assert!(console.contains("Loaded bundled defaults"));
    assert!(console.contains("Translation: gracias"));
    assert!(console.contains("Translation: agua"));
    Ok(())
}
