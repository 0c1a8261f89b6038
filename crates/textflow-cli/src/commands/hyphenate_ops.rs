use std::fs;
use std::io::{self, Read};
use std::process;

use serde::Serialize;

use textflow_core::config::{DebugLevel, HyphenationConfig};
use textflow_core::hyphenator::insert_markers;
use textflow_session::HyphenationSession;

use super::{open_session, CliError, SessionSource};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub struct HyphenateOptions {
    pub language: Option<String>,
    pub preserve_structure: bool,
    pub debug: DebugLevel,
    pub stats: bool,
}

impl HyphenateOptions {
    fn config(&self) -> HyphenationConfig {
        let mut config = HyphenationConfig::new()
            .preserving_structure(self.preserve_structure)
            .with_debug(self.debug);
        if let Some(lang) = &self.language {
            config = config.with_language(lang.as_str());
        }
        config
    }
}

/// `-` or no path reads stdin.
fn read_input(input: Option<&str>) -> io::Result<String> {
    match input {
        Some(path) if path != "-" => fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

pub fn hyphenate_cmd(input: Option<&str>, source: &SessionSource, opts: &HyphenateOptions) {
    let text = die!(read_input(input), "Error reading input: {}");
    let cli = die!(open_session(source), "Error: {}");

    let outcome = cli
        .session
        .hyphenate_with_outcome(&text, &opts.config());
    print!("{}", outcome.text);
    for err in &outcome.errors {
        eprintln!("warning: {err}");
    }
    if opts.stats {
        let stats = cli.session.stats();
        eprintln!(
            "status={:?} scans={} cache_hits={} loads={}",
            outcome.status, stats.pattern_scans, stats.word_cache_hits, stats.pattern_loads
        );
    }
    die!(cli.flush(), "Error writing cache: {}");
}

#[derive(Debug, Serialize)]
pub struct WordReport {
    pub word: String,
    pub language: Option<String>,
    pub offsets: Vec<usize>,
    pub hyphenated: String,
}

/// Break points of `word`, rendered with the text marker.
pub fn inspect_word(
    session: &HyphenationSession,
    word: &str,
    language: Option<&str>,
) -> Result<WordReport, CliError> {
    let mut config = HyphenationConfig::new();
    if let Some(lang) = language {
        config = config.with_language(lang);
    }
    let offsets = session.break_points(word, &config)?;
    let hyphenated = insert_markers(word, &offsets, &session.settings().markers.text);
    Ok(WordReport {
        word: word.to_string(),
        language: session.resolve_language(&config).map(String::from),
        offsets,
        hyphenated,
    })
}

pub fn inspect_cmd(words: &[String], source: &SessionSource, language: Option<&str>, json: bool) {
    let cli = die!(open_session(source), "Error: {}");
    let reports: Vec<WordReport> = words
        .iter()
        .map(|w| die!(inspect_word(&cli.session, w, language), "Error: {}"))
        .collect();

    if json {
        let out = die!(serde_json::to_string_pretty(&reports), "Error: {}");
        println!("{out}");
    } else {
        for r in &reports {
            println!(
                "{}\t{}\t{:?}",
                r.hyphenated,
                r.language.as_deref().unwrap_or("-"),
                r.offsets
            );
        }
    }
}
