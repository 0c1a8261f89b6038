use std::fs;
use std::path::Path;
use std::process;

use serde::Serialize;

use textflow_core::pattern::{MemoryPatternStore, Pattern, PatternSet};

use crate::pattern_file::{format_pattern_list, FilePatternStore, PatternFormat};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LanguageInfo {
    pub language: String,
    pub patterns: usize,
    /// After case folding and deduplication.
    pub distinct: usize,
    pub max_len: usize,
}

/// Per-language summary, sorted by language.
pub fn pattern_info(patterns: Vec<Pattern>) -> Vec<LanguageInfo> {
    let store = MemoryPatternStore::from_patterns(patterns);
    store
        .stats()
        .into_iter()
        .map(|(language, count)| {
            let of_language: Vec<Pattern> = store
                .iter()
                .filter(|p| p.language == language)
                .cloned()
                .collect();
            let set = PatternSet::new(language.clone(), of_language);
            LanguageInfo {
                language: language.to_string(),
                patterns: count,
                distinct: set.distinct_count(),
                max_len: set.max_pattern_len(),
            }
        })
        .collect()
}

fn load(file: &str, format: PatternFormat, default_language: Option<&str>) -> Vec<Pattern> {
    let mut store = FilePatternStore::new(file, format);
    if let Some(lang) = default_language {
        store = store.with_default_language(lang);
    }
    die!(store.load(), "Error reading {file}: {}")
}

pub fn info_cmd(file: &str, format: PatternFormat, default_language: Option<&str>, json: bool) {
    let info = pattern_info(load(file, format, default_language));
    if json {
        let out = die!(serde_json::to_string_pretty(&info), "Error: {}");
        println!("{out}");
        return;
    }
    println!("File: {file}");
    for i in &info {
        println!(
            "  {}: {} patterns ({} distinct, longest {})",
            i.language, i.patterns, i.distinct, i.max_len
        );
    }
    let total: usize = info.iter().map(|i| i.patterns).sum();
    println!("Total: {total} patterns in {} languages", info.len());
}

/// Rewrite any supported source as a sorted `language pattern` list.
pub fn convert_cmd(
    input: &str,
    output: Option<&str>,
    format: PatternFormat,
    default_language: Option<&str>,
) {
    let patterns = load(input, format, default_language);
    let list = format_pattern_list(&patterns);
    let lines = list.lines().count();
    match output {
        Some(path) if path != "-" => {
            die!(fs::write(Path::new(path), &list), "Error writing {path}: {}");
            eprintln!("Wrote {path} ({lines} patterns from {})", patterns.len());
        }
        _ => print!("{list}"),
    }
}
