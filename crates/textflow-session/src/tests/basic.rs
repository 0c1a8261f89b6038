use std::sync::Arc;
use std::thread;

use textflow_core::config::{DebugLevel, HyphenationConfig};
use textflow_core::language::LanguageCode;
use textflow_core::pattern::MemoryPatternStore;

use super::*;
use crate::{
    FixedLanguageContext, HyphenationError, HyphenationStatus, MappedLanguageContext,
    SessionBuilder,
};

fn text_marker() -> HyphenationConfig {
    HyphenationConfig::new().with_debug(DebugLevel::TextMarker)
}

// --- Scenarios ---

#[test]
fn test_konfiguration_single_pattern() {
    let session = session_with(Arc::new(MemoryPatternStore::with_language("de", &["kon"])));
    assert_eq!(
        session.hyphenate("Konfiguration", &text_marker()),
        "Kon·figuration"
    );
}

#[test]
fn test_konfiguration_full_set() {
    let session = make_session();
    let out = session.hyphenate("Konfiguration", &text_marker());
    assert!(out.starts_with("Kon·"));
    assert_eq!(out, "Kon·fig·uration");
}

#[test]
fn test_short_words_unchanged() {
    let session = make_session();
    let outcome = session.hyphenate_with_outcome("an zu", &text_marker());
    assert_eq!(outcome.text, "an zu");
    assert_eq!(outcome.status, HyphenationStatus::Hyphenated);
}

#[test]
fn test_preserve_structure_paragraph() {
    let session = make_session();
    let config = text_marker().preserving_structure(true);
    assert_eq!(
        session.hyphenate("<p>Entwicklung</p>", &config),
        "<p>Ent·wick·lung</p>"
    );
}

#[test]
fn test_empty_text_no_lookup() {
    let session = make_session();
    let outcome = session.hyphenate_with_outcome("", &text_marker());
    assert_eq!(outcome.text, "");
    assert_eq!(outcome.status, HyphenationStatus::Disabled);
    assert_eq!(session.stats().pattern_loads, 0);
}

#[test]
fn test_obvious_marker_same_offsets() {
    let session = make_session();
    let obvious = session.hyphenate(
        "Entwicklung",
        &HyphenationConfig::new().with_debug(DebugLevel::ObviousMarker),
    );
    assert_eq!(obvious, "Ent▼wick▼lung");
    let soft = session.hyphenate("Entwicklung", &HyphenationConfig::new());
    assert_eq!(soft, "Ent\u{AD}wick\u{AD}lung");
}

#[test]
fn test_inline_tags_flat_mode() {
    let session = make_session();
    let out = session.hyphenate(
        "<p>Dies ist ein <strong>Beispieltext</strong></p>",
        &HyphenationConfig::new(),
    );
    assert_eq!(
        out,
        "<p>Dies ist ein <strong>Bei\u{AD}spiel\u{AD}text</strong></p>"
    );
}

// --- Disabled paths ---

#[test]
fn test_disabled_is_identity() {
    let session = make_session();
    let outcome = session.hyphenate_with_outcome("Konfiguration", &HyphenationConfig::disabled());
    assert_eq!(outcome.text, "Konfiguration");
    assert_eq!(outcome.status, HyphenationStatus::Disabled);
    assert_eq!(session.stats().pattern_loads, 0);
}

#[test]
fn test_language_none_disables() {
    let session = make_session();
    let config = HyphenationConfig::from_record([("enable_textflow", "none")]);
    let outcome = session.hyphenate_with_outcome("Konfiguration", &config);
    assert_eq!(outcome.text, "Konfiguration");
    assert_eq!(outcome.status, HyphenationStatus::Disabled);

    let config = HyphenationConfig::new().with_language("none");
    assert_eq!(session.hyphenate("Konfiguration", &config), "Konfiguration");
    assert_eq!(session.stats().pattern_loads, 0);
}

#[test]
fn test_zero_is_content() {
    let session = make_session();
    let outcome = session.hyphenate_with_outcome("0", &HyphenationConfig::new());
    assert_eq!(outcome.text, "0");
    assert_eq!(outcome.status, HyphenationStatus::Hyphenated);
    assert_eq!(session.stats().pattern_loads, 1);
}

// --- Language resolution ---

#[test]
fn test_explicit_language() {
    let session = make_session();
    let config = text_marker().with_language("en");
    assert_eq!(session.hyphenate("hyphenation", &config), "hy·phen·ation");
    // German patterns do not apply to the English set.
    assert_eq!(session.hyphenate("Entwicklung", &config), "Entwicklung");
}

#[test]
fn test_context_language() {
    let session = SessionBuilder::new(make_test_store())
        .settings(test_settings())
        .language_context(Arc::new(FixedLanguageContext::new("en")))
        .build();
    let outcome = session.hyphenate_with_outcome("hyphenation", &text_marker());
    assert_eq!(outcome.text, "hy·phen·ation");
    assert_eq!(outcome.language, Some(LanguageCode::new("en")));

    // Explicit language beats the context; `all` defers to it.
    let de = text_marker().with_language("de");
    assert_eq!(session.hyphenate("Entwicklung", &de), "Ent·wick·lung");
    let all = HyphenationConfig::from_record([("enable_textflow", "all"), ("debug", "1")]);
    assert_eq!(session.hyphenate("hyphenation", &all), "hy·phen·ation");
}

#[test]
fn test_mapped_context_language() {
    let settings = test_settings();
    let context = MappedLanguageContext::new(1, settings.language.clone());
    let session = SessionBuilder::new(make_test_store())
        .settings(settings)
        .language_context(Arc::new(context))
        .build();
    assert_eq!(
        session.resolve_language(&HyphenationConfig::new()),
        Some(LanguageCode::new("en"))
    );
}

#[test]
fn test_default_language_is_german() {
    let session = make_session();
    let outcome = session.hyphenate_with_outcome("Entwicklung", &text_marker());
    assert_eq!(outcome.language, Some(LanguageCode::new("de")));
    assert_eq!(outcome.text, "Ent·wick·lung");
}

#[test]
fn test_unsupported_language_degrades() {
    let session = make_session();
    let config = text_marker().with_language("xx");
    let outcome = session.hyphenate_with_outcome("Entwicklung", &config);
    assert_eq!(outcome.text, "Ent·wick·lung");
    assert_eq!(outcome.status, HyphenationStatus::Hyphenated);
    assert_eq!(outcome.language, Some(LanguageCode::new("de")));
    assert_eq!(
        outcome.errors,
        vec![HyphenationError::ConfigInvalid {
            language: LanguageCode::new("xx")
        }]
    );
    assert!(outcome.is_degraded());
}

// --- Pattern availability ---

#[test]
fn test_no_patterns_for_language() {
    let session = make_session();
    let config = HyphenationConfig::new().with_language("fr");
    let outcome = session.hyphenate_with_outcome("Configuration", &config);
    assert_eq!(outcome.text, "Configuration");
    assert_eq!(outcome.status, HyphenationStatus::PatternsUnavailable);
    assert_eq!(
        outcome.errors,
        vec![HyphenationError::PatternsUnavailable {
            language: LanguageCode::new("fr")
        }]
    );
}

#[test]
fn test_store_failure_passes_through() {
    let session = session_with(Arc::new(FailingStore));
    let outcome = session.hyphenate_with_outcome("Konfiguration", &HyphenationConfig::new());
    assert_eq!(outcome.text, "Konfiguration");
    assert_eq!(outcome.status, HyphenationStatus::PatternsUnavailable);
}

#[test]
fn test_break_points_diagnostic() {
    let session = make_session();
    let config = HyphenationConfig::new();
    assert_eq!(session.break_points("Konfiguration", &config).unwrap(), vec![3, 6]);
    assert!(session.break_points("Haus", &config).unwrap().is_empty());
    assert!(session
        .break_points("Konfiguration", &HyphenationConfig::new().with_language("none"))
        .unwrap()
        .is_empty());
    assert!(matches!(
        session.break_points("Configuration", &HyphenationConfig::new().with_language("fr")),
        Err(HyphenationError::PatternsUnavailable { .. })
    ));
}

// --- Text shapes ---

#[test]
fn test_case_preserved() {
    let store = MemoryPatternStore::with_language("de", &["pro", "gram", "mie"]);
    let session = session_with(Arc::new(store));
    let upper = session.hyphenate("PROGRAMMIERUNG", &text_marker());
    let mixed = session.hyphenate("Programmierung", &text_marker());
    assert_eq!(upper, "PRO·GRAM·MIE·RUNG");
    assert_eq!(mixed, "Pro·gram·mie·rung");
}

#[test]
fn test_punctuation_and_numbers_untouched() {
    let session = make_session();
    let out = session.hyphenate("Konfiguration, 2024: Entwicklung!", &text_marker());
    assert_eq!(out, "Kon·fig·uration, 2024: Ent·wick·lung!");
}

#[test]
fn test_whitespace_preserved() {
    let session = make_session();
    let out = session.hyphenate("  Entwicklung\n\tKonfiguration  ", &text_marker());
    assert_eq!(out, "  Ent·wick·lung\n\tKon·fig·uration  ");
}

// --- Concurrency ---

#[test]
fn test_session_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<crate::HyphenationSession>();
}

#[test]
fn test_concurrent_calls_agree() {
    let session = Arc::new(make_session());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                let debug = if i % 2 == 0 {
                    DebugLevel::TextMarker
                } else {
                    DebugLevel::ObviousMarker
                };
                let config = HyphenationConfig::new().with_debug(debug);
                (debug, session.hyphenate("Entwicklung der Konfiguration", &config))
            })
        })
        .collect();
    for handle in handles {
        let (debug, out) = handle.join().unwrap();
        let expected = match debug {
            DebugLevel::TextMarker => "Ent·wick·lung der Kon·fig·uration",
            _ => "Ent▼wick▼lung der Kon▼fig▼uration",
        };
        assert_eq!(out, expected);
    }
}
