use std::sync::Arc;

use textflow_core::config::{DebugLevel, HyphenationConfig};
use textflow_core::markup::MarkupError;
use textflow_core::pattern::MemoryPatternStore;

use super::*;
use crate::{HyphenationError, HyphenationStatus};

fn preserve() -> HyphenationConfig {
    HyphenationConfig::new()
        .with_debug(DebugLevel::TextMarker)
        .preserving_structure(true)
}

#[test]
fn test_attributes_untouched() {
    let session = make_session();
    let input = r#"<a href="/konfiguration" title="Entwicklung">Entwicklung</a>"#;
    let expected = r#"<a href="/konfiguration" title="Entwicklung">Ent·wick·lung</a>"#;
    assert_eq!(session.hyphenate(input, &preserve()), expected);
    // The flat path splits tags off as well.
    let flat = HyphenationConfig::new().with_debug(DebugLevel::TextMarker);
    assert_eq!(session.hyphenate(input, &flat), expected);
}

#[test]
fn test_nested_inline_markup() {
    let session = make_session();
    assert_eq!(
        session.hyphenate(
            "<p>Dies ist ein <strong>Beispieltext</strong></p>",
            &preserve()
        ),
        "<p>Dies ist ein <strong>Bei·spiel·text</strong></p>"
    );
}

#[test]
fn test_no_wrapper_introduced() {
    let session = make_session();
    let out = session.hyphenate("Entwicklung <br/> Konfiguration", &preserve());
    assert_eq!(out, "Ent·wick·lung <br/> Kon·fig·uration");
}

#[test]
fn test_character_references_opaque() {
    let session = make_session();
    assert_eq!(
        session.hyphenate("Konfiguration&amp;Entwicklung&hellip;", &preserve()),
        "Kon·fig·uration&amp;Ent·wick·lung&hellip;"
    );
}

#[test]
fn test_script_and_comment_skipped() {
    let session = make_session();
    let input = "<!-- Entwicklung --><script>var Konfiguration = 1;</script><p>Entwicklung</p>";
    let expected =
        "<!-- Entwicklung --><script>var Konfiguration = 1;</script><p>Ent·wick·lung</p>";
    assert_eq!(session.hyphenate(input, &preserve()), expected);
}

#[test]
fn test_unclosed_elements_tolerated() {
    let session = make_session();
    let outcome = session.hyphenate_with_outcome("<p>Entwicklung<p>Konfiguration", &preserve());
    assert_eq!(outcome.status, HyphenationStatus::Hyphenated);
    assert_eq!(outcome.text, "<p>Ent·wick·lung<p>Kon·fig·uration");
}

#[test]
fn test_unterminated_tag_passes_through() {
    let session = make_session();
    let input = "<p>Entwicklung</p><a href=\"x";
    let outcome = session.hyphenate_with_outcome(input, &preserve());
    assert_eq!(outcome.text, input);
    assert_eq!(outcome.status, HyphenationStatus::MarkupParseFailure);
    assert_eq!(
        outcome.errors,
        vec![HyphenationError::MarkupParseFailure(
            MarkupError::UnterminatedTag(18)
        )]
    );
}

#[test]
fn test_unterminated_script_passes_through() {
    let session = make_session();
    let input = "<p>Entwicklung</p><script>let x = 1;";
    assert_eq!(session.hyphenate(input, &preserve()), input);
}

#[test]
fn test_multibyte_content_round_trips() {
    let session = make_session();
    let input = "<p title=\"Größe\">Übergrößen — Entwicklung 日本語</p>";
    let out = session.hyphenate(input, &preserve());
    assert_eq!(out, "<p title=\"Größe\">Übergrößen — Ent·wick·lung 日本語</p>");
    assert_eq!(out.replace('·', ""), input);
}

fn flat() -> HyphenationConfig {
    HyphenationConfig::new().with_debug(DebugLevel::TextMarker)
}

#[test]
fn test_flat_path_keeps_character_references() {
    let session = session_with(Arc::new(MemoryPatternStore::with_language(
        "de",
        &["hel"],
    )));
    assert_eq!(
        session.hyphenate("Warte&hellip; wir helfen", &flat()),
        "Warte&hellip; wir hel·fen"
    );
    assert_eq!(session.hyphenate("&hellip;", &preserve()), "&hellip;");
}

#[test]
fn test_flat_path_quoted_angle_bracket() {
    let session = make_session();
    let input = r#"<a title="1>2 Entwicklung">Entwicklung</a>"#;
    let expected = r#"<a title="1>2 Entwicklung">Ent·wick·lung</a>"#;
    assert_eq!(session.hyphenate(input, &flat()), expected);
    assert_eq!(session.hyphenate(input, &preserve()), expected);
}

#[test]
fn test_decomposed_word_hyphenated_whole() {
    let session = session_with(Arc::new(MemoryPatternStore::with_language(
        "de",
        &["u\u{308}b"],
    )));
    assert_eq!(
        session.hyphenate("U\u{308}bergro\u{308}ße", &flat()),
        "U\u{308}b·ergro\u{308}ße"
    );
}
