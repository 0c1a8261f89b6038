//! Lossless split of text into words and separators.
//!
//! Tokens borrow from the input; concatenating their `text` in order gives
//! the input back byte for byte. Text is walked by extended grapheme
//! cluster, so a combining mark stays with the letter it decorates.

use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;

use crate::markup::{char_ref_len, tag_end};
use crate::unicode::is_word_char;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Letters only.
    Word,
    /// Whitespace run, run of digits / punctuation / symbols, or (markup
    /// mode) a character reference such as `&hellip;`.
    Separator,
    /// A `<...>` span (markup mode only).
    MarkupTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl Token<'_> {
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenizeMode {
    /// Text known to contain no markup.
    #[default]
    Plain,
    /// Tag-like `<...>` spans become `MarkupTag` tokens and character
    /// references stand alone as separators.
    Markup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Letter,
    Space,
    Other,
}

/// A cluster takes the class of its base character.
fn classify(grapheme: &str) -> CharClass {
    let Some(c) = grapheme.chars().next() else {
        return CharClass::Other;
    };
    if is_word_char(c) {
        CharClass::Letter
    } else if c.is_whitespace() {
        CharClass::Space
    } else {
        CharClass::Other
    }
}

/// Length in bytes of a tag-like span starting at `s[0] == '<'`, if any.
///
/// A span needs a letter, `/`, `!` or `?` right after `<` and a closing `>`
/// outside quoted attribute values.
fn tag_len(s: &str) -> Option<usize> {
    let next = *s.as_bytes().get(1)?;
    if !(next.is_ascii_alphabetic() || matches!(next, b'/' | b'!' | b'?')) {
        return None;
    }
    tag_end(s.as_bytes())
}

/// Opaque markup-mode span starting at `rest`, if any.
fn markup_span(rest: &str) -> Option<(TokenKind, usize)> {
    match *rest.as_bytes().first()? {
        b'<' => tag_len(rest).map(|len| (TokenKind::MarkupTag, len)),
        b'&' => char_ref_len(rest.as_bytes()).map(|len| (TokenKind::Separator, len)),
        _ => None,
    }
}

/// Split `text` into tokens.
///
/// The empty string yields no tokens. Any non-empty input (including `"0"`)
/// yields at least one.
pub fn tokenize(text: &str, mode: TokenizeMode) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut run_start = 0;
    let mut run_class: Option<CharClass> = None;
    let mut i = 0;

    while let Some(grapheme) = text[i..].graphemes(true).next() {
        if mode == TokenizeMode::Markup {
            if let Some((kind, len)) = markup_span(&text[i..]) {
                if let Some(class) = run_class.take() {
                    tokens.push(make_token(class, &text[run_start..i]));
                }
                tokens.push(Token {
                    kind,
                    text: &text[i..i + len],
                });
                i += len;
                run_start = i;
                continue;
            }
        }

        let class = classify(grapheme);
        match run_class {
            Some(current) if current == class => {}
            Some(current) => {
                tokens.push(make_token(current, &text[run_start..i]));
                run_start = i;
                run_class = Some(class);
            }
            None => {
                run_start = i;
                run_class = Some(class);
            }
        }
        i += grapheme.len();
    }
    if let Some(class) = run_class {
        tokens.push(make_token(class, &text[run_start..]));
    }
    tokens
}

fn make_token(class: CharClass, text: &str) -> Token<'_> {
    let kind = match class {
        CharClass::Letter => TokenKind::Word,
        CharClass::Space | CharClass::Other => TokenKind::Separator,
    };
    Token { kind, text }
}

/// Tokenize `text` and rebuild it, passing every word through `f`.
pub fn map_words<'a, F>(text: &'a str, mode: TokenizeMode, mut f: F) -> String
where
    F: FnMut(&'a str) -> Cow<'a, str>,
{
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for token in tokenize(text, mode) {
        if token.is_word() {
            out.push_str(&f(token.text));
        } else {
            out.push_str(token.text);
        }
    }
    out
}
