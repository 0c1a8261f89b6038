//! Parsers for the pattern sources a host typically ships.
//!
//! - Plain lists: one pattern per line, optionally prefixed by its language
//!   (`de kon`). `#` starts a comment.
//! - SQL dumps: `INSERT INTO <table> [(cols)] VALUES (..), (..);` statements
//!   as exported from a pattern table. When a column list names `language`
//!   and `pattern`, those columns are used; otherwise the first two string
//!   literals of each row are taken as language and pattern.

use crate::language::LanguageCode;

use super::Pattern;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

fn parse_err(line: usize, reason: impl Into<String>) -> SourceError {
    SourceError::Parse {
        line,
        reason: reason.into(),
    }
}

/// Parse a plain pattern list.
///
/// Lines holding a single token need `default_language`; lines holding two
/// tokens are `language pattern`.
pub fn parse_pattern_list(
    content: &str,
    default_language: Option<&LanguageCode>,
) -> Result<Vec<Pattern>, SourceError> {
    let mut patterns = Vec::new();
    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [text] => {
                let lang = default_language.ok_or_else(|| {
                    parse_err(line_no, "pattern without language and no default given")
                })?;
                patterns.push(Pattern::new(lang.clone(), *text));
            }
            [lang, text] => patterns.push(Pattern::new(*lang, *text)),
            _ => return Err(parse_err(line_no, "expected `pattern` or `language pattern`")),
        }
    }
    Ok(patterns)
}

#[derive(Debug, Clone, PartialEq)]
enum SqlToken {
    Word(String),
    Str(String),
    LParen,
    RParen,
    Comma,
    Semicolon,
}

/// Split SQL into tokens, dropping `--` and `/* */` comments.
fn lex_sql(sql: &str) -> Result<Vec<(SqlToken, usize)>, SourceError> {
    let mut tokens = Vec::new();
    let mut chars = sql.chars().peekable();
    let mut line = 1;

    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            c if c.is_whitespace() => {}
            '(' => tokens.push((SqlToken::LParen, line)),
            ')' => tokens.push((SqlToken::RParen, line)),
            ',' => tokens.push((SqlToken::Comma, line)),
            ';' => tokens.push((SqlToken::Semicolon, line)),
            '-' if chars.peek() == Some(&'-') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let start = line;
                let mut prev = '\0';
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                    }
                    if prev == '*' && c == '/' {
                        closed = true;
                        break;
                    }
                    prev = c;
                }
                if !closed {
                    return Err(parse_err(start, "unterminated block comment"));
                }
            }
            '\'' => {
                let start = line;
                let mut value = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\'' if chars.peek() == Some(&'\'') => {
                            chars.next();
                            value.push('\'');
                        }
                        '\'' => {
                            closed = true;
                            break;
                        }
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                value.push(escaped);
                            }
                        }
                        '\n' => {
                            line += 1;
                            value.push('\n');
                        }
                        c => value.push(c),
                    }
                }
                if !closed {
                    return Err(parse_err(start, "unterminated string literal"));
                }
                tokens.push((SqlToken::Str(value), start));
            }
            '`' | '"' => {
                let quote = c;
                let mut ident = String::new();
                for c in chars.by_ref() {
                    if c == quote {
                        break;
                    }
                    ident.push(c);
                }
                tokens.push((SqlToken::Word(ident), line));
            }
            c => {
                let mut word = String::from(c);
                while let Some(&n) = chars.peek() {
                    if n.is_whitespace() || "(),;'`\"".contains(n) {
                        break;
                    }
                    word.push(n);
                    chars.next();
                }
                tokens.push((SqlToken::Word(word), line));
            }
        }
    }
    Ok(tokens)
}

fn is_keyword(token: &SqlToken, keyword: &str) -> bool {
    matches!(token, SqlToken::Word(w) if w.eq_ignore_ascii_case(keyword))
}

/// Parse `INSERT ... VALUES` statements into patterns.
///
/// Statements other than `INSERT` are ignored.
pub fn parse_sql_dump(sql: &str) -> Result<Vec<Pattern>, SourceError> {
    let tokens = lex_sql(sql)?;
    let mut patterns = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        if !is_keyword(&tokens[i].0, "INSERT") {
            i += 1;
            continue;
        }

        // Optional column list between the table name and VALUES.
        let mut columns: Vec<String> = Vec::new();
        while i < tokens.len() && !is_keyword(&tokens[i].0, "VALUES") {
            match &tokens[i].0 {
                SqlToken::Semicolon => break,
                SqlToken::LParen => {
                    columns.clear();
                    i += 1;
                    while i < tokens.len() && tokens[i].0 != SqlToken::RParen {
                        if let SqlToken::Word(w) = &tokens[i].0 {
                            columns.push(w.to_ascii_lowercase());
                        }
                        i += 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        if i >= tokens.len() || !is_keyword(&tokens[i].0, "VALUES") {
            continue;
        }
        i += 1;

        let lang_col = columns.iter().position(|c| c == "language");
        let pattern_col = columns.iter().position(|c| c == "pattern");

        // Rows until the terminating semicolon.
        while i < tokens.len() && tokens[i].0 != SqlToken::Semicolon {
            let (token, line) = &tokens[i];
            match token {
                SqlToken::Comma => i += 1,
                SqlToken::LParen => {
                    let row_line = *line;
                    let mut fields: Vec<Option<String>> = vec![None];
                    i += 1;
                    loop {
                        let Some((token, _)) = tokens.get(i) else {
                            return Err(parse_err(row_line, "unterminated VALUES row"));
                        };
                        match token {
                            SqlToken::RParen => break,
                            SqlToken::Comma => fields.push(None),
                            SqlToken::Str(s) => {
                                if let Some(last) = fields.last_mut() {
                                    *last = Some(s.clone());
                                }
                            }
                            SqlToken::Semicolon => {
                                return Err(parse_err(row_line, "unterminated VALUES row"))
                            }
                            _ => {}
                        }
                        i += 1;
                    }
                    i += 1;
                    patterns.push(row_to_pattern(&fields, lang_col, pattern_col, row_line)?);
                }
                _ => {
                    return Err(parse_err(*line, "expected `(` starting a VALUES row"));
                }
            }
        }
    }

    Ok(patterns)
}

fn row_to_pattern(
    fields: &[Option<String>],
    lang_col: Option<usize>,
    pattern_col: Option<usize>,
    line: usize,
) -> Result<Pattern, SourceError> {
    let (lang, text) = match (lang_col, pattern_col) {
        (Some(l), Some(p)) => (
            fields.get(l).cloned().flatten(),
            fields.get(p).cloned().flatten(),
        ),
        _ => {
            let mut strings = fields.iter().flatten();
            (strings.next().cloned(), strings.next().cloned())
        }
    };
    match (lang, text) {
        (Some(lang), Some(text)) if !lang.trim().is_empty() && !text.trim().is_empty() => {
            Ok(Pattern::new(lang.as_str(), text.trim()))
        }
        _ => Err(parse_err(line, "row needs a language and a pattern string")),
    }
}
