//! Structure-preserving traversal of inline HTML.
//!
//! A flat scan splits markup into segments; only `Text` segments are handed
//! to the caller's `process` function, everything else is copied through
//! untouched. The scan never builds a tree, so no document/body wrapper is
//! introduced and the output differs from the input only where `process`
//! changed text.
//!
//! Tolerated: unclosed elements, stray `<` that does not start a tag, stray
//! `&` that does not form a character reference. Rejected: a tag, comment,
//! CDATA section or raw-text element that runs off the end of the input.

use tracing::{debug, debug_span};

/// Elements whose body is never text content.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Longest named reference we recognize (`&CounterClockwiseContourIntegral;`).
const MAX_ENTITY_NAME: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Text,
    /// Start or end tag, attributes included.
    Tag,
    Comment,
    /// `<!DOCTYPE ...>` and other `<!...>` declarations.
    Declaration,
    ProcessingInstruction,
    CData,
    /// `&amp;`, `&#173;`, `&#xAD;`.
    CharRef,
    /// Body of a raw-text element such as `<script>`.
    RawText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("unterminated tag at byte {0}")]
    UnterminatedTag(usize),

    #[error("unterminated comment at byte {0}")]
    UnterminatedComment(usize),

    #[error("unterminated CDATA section at byte {0}")]
    UnterminatedCData(usize),

    #[error("unterminated <{element}> element at byte {offset}")]
    UnterminatedRawText { element: String, offset: usize },
}

/// Split `markup` into segments. Concatenating the segments yields `markup`.
pub fn scan(markup: &str) -> Result<Vec<Segment<'_>>, MarkupError> {
    let bytes = markup.as_bytes();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let found = match bytes[i] {
            b'<' => scan_angle(markup, i)?,
            b'&' => char_ref_len(&bytes[i..]).map(|len| (SegmentKind::CharRef, len, None)),
            _ => None,
        };
        let Some((kind, len, raw_element)) = found else {
            i += 1;
            continue;
        };

        if text_start < i {
            segments.push(Segment {
                kind: SegmentKind::Text,
                text: &markup[text_start..i],
            });
        }
        segments.push(Segment {
            kind,
            text: &markup[i..i + len],
        });
        i += len;

        if let Some(element) = raw_element {
            let body_len = raw_text_len(&bytes[i..], element).ok_or_else(|| {
                MarkupError::UnterminatedRawText {
                    element: element.to_string(),
                    offset: i,
                }
            })?;
            if body_len > 0 {
                segments.push(Segment {
                    kind: SegmentKind::RawText,
                    text: &markup[i..i + body_len],
                });
            }
            i += body_len;
        }
        text_start = i;
    }

    if text_start < bytes.len() {
        segments.push(Segment {
            kind: SegmentKind::Text,
            text: &markup[text_start..],
        });
    }
    Ok(segments)
}

/// Classify a `<` at `start`. `Ok(None)` means a stray `<` that is plain text.
///
/// For start tags of raw-text elements the element name is returned so the
/// caller can skip the body.
fn scan_angle(
    markup: &str,
    start: usize,
) -> Result<Option<(SegmentKind, usize, Option<&'static str>)>, MarkupError> {
    let rest = &markup[start..];
    let bytes = rest.as_bytes();
    let Some(&next) = bytes.get(1) else {
        return Ok(None);
    };

    if rest.starts_with("<!--") {
        let end = rest[4..]
            .find("-->")
            .ok_or(MarkupError::UnterminatedComment(start))?;
        return Ok(Some((SegmentKind::Comment, 4 + end + 3, None)));
    }
    if rest.starts_with("<![CDATA[") {
        let end = rest[9..]
            .find("]]>")
            .ok_or(MarkupError::UnterminatedCData(start))?;
        return Ok(Some((SegmentKind::CData, 9 + end + 3, None)));
    }
    let kind = match next {
        b'!' => SegmentKind::Declaration,
        b'?' => SegmentKind::ProcessingInstruction,
        b'/' if bytes.get(2).is_some_and(u8::is_ascii_alphabetic) => SegmentKind::Tag,
        c if c.is_ascii_alphabetic() => SegmentKind::Tag,
        _ => return Ok(None),
    };

    let len = tag_end(bytes).ok_or(MarkupError::UnterminatedTag(start))?;
    let raw_element = if kind == SegmentKind::Tag && next != b'/' && !rest[..len].ends_with("/>") {
        let name_len = bytes[1..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || matches!(**b, b'-' | b':'))
            .count();
        let name = &rest[1..1 + name_len];
        RAW_TEXT_ELEMENTS
            .iter()
            .copied()
            .find(|el| el.eq_ignore_ascii_case(name))
    } else {
        None
    };
    Ok(Some((kind, len, raw_element)))
}

/// Byte length of a tag up to and including its closing `>`, honoring
/// quoted attribute values.
pub(crate) fn tag_end(bytes: &[u8]) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(1) {
        match (quote, b) {
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i + 1),
            (None, _) => {}
        }
    }
    None
}

/// Byte length of a character reference at `bytes[0] == b'&'`, if valid.
pub(crate) fn char_ref_len(bytes: &[u8]) -> Option<usize> {
    let body = &bytes[1..];
    let (digits, skip): (fn(&u8) -> bool, usize) = match body {
        [b'#', b'x' | b'X', ..] => (u8::is_ascii_hexdigit, 2),
        [b'#', ..] => (u8::is_ascii_digit, 1),
        [c, ..] if c.is_ascii_alphabetic() => (u8::is_ascii_alphanumeric, 0),
        _ => return None,
    };
    let count = body[skip..]
        .iter()
        .take(MAX_ENTITY_NAME + 1)
        .take_while(|b| digits(b))
        .count();
    if count == 0 || count > MAX_ENTITY_NAME {
        return None;
    }
    let semi = 1 + skip + count;
    (bytes.get(semi) == Some(&b';')).then_some(semi + 1)
}

/// Length of a raw-text body up to (not including) its `</element` end tag.
fn raw_text_len(bytes: &[u8], element: &str) -> Option<usize> {
    let name = element.as_bytes();
    let mut i = 0;
    while i + 2 + name.len() <= bytes.len() {
        if bytes[i] == b'<'
            && bytes[i + 1] == b'/'
            && bytes[i + 2..i + 2 + name.len()].eq_ignore_ascii_case(name)
        {
            let after = bytes.get(i + 2 + name.len());
            if matches!(after, None | Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r')) {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Apply `process` to every text region of `markup`, copying everything
/// else verbatim.
///
/// On failure the input is not modified; callers fall back to the original
/// markup.
pub fn apply_preserving_structure<F>(markup: &str, mut process: F) -> Result<String, MarkupError>
where
    F: FnMut(&str) -> String,
{
    let _span = debug_span!("apply_preserving_structure", len = markup.len()).entered();
    let segments = scan(markup)?;
    let mut out = String::with_capacity(markup.len() + markup.len() / 8);
    let mut text_regions = 0usize;
    for segment in &segments {
        if segment.kind == SegmentKind::Text {
            text_regions += 1;
            out.push_str(&process(segment.text));
        } else {
            out.push_str(segment.text);
        }
    }
    debug!(segments = segments.len(), text_regions);
    Ok(out)
}
