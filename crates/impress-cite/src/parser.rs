//! Bibliography entry parser
//!
//! Splits BibTeX source text into entries without building a full grammar:
//!
//! 1. Line breaks are replaced by spaces.
//! 2. Entry markers (`@type{`) are located; each entry runs up to the next
//!    marker or the end of the text.
//! 3. Entries of a recognized type are split into segments on commas at
//!    brace depth 1. The first segment holds the key, the rest are
//!    `name = value` fields.
//!
//! Malformed entries are skipped and reported in [`BibParseResult::errors`];
//! they never abort the rest of the parse.

use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    IResult,
};
use serde::Serialize;

use crate::entry::{BibEntry, BibEntryType};
use crate::error::ParseError;

/// An entry that was skipped while parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BibParseError {
    /// Position among entries of a recognized type (0-based)
    pub index: usize,
    /// Citation key, when it could be extracted
    pub key: Option<String>,
    #[serde(serialize_with = "serialize_display")]
    pub error: ParseError,
}

/// Result of parsing bibliography text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BibParseResult {
    pub entries: Vec<BibEntry>,
    pub errors: Vec<BibParseError>,
}

/// Parse bibliography text into entries, collecting per-entry errors.
pub fn parse(text: &str) -> BibParseResult {
    let content = normalize_line_breaks(text);
    let markers = scan_entry_markers(&content);

    let mut result = BibParseResult::default();
    let mut index = 0;

    for (i, marker) in markers.iter().enumerate() {
        let Some(entry_type) = BibEntryType::parse(marker.entry_type) else {
            continue;
        };
        let end = markers
            .get(i + 1)
            .map_or(content.len(), |next| next.start);
        let span = content[marker.start..end].trim();

        match parse_entry_span(span, entry_type) {
            Ok(entry) => result.entries.push(entry),
            Err((key, error)) => result.errors.push(BibParseError { index, key, error }),
        }
        index += 1;
    }

    result
}

/// Parse bibliography text, keeping only the entries that parsed cleanly.
pub fn parse_entries(text: &str) -> Vec<BibEntry> {
    parse(text).entries
}

fn normalize_line_breaks(text: &str) -> String {
    text.replace(|c: char| c == '\r' || c == '\n', " ")
}

/// Location of an `@type{` token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EntryMarker<'a> {
    start: usize,
    entry_type: &'a str,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Match `@`, a word-character run and `{`, returning the run
fn entry_marker(input: &str) -> IResult<&str, &str> {
    let (rest, _) = char('@')(input)?;
    let (rest, entry_type) = take_while1(is_word_char)(rest)?;
    let (rest, _) = char('{')(rest)?;
    Ok((rest, entry_type))
}

fn scan_entry_markers(content: &str) -> Vec<EntryMarker<'_>> {
    let mut markers = Vec::new();
    let mut pos = 0;

    while let Some(offset) = content[pos..].find('@') {
        let start = pos + offset;
        match entry_marker(&content[start..]) {
            Ok((rest, entry_type)) => {
                markers.push(EntryMarker { start, entry_type });
                pos = content.len() - rest.len();
            }
            Err(_) => pos = start + 1,
        }
    }

    markers
}

/// Split an entry on commas at brace depth 1.
///
/// Scanning stops at the brace that closes the entry; text after it is a
/// comment. Returns the trimmed segments and the brace depth where scanning
/// stopped, which is non-zero when the entry is never closed.
fn split_segments(item: &str) -> (Vec<&str>, i32) {
    let bytes = item.as_bytes();
    let mut depth = 0i32;
    let mut last_split = 0;
    let mut segments = Vec::new();

    for (i, &b) in bytes.iter().enumerate() {
        let escaped = i > 0 && bytes[i - 1] == b'\\';
        match b {
            b'{' if !escaped => depth += 1,
            b'}' if !escaped => {
                depth -= 1;
                if depth == 0 {
                    segments.push(item[last_split..=i].trim());
                    return (segments, depth);
                }
            }
            b',' if depth == 1 => {
                segments.push(item[last_split..i].trim());
                last_split = i + 1;
            }
            _ => {}
        }
    }
    segments.push(item[last_split..].trim());

    (segments, depth)
}

type SpanError = (Option<String>, ParseError);

fn parse_entry_span(span: &str, entry_type: BibEntryType) -> Result<BibEntry, SpanError> {
    let (mut segments, depth) = split_segments(span);

    // Drop the entry's closing brace; with no fields this is the key segment.
    if let Some(last) = segments.last_mut() {
        let segment = *last;
        if let Some(pos) = segment.rfind('}') {
            *last = &segment[..pos];
        }
    }

    let key_segment = segments.first().copied().unwrap_or_default();
    let key = key_segment[key_segment.rfind('{').map_or(0, |p| p + 1)..].trim();
    if key.is_empty() {
        return Err((None, ParseError::EmptyKey));
    }
    if depth != 0 {
        return Err((Some(key.to_string()), ParseError::UnbalancedBraces(depth)));
    }

    let mut entry = BibEntry::new(key, entry_type);
    for segment in segments.iter().skip(1) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (name, value) = parse_field(segment).map_err(|e| (Some(key.to_string()), e))?;
        entry.set_field(name, value);
    }

    Ok(entry)
}

fn parse_field(segment: &str) -> Result<(String, String), ParseError> {
    let (name, value) = segment
        .split_once('=')
        .ok_or_else(|| ParseError::MissingEquals(segment.to_string()))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::EmptyFieldName(segment.to_string()));
    }

    let value = strip_outer_braces(value.trim());
    Ok((name.to_lowercase(), unescape_braces(value)))
}

/// Remove one layer of braces when the value's first `{` closes at its last byte.
fn strip_outer_braces(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'{' || bytes[bytes.len() - 1] != b'}' {
        return value;
    }

    let mut depth = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let escaped = i > 0 && bytes[i - 1] == b'\\';
        match b {
            b'{' if !escaped => depth += 1,
            b'}' if !escaped => {
                depth -= 1;
                if depth == 0 {
                    return if i == bytes.len() - 1 {
                        &value[1..i]
                    } else {
                        value
                    };
                }
            }
            _ => {}
        }
    }

    value
}

fn unescape_braces(value: &str) -> String {
    value.replace("\\{", "{").replace("\\}", "}")
}

fn serialize_display<S: serde::Serializer>(
    error: &ParseError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}
