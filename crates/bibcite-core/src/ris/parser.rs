//! RIS parser implementation
//!
//! RIS is line oriented: `XX  - value`, one tag per line, entries opened by
//! `TY` and closed by `ER`. Lines that do not start with a tag continue the
//! previous tag's value. An entry cut off by the next `TY` or by the end of
//! input is reported and skipped; its neighbours are unaffected.

use tracing::debug;

use super::entry::{RisEntry, RisType};
use crate::error::ParseError;

/// Entries plus per-entry errors, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RisParseResult {
    pub entries: Vec<RisEntry>,
    pub errors: Vec<ParseError>,
}

/// Parse an RIS document
pub fn parse(input: &str) -> RisParseResult {
    let mut result = RisParseResult::default();
    let mut current: Option<RisEntry> = None;
    let mut index = 0usize;

    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    for (line_no, raw) in input.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let line_no = line_no as u32 + 1;

        match parse_ris_line(line) {
            Some(("TY", value)) => {
                if let Some(unterminated) = current.take() {
                    result.errors.push(missing_terminator(index, &unterminated));
                    index += 1;
                }
                let mut entry = RisEntry::new(RisType::from_code(value));
                entry.line = line_no;
                current = Some(entry);
            }
            Some(("ER", _)) => match current.take() {
                Some(entry) => {
                    result.entries.push(entry);
                    index += 1;
                }
                None => debug!(line = line_no, "ER without an open entry"),
            },
            Some((tag, value)) => match current.as_mut() {
                Some(entry) => entry.add_tag(tag, value.trim()),
                None => debug!(line = line_no, tag, "Tag outside of an entry"),
            },
            None => match current.as_mut().and_then(|e| e.tags.last_mut()) {
                Some(previous) => {
                    let continuation = line.trim();
                    if !previous.value.is_empty() {
                        previous.value.push(' ');
                    }
                    previous.value.push_str(continuation);
                }
                None => debug!(line = line_no, "Stray text outside of a tag"),
            },
        }
    }

    if let Some(unterminated) = current.take() {
        result.errors.push(missing_terminator(index, &unterminated));
    }

    result
}

fn missing_terminator(index: usize, entry: &RisEntry) -> ParseError {
    ParseError {
        index,
        line: Some(entry.line),
        key: entry.id().map(str::to_string),
        reason: "missing ER tag".to_string(),
    }
}

/// Split `XX  - value` into tag and value.
///
/// Accepts the standard two-space separator as well as the one-space and
/// no-space variants some exporters write; `ER  -` has an empty value.
fn parse_ris_line(line: &str) -> Option<(&str, &str)> {
    let tag = line.get(0..2)?;
    let tag_ok = tag.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && tag.chars().nth(1).is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if !tag_ok {
        return None;
    }

    let rest = line[2..].trim_start_matches(' ');
    let value = rest.strip_prefix('-')?;
    if value.is_empty() {
        return Some((tag, ""));
    }
    let value = value.strip_prefix(' ')?;
    Some((tag, value))
}
