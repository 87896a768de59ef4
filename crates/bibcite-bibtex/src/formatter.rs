//! Writing entries back out as `.bib` text
//!
//! Field values are plain Unicode here; [`escape_value`] turns them into
//! LaTeX that [`crate::decode_latex`] reads back unchanged.

use std::fmt::Write;

use super::entry::BibTeXEntry;

/// Written without escaping
const VERBATIM_FIELDS: &[&str] = &["url", "doi", "eprint", "file"];

/// Name lists; a name written as `{...}` keeps its protecting braces
const NAME_FIELDS: &[&str] = &["author", "editor", "translator"];

/// One entry, fields indented by four spaces, each line ending in a comma
pub fn format_entry(entry: &BibTeXEntry) -> String {
    let mut out = format!("@{}{{{},\n", entry.entry_type.name(), entry.cite_key);
    for field in &entry.fields {
        // Writing to a String cannot fail
        let value = format_field_value(&field.key, &field.value);
        let _ = writeln!(out, "    {} = {},", field.key, value);
    }
    out.push('}');
    out
}

/// Entries separated by a blank line, with a final newline when non-empty
pub fn format_entries(entries: &[BibTeXEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut out = entries.iter().map(format_entry).collect::<Vec<_>>().join("\n\n");
    out.push('\n');
    out
}

/// Format a field value, choosing appropriate delimiters
fn format_field_value(key: &str, value: &str) -> String {
    // Purely numeric values need no delimiters
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return value.to_string();
    }

    let body = if VERBATIM_FIELDS.iter().any(|f| f.eq_ignore_ascii_case(key)) {
        value.to_string()
    } else if NAME_FIELDS.iter().any(|f| f.eq_ignore_ascii_case(key)) {
        escape_name_list(value)
    } else {
        escape_value(value)
    };
    format!("{{{}}}", body)
}

/// Escape each name of an `and`-separated list, keeping the outer braces
/// of brace-protected names such as `{World Health Organization}`
fn escape_name_list(value: &str) -> String {
    split_names(value)
        .into_iter()
        .map(|name| match protected_name(name) {
            Some(inner) => format!("{{{}}}", escape_value(inner)),
            None => escape_value(name),
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Split on top-level ` and `
fn split_names(value: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b' ' if depth == 0 && value[i..].starts_with(" and ") => {
                names.push(&value[start..i]);
                i += 5;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    names.push(&value[start..]);
    names
}

/// Inner text of a name wrapped in one balanced pair of braces
fn protected_name(name: &str) -> Option<&str> {
    let inner = name.strip_prefix('{')?.strip_suffix('}')?;
    let mut depth = 0i32;
    for c in inner.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }
    }
    (depth == 0).then_some(inner)
}

/// Escape a plain-text value so that LaTeX decoding yields it back.
///
/// Besides the characters TeX treats specially, runs that the decoder
/// would read as ligatures (`--`, `''`) are broken with an empty group.
pub fn escape_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => result.push_str("\\textbackslash{}"),
            '{' | '}' | '#' | '$' | '%' | '&' | '_' => {
                result.push('\\');
                result.push(c);
            }
            '~' => result.push_str("\\textasciitilde{}"),
            '^' => result.push_str("\\textasciicircum{}"),
            '`' => result.push_str("\\textasciigrave{}"),
            '-' | '\'' if chars.peek() == Some(&c) => {
                result.push(c);
                result.push_str("{}");
            }
            _ => result.push(c),
        }
    }
    result
}
