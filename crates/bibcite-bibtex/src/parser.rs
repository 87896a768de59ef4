//! Two-stage `.bib` reader
//!
//! [`tokenize`] walks the whole input once: it expands `@string` macros,
//! collects `@preamble`s, drops `@comment`s and cuts every other
//! `@type{...}` block into an [`EntryChunk`]. A block whose braces never
//! balance is reported there and scanning resumes at the next line that
//! opens an entry. [`parse_chunk`] turns one chunk into a [`BibTeXEntry`]
//! with nom; chunks do not depend on each other, so callers may parse them
//! in parallel.
//!
//! Values may be braced (nesting allowed), quoted, bare numbers or macro
//! names, joined with `#`. Entries use `{...}` or `(...)`.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{map, opt},
    error::{Error, ErrorKind},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use std::collections::{HashMap, HashSet};

use super::entry::{BibTeXEntry, BibTeXEntryType};

/// Why a single entry was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorReason {
    #[error("unbalanced braces")]
    UnbalancedBraces,
    #[error("missing closing delimiter")]
    MissingTerminator,
    #[error("duplicate field `{0}`")]
    DuplicateField(String),
    #[error("duplicate citation key `{0}`")]
    DuplicateCiteKey(String),
    #[error("invalid syntax: {0}")]
    InvalidSyntax(String),
}

/// A rejected entry. `index` is the zero-based position of the entry among
/// all `@type{...}` entries of the input (`@string`, `@preamble` and
/// `@comment` blocks are not counted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXParseError {
    pub index: usize,
    pub line: u32,
    pub cite_key: Option<String>,
    pub reason: ParseErrorReason,
}

/// One `@type{...}` block cut out of the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryChunk<'a> {
    pub index: usize,
    pub line: u32,
    pub text: &'a str,
}

/// Output of the tokenizing stage
#[derive(Debug, Clone, Default)]
pub struct Tokenized<'a> {
    pub chunks: Vec<EntryChunk<'a>>,
    pub strings: HashMap<String, String>,
    pub preambles: Vec<String>,
    pub errors: Vec<BibTeXParseError>,
}

/// Result of parsing a BibTeX file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BibTeXParseResult {
    pub entries: Vec<BibTeXEntry>,
    pub preambles: Vec<String>,
    pub strings: HashMap<String, String>,
    pub errors: Vec<BibTeXParseError>,
}

/// Parse a BibTeX string.
///
/// Never fails as a whole: well-formed entries are returned alongside one
/// error per malformed entry.
pub fn parse(input: &str) -> BibTeXParseResult {
    let tokenized = tokenize(input);
    let parsed = tokenized
        .chunks
        .iter()
        .map(|chunk| (chunk.index, parse_chunk(chunk, &tokenized.strings)))
        .collect();
    let (entries, errors) = assemble(parsed, tokenized.errors);

    BibTeXParseResult {
        entries,
        preambles: tokenized.preambles,
        strings: tokenized.strings,
        errors,
    }
}

/// Merge per-chunk results (paired with their chunk index), rejecting
/// repeated citation keys and ordering errors by entry index.
///
/// The first occurrence of a key wins; keys compare case-insensitively.
pub fn assemble(
    parsed: Vec<(usize, Result<BibTeXEntry, BibTeXParseError>)>,
    mut errors: Vec<BibTeXParseError>,
) -> (Vec<BibTeXEntry>, Vec<BibTeXParseError>) {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(parsed.len());

    for (index, result) in parsed {
        match result {
            Ok(entry) if seen.insert(entry.cite_key.to_lowercase()) => entries.push(entry),
            Ok(entry) => errors.push(BibTeXParseError {
                index,
                line: entry.line,
                cite_key: Some(entry.cite_key.clone()),
                reason: ParseErrorReason::DuplicateCiteKey(entry.cite_key),
            }),
            Err(error) => errors.push(error),
        }
    }

    errors.sort_by_key(|e| e.index);
    (entries, errors)
}

// ===== Tokenizer =====

/// Built-in month macros
const MONTHS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

enum Scan {
    /// Byte offset just past the closing delimiter
    Closed(usize),
    /// A new entry starts at this offset before the block was closed
    Interrupted(usize),
    Eof,
}

/// Split input into entry chunks, expanding `@string` and `@preamble`
pub fn tokenize(input: &str) -> Tokenized<'_> {
    let mut out = Tokenized::default();
    for (key, value) in MONTHS {
        out.strings.insert(key.to_string(), value.to_string());
    }

    let mut pos = 0;
    let mut index = 0;
    let mut line = 1u32;
    let mut line_cursor = 0;

    while let Some(offset) = input[pos..].find('@') {
        let start = pos + offset;
        line += input[line_cursor..start].matches('\n').count() as u32;
        line_cursor = start;

        let after_at = &input[start + 1..];
        let kind_len = after_at
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
        if kind_len == 0 {
            // Stray @ in free text between entries
            pos = start + 1;
            continue;
        }
        let kind = after_at[..kind_len].to_lowercase();
        let after_kind = &after_at[kind_len..];
        let open_pos = start + 1 + kind_len + (after_kind.len() - after_kind.trim_start().len());
        let special = matches!(kind.as_str(), "string" | "preamble" | "comment");

        let close = match input[open_pos..].chars().next() {
            Some('{') => '}',
            Some('(') => ')',
            _ if special => {
                // `@comment text` and friends without a block
                pos = open_pos;
                continue;
            }
            _ => {
                out.errors.push(BibTeXParseError {
                    index,
                    line,
                    cite_key: None,
                    reason: ParseErrorReason::InvalidSyntax(format!(
                        "expected '{{' after @{}",
                        kind
                    )),
                });
                index += 1;
                pos = open_pos;
                continue;
            }
        };

        match scan_block(input, open_pos, close) {
            Scan::Closed(end) => {
                let body = &input[open_pos + 1..end - 1];
                match kind.as_str() {
                    "comment" => {}
                    "string" => {
                        if let Ok((_, (key, value))) = macro_definition(body, &out.strings) {
                            out.strings.insert(key.to_lowercase(), value);
                        }
                    }
                    "preamble" => {
                        if let Ok((_, text)) = field_value(body.trim(), &out.strings) {
                            out.preambles.push(text);
                        }
                    }
                    _ => {
                        let residue_end = next_entry_start(input, end);
                        if is_stray_entry_text(&input[end..residue_end]) {
                            // Closed early by an extra `}`; the rest of the
                            // entry would otherwise be lost as free text.
                            out.errors.push(BibTeXParseError {
                                index,
                                line,
                                cite_key: peek_cite_key(&input[open_pos + 1..end]),
                                reason: ParseErrorReason::UnbalancedBraces,
                            });
                            index += 1;
                            pos = residue_end;
                            continue;
                        }
                        out.chunks.push(EntryChunk {
                            index,
                            line,
                            text: &input[start..end],
                        });
                        index += 1;
                    }
                }
                pos = end;
            }
            Scan::Interrupted(_) | Scan::Eof if special => {
                pos = skip_line(input, open_pos);
            }
            scan => {
                let end = match scan {
                    Scan::Interrupted(at) => at,
                    _ => input.len(),
                };
                let block = &input[start..end];
                let reason = if block.trim_end().ends_with(close) {
                    ParseErrorReason::UnbalancedBraces
                } else {
                    ParseErrorReason::MissingTerminator
                };
                out.errors.push(BibTeXParseError {
                    index,
                    line,
                    cite_key: peek_cite_key(&input[open_pos + 1..end]),
                    reason,
                });
                index += 1;
                pos = end;
            }
        }
    }

    out
}

fn skip_line(input: &str, from: usize) -> usize {
    input[from..]
        .find('\n')
        .map(|p| from + p + 1)
        .unwrap_or(input.len())
}

/// Find the end of a block opened at `open_pos`
fn scan_block(input: &str, open_pos: usize, close: char) -> Scan {
    let bytes = input.as_bytes();
    let mut depth = 0i32;
    let mut i = open_pos;

    if close == ')' {
        i += 1;
    }

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                // Skip escaped character
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if close == '}' && depth == 0 {
                    return Scan::Closed(i + 1);
                }
                if depth < 0 {
                    depth = 0;
                }
            }
            b')' if close == ')' && depth == 0 => return Scan::Closed(i + 1),
            b'\n' => {
                if let Some(at) = next_line_entry_start(input, i + 1) {
                    return Scan::Interrupted(at);
                }
            }
            _ => {}
        }
        i += 1;
    }

    Scan::Eof
}

/// Offset of the next line opening an entry after `from`, or end of input
fn next_entry_start(input: &str, from: usize) -> usize {
    let mut cursor = from;
    while let Some(newline) = input[cursor..].find('\n') {
        cursor += newline + 1;
        if let Some(at) = next_line_entry_start(input, cursor) {
            return at;
        }
    }
    input.len()
}

/// Text after a closed entry that still belongs to it: a leading comma, a
/// `name = value` field, or a `}` with no matching `{`.
fn is_stray_entry_text(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    if text.starts_with(',') {
        return true;
    }

    let mut depth = 0i32;
    for c in text.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return true;
                }
            }
            _ => {}
        }
    }

    match text.split_once('=') {
        Some((name, value)) => {
            let name = name.trim();
            let value = value.trim_start();
            !name.is_empty()
                && name.chars().all(is_field_name_char)
                && value.starts_with(|c: char| c == '{' || c == '"' || c.is_ascii_digit())
        }
        None => false,
    }
}

/// If the line starting at `from` opens a new entry, return the `@` offset
fn next_line_entry_start(input: &str, from: usize) -> Option<usize> {
    let line = &input[from..];
    let trimmed = line.trim_start_matches([' ', '\t']);
    let at = from + (line.len() - trimmed.len());
    let rest = trimmed.strip_prefix('@')?;
    let kind_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if kind_len == 0 {
        return None;
    }
    let after = rest[kind_len..].trim_start_matches([' ', '\t']);
    (after.starts_with('{') || after.starts_with('(')).then_some(at)
}

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || "_-:./+'".contains(c)
}

fn peek_cite_key(body: &str) -> Option<String> {
    let trimmed = body.trim_start();
    let key: String = trimmed.chars().take_while(|&c| is_key_char(c)).collect();
    let after = trimmed[key.len()..].trim_start();
    (!key.is_empty() && after.starts_with(',')).then_some(key)
}

// ===== Entry parsing =====

/// Parse one chunk produced by [`tokenize`]
pub fn parse_chunk(
    chunk: &EntryChunk<'_>,
    strings: &HashMap<String, String>,
) -> Result<BibTeXEntry, BibTeXParseError> {
    let fail = |cite_key: Option<String>, reason: ParseErrorReason| BibTeXParseError {
        index: chunk.index,
        line: chunk.line,
        cite_key,
        reason,
    };

    let (rest, mut entry) = parse_entry(chunk.text, strings).map_err(|e| {
        let near = match e {
            nom::Err::Error(inner) | nom::Err::Failure(inner) => snippet(inner.input),
            nom::Err::Incomplete(_) => String::new(),
        };
        let text = chunk.text.find(['{', '(']).map(|p| &chunk.text[p + 1..]);
        fail(
            text.and_then(peek_cite_key),
            ParseErrorReason::InvalidSyntax(format!("unexpected input near `{}`", near)),
        )
    })?;

    if !rest.trim().is_empty() {
        return Err(fail(
            Some(entry.cite_key),
            ParseErrorReason::InvalidSyntax(format!("trailing input `{}`", snippet(rest))),
        ));
    }

    let mut seen = HashSet::new();
    for field in &entry.fields {
        if !seen.insert(field.key.to_lowercase()) {
            return Err(fail(
                Some(entry.cite_key.clone()),
                ParseErrorReason::DuplicateField(field.key.to_lowercase()),
            ));
        }
    }

    entry.line = chunk.line;
    Ok(entry)
}

fn snippet(input: &str) -> String {
    input.trim().chars().take(24).collect()
}

type Macros = HashMap<String, String>;

/// Run `inner` with surrounding whitespace stripped
fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_field_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':')
}

fn is_macro_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-')
}

/// `@type{key, name = value, ...}` or `@type(key, ...)`
fn parse_entry<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, BibTeXEntry> {
    let (rest, kind) = preceded(
        pair(char('@'), multispace0),
        take_while1(|c: char| c.is_ascii_alphanumeric()),
    )(input)?;
    let (rest, open) = preceded(multispace0, one_of("{("))(rest)?;
    let close = if open == '{' { '}' } else { ')' };
    let (rest, cite_key) = ws(take_while1(is_key_char))(rest)?;

    // `@misc{key}` carries no field list at all
    let (rest, fields) = opt(preceded(char(','), |i| field_list(i, macros)))(rest)?;
    let (rest, _) = preceded(multispace0, char(close))(rest)?;

    let mut entry = BibTeXEntry::new(cite_key, BibTeXEntryType::from_name(kind));
    for (name, value) in fields.unwrap_or_default() {
        entry.add_field(name, value);
    }
    Ok((rest, entry))
}

/// Comma separated fields; a trailing comma is allowed
fn field_list<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, Vec<(String, String)>> {
    terminated(
        separated_list0(ws(char(',')), |i| field(i, macros)),
        opt(ws(char(','))),
    )(input)
}

fn field<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, (String, String)> {
    let (rest, name) = ws(take_while1(is_field_name_char))(input)?;
    let (rest, value) = preceded(char('='), |i| field_value(i, macros))(rest)?;
    Ok((rest, (name.to_string(), value)))
}

/// Body of `@string{name = value}`
fn macro_definition<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, (String, String)> {
    let (rest, name) = ws(take_while1(is_macro_char))(input)?;
    let (rest, value) = preceded(char('='), |i| field_value(i, macros))(rest)?;
    Ok((rest, (name.to_string(), value)))
}

/// One or more pieces joined with `#`
fn field_value<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, String> {
    map(
        separated_list1(char('#'), ws(|i| value_piece(i, macros))),
        |pieces: Vec<String>| pieces.concat(),
    )(input)
}

fn value_piece<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, String> {
    alt((
        map(braced, str::to_string),
        map(quoted, str::to_string),
        map(digit1, str::to_string),
        map(take_while1(is_macro_char), |name: &str| {
            // Undefined macros are kept verbatim
            macros
                .get(&name.to_lowercase())
                .cloned()
                .unwrap_or_else(|| name.to_string())
        }),
    ))(input)
}

/// `{...}`, returning the text between the outer braces
fn braced(input: &str) -> IResult<&str, &str> {
    enclosed(input, '{', '}')
}

/// `"..."`; a quote inside braces does not end the value
fn quoted(input: &str) -> IResult<&str, &str> {
    enclosed(input, '"', '"')
}

fn enclosed(input: &str, open: char, close: char) -> IResult<&str, &str> {
    let (body, _) = char(open)(input)?;
    let mut depth = 0usize;
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            c if c == close && depth == 0 => return Ok((&body[i + c.len_utf8()..], &body[..i])),
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_entry(input: &str) -> BibTeXEntry {
        let mut result = parse(input);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(result.entries.len(), 1);
        result.entries.remove(0)
    }

    #[test]
    fn test_article_with_line_number() {
        let entry = only_entry(
            "\n@article{lecun2015,\n  author = {LeCun, Yann and Bengio, Yoshua},\n  title = {Deep learning},\n  year = 2015,\n}\n",
        );
        assert_eq!(entry.cite_key, "lecun2015");
        assert_eq!(entry.entry_type, BibTeXEntryType::Article);
        assert_eq!(entry.get_field("author"), Some("LeCun, Yann and Bengio, Yoshua"));
        assert_eq!(entry.get_field("year"), Some("2015"));
        assert_eq!(entry.line, 2);
    }

    #[test]
    fn test_quoted_values_keep_escapes_and_inner_braces() {
        let entry =
            only_entry(r#"@misc{q, note = "say \"hi\"", title = "Ünïcödé {"inner"} title"}"#);
        assert_eq!(entry.get_field("note"), Some(r#"say \"hi\""#));
        assert_eq!(entry.get_field("title"), Some(r#"Ünïcödé {"inner"} title"#));
    }

    #[test]
    fn test_nested_braces_are_kept() {
        let entry = only_entry("@book{b, title = {The {TeX}book for {LaTeX} users}}");
        assert_eq!(entry.get_field("title"), Some("The {TeX}book for {LaTeX} users"));
    }

    #[test]
    fn test_macros_and_concatenation() {
        let result = parse(
            "@string{nat = \"Nature\"}\n\
             @article{x, journal = nat # { Physics}, month = jan, series = undefinedmacro}",
        );
        assert_eq!(result.strings.get("nat").map(String::as_str), Some("Nature"));
        let entry = &result.entries[0];
        assert_eq!(entry.get_field("journal"), Some("Nature Physics"));
        assert_eq!(entry.get_field("month"), Some("January"));
        assert_eq!(entry.get_field("series"), Some("undefinedmacro"));
    }

    #[test]
    fn test_parenthesised_and_key_only_entries() {
        let result = parse("@book(meadows2008, title = {Thinking in Systems})\n@misc{bare}");
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[0].get_field("title"), Some("Thinking in Systems"));
        assert!(result.entries[1].fields.is_empty());
    }

    #[test]
    fn test_comment_and_preamble_blocks_are_skipped() {
        let input = "% stray text\n\
                     @comment{not @article{x, title={y}} an entry}\n\
                     @preamble{\"\\newcommand{\\noop}[1]{}\"}\n\
                     @misc{kept, title = {Kept}}\n";
        let result = parse(input);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].cite_key, "kept");
        assert_eq!(result.preambles.len(), 1);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_unbalanced_entry_does_not_swallow_neighbours() {
        let input = "@article{good, title = {Fine}, year = 2020}\n\n\
                     @article{bad, title = {Unclosed, year = 2021}\n\n\
                     @book{after, title = {Still parsed}}\n";
        let result = parse(input);
        let keys: Vec<&str> = result.entries.iter().map(|e| e.cite_key.as_str()).collect();
        assert_eq!(keys, vec!["good", "after"]);

        assert_eq!(result.errors.len(), 1);
        let error = &result.errors[0];
        assert_eq!((error.index, error.line), (1, 3));
        assert_eq!(error.cite_key.as_deref(), Some("bad"));
        assert_eq!(error.reason, ParseErrorReason::UnbalancedBraces);
    }

    #[test]
    fn test_extra_closing_brace_rejects_entry() {
        let input = "@article{good, title = {Fine}}\n\
                     @article{bad, title = {Bad}}, year = {2021}}\n\
                     @book{after, title = {Kept}}\n";
        let result = parse(input);
        let keys: Vec<&str> = result.entries.iter().map(|e| e.cite_key.as_str()).collect();
        assert_eq!(keys, vec!["good", "after"]);

        assert_eq!(result.errors.len(), 1);
        let error = &result.errors[0];
        assert_eq!((error.index, error.line), (1, 2));
        assert_eq!(error.cite_key.as_deref(), Some("bad"));
        assert_eq!(error.reason, ParseErrorReason::UnbalancedBraces);
    }

    #[test]
    fn test_free_text_between_entries_is_ignored() {
        let input = "@misc{a, title = {A}}\nSee also the list below.\n@misc{b, title = {B}}\n";
        let result = parse(input);
        assert_eq!(result.entries.len(), 2);
        assert!(result.errors.is_empty());
        assert!(is_stray_entry_text("  year = 2021 }"));
        assert!(!is_stray_entry_text("% generated by hand"));
    }

    #[test]
    fn test_entry_cut_off_at_eof() {
        let result = parse("@article{open, title = {T}, year = 2020,\n");
        assert!(result.entries.is_empty());
        assert_eq!(result.errors[0].reason, ParseErrorReason::MissingTerminator);
    }

    #[test]
    fn test_repeated_field_rejects_entry() {
        let result = parse("@article{dup, title = {A}, TITLE = {B}}");
        assert!(result.entries.is_empty());
        assert_eq!(result.errors[0].reason, ParseErrorReason::DuplicateField("title".into()));
    }

    #[test]
    fn test_repeated_cite_key_keeps_first() {
        let result = parse("@article{same, title = {A}}\n@book{SAME, title = {B}}");
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].get_field("title"), Some("A"));
        assert_eq!(result.errors[0].index, 1);
        assert!(matches!(result.errors[0].reason, ParseErrorReason::DuplicateCiteKey(_)));
    }

    #[test]
    fn test_missing_comma_is_a_syntax_error() {
        let result = parse("@article{k, title = {A} year = 2020}");
        assert!(result.entries.is_empty());
        assert!(matches!(result.errors[0].reason, ParseErrorReason::InvalidSyntax(_)));
    }

    #[test]
    fn test_tokenize_numbers_entries_only() {
        let tokenized = tokenize("@string{a = {b}}\n@misc{one, title={1}}\n@misc{two, title={2}}");
        let indexes: Vec<usize> = tokenized.chunks.iter().map(|c| c.index).collect();
        assert_eq!(indexes, vec![0, 1]);
        assert_eq!(tokenized.chunks[1].line, 3);
        assert_eq!(tokenized.strings.get("a").map(String::as_str), Some("b"));
    }
}
