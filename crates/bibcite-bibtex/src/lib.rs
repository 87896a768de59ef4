//! BibTeX parsing and formatting
//!
//! This crate provides the BibTeX side of the bibcite exchange layer:
//!
//! - A tokenizer that splits a file into per-entry chunks, so one malformed
//!   entry (unbalanced braces, missing terminator) never hides its siblings
//! - A nom-based entry parser with `@string` macro expansion and `#`
//!   concatenation
//! - LaTeX accent/command and HTML entity decoding to plain Unicode
//! - A formatter with value escaping that the parser reads back losslessly

mod entry;
mod formatter;
mod html_entities;
mod latex_decoder;
pub mod parser;

pub use entry::{BibTeXEntry, BibTeXEntryType, BibTeXField};
pub use formatter::{escape_value, format_entries, format_entry};
pub use html_entities::decode_html_entities;
pub use latex_decoder::{decode_latex, decode_latex_accents};
pub use parser::{
    assemble, parse, parse_chunk, tokenize, BibTeXParseError, BibTeXParseResult, EntryChunk,
    ParseErrorReason, Tokenized,
};
