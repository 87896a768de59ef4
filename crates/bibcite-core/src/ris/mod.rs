//! RIS (Research Information Systems) parsing and formatting
//!
//! This module provides the RIS codec and the conversion between RIS entries
//! and canonical references.

mod converter;
mod entry;
mod formatter;
mod parser;

pub use converter::{
    reference_to_ris_entry, reference_type_for, references_to_ris_entries, ris_entry_to_reference,
    ris_type_for,
};
pub use entry::{is_ris_tag, RisEntry, RisTag, RisType};
pub use formatter::{format_entries, format_entry};
pub use parser::{parse, RisParseResult};
