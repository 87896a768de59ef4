//! Citation rendering
//!
//! Turns references plus precomputed suffixes and numbers into bibliography
//! entries and in-text citations. Nothing here consults shared state, so
//! entries can be rendered in parallel once disambiguation and ordering
//! are done.

pub mod entry;
pub mod in_text;
pub mod markup;
pub mod title_case;

pub use entry::{render_entry, EntryContext, RenderedEntry};
pub use in_text::{render_in_text, CitationContext, CitationItem, InTextCitation};
pub use markup::{Span, StyledText};
