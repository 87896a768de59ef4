//! Declarative style definitions
//!
//! A [`StyleDefinition`] is plain static data. The renderer interprets it and
//! never branches on which style it is looking at, so a new style is a new
//! table in [`super::registry`].

use bibcite_domain::ReferenceType;

use super::StyleId;

/// How in-text citations point at the bibliography
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationKind {
    /// `(Smith, 2020)`
    AuthorYear,
    /// `[3]`, `(3)` or a superscript number
    Numeric,
    /// A note marker plus a short note
    Footnote,
}

/// Whether and how bibliography entries are numbered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingMode {
    /// Unnumbered, ordered alphabetically
    None,
    /// Numbered 1..N in alphabetical order
    Alphabetical,
    /// Numbered 1..N in order of first citation, uncited entries last
    CitationOrder,
}

/// Which names in a list are written family-name first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameOrder {
    InvertAll,
    InvertFirst,
    GivenFirst,
}

/// How given names are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GivenForm {
    Full,
    /// `period`: "J." vs "J"; `space`: "J. M." vs "J.M."
    Initials { period: bool, space: bool },
}

/// Word or symbol placed before the last name of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastJoin {
    Ampersand,
    /// The locale's "and"
    Word,
    /// Plain delimiter, no conjunction
    None,
}

/// Whether the delimiter also precedes the last-name conjunction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterPrecedesLast {
    Always,
    Never,
    /// Only for lists of three or more (serial comma)
    Contextual,
}

/// Rules for bibliography name lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRules {
    pub order: NameOrder,
    pub given: GivenForm,
    /// Between family and given names in an inverted name
    pub sort_separator: &'static str,
    pub delimiter: &'static str,
    pub last_join: LastJoin,
    pub delimiter_precedes_last: DelimiterPrecedesLast,
    /// Lists longer than this are truncated
    pub max_authors: usize,
    /// Names kept when truncating; never more than `max_authors`
    pub et_al_use_first: usize,
    /// Placed between the last kept name and "et al."
    pub et_al_delimiter: &'static str,
    /// Appended to editor lists standing in for authors (singular, plural)
    pub editor_label: (&'static str, &'static str),
}

/// Rules for in-text citations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InTextRules {
    pub open: &'static str,
    pub close: &'static str,
    /// Numbers are set as superscript
    pub superscript: bool,
    pub include_year: bool,
    /// Between author names and year
    pub author_year_delimiter: &'static str,
    /// Between cited items
    pub multi_delimiter: &'static str,
    pub max_authors: usize,
    pub et_al_use_first: usize,
    pub last_join: LastJoin,
    pub delimiter_precedes_last: DelimiterPrecedesLast,
    /// Between the citation and its locator
    pub locator_delimiter: &'static str,
    /// Written before a page locator, e.g. "p. "
    pub locator_prefix: &'static str,
    /// `(Smith, 2020a, 2020b)` for consecutive items by the same authors
    pub collapse_same_author: bool,
    /// `[1–3]` for runs of three or more numbers
    pub collapse_ranges: bool,
}

/// Capitalization applied to the main title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleCase {
    AsIs,
    Sentence,
    Title,
}

/// What numbered entries start with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPrefix {
    None,
    /// `[3] `
    Bracketed,
    /// `3. `
    Dotted,
}

/// A reference value a layout can place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Author list, editors standing in when there are no authors
    Authors,
    /// Year with disambiguation suffix; the style's no-date token when
    /// missing in author-year styles
    Year,
    /// Main title after title casing; a placeholder when missing
    Title,
    /// Journal, proceedings or site name
    Container,
    Volume,
    Issue,
    /// Page range with an en dash
    Pages,
    /// Ordinal edition ("2nd")
    Edition,
    Publisher,
    /// Bare DOI
    Doi,
    /// `https://doi.org/...`, falling back to the URL
    Link,
    Url,
}

/// Typographic treatment of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Plain,
    Italic,
    Quoted,
}

/// One element of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Text {
        field: Field,
        prefix: &'static str,
        suffix: &'static str,
        emphasis: Emphasis,
    },
    /// Rendered only when at least one child renders; children are joined
    /// with `delimiter`
    Group {
        parts: &'static [Part],
        delimiter: &'static str,
        prefix: &'static str,
        suffix: &'static str,
    },
}

pub const fn plain(field: Field, prefix: &'static str, suffix: &'static str) -> Part {
    Part::Text {
        field,
        prefix,
        suffix,
        emphasis: Emphasis::Plain,
    }
}

pub const fn italic(field: Field, prefix: &'static str, suffix: &'static str) -> Part {
    Part::Text {
        field,
        prefix,
        suffix,
        emphasis: Emphasis::Italic,
    }
}

pub const fn quoted(field: Field, prefix: &'static str, suffix: &'static str) -> Part {
    Part::Text {
        field,
        prefix,
        suffix,
        emphasis: Emphasis::Quoted,
    }
}

pub const fn group(
    parts: &'static [Part],
    delimiter: &'static str,
    prefix: &'static str,
    suffix: &'static str,
) -> Part {
    Part::Group {
        parts,
        delimiter,
        prefix,
        suffix,
    }
}

/// Full formatting rules for one citation style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleDefinition {
    pub id: StyleId,
    pub name: &'static str,
    pub kind: CitationKind,
    pub numbering: NumberingMode,
    pub names: NameRules,
    pub in_text: InTextRules,
    pub title_case: TitleCase,
    /// Opening and closing quotation marks for quoted fields
    pub quotes: (&'static str, &'static str),
    /// Commas and periods go inside closing quotation marks
    pub punctuation_in_quote: bool,
    pub entry_prefix: EntryPrefix,
    pub hanging_indent: bool,
    /// Shown in place of a missing year
    pub no_date: &'static str,
    pub layouts: &'static [(ReferenceType, &'static [Part])],
    /// Used for reference types without their own layout
    pub default_layout: &'static [Part],
}

impl StyleDefinition {
    /// Layout for a reference type
    pub fn layout_for(&self, reference_type: ReferenceType) -> &'static [Part] {
        self.layouts
            .iter()
            .find(|(t, _)| *t == reference_type)
            .map(|(_, layout)| *layout)
            .unwrap_or(self.default_layout)
    }

    /// Whether year suffixes are assigned and shown
    pub fn uses_year_suffixes(&self) -> bool {
        self.kind == CitationKind::AuthorYear && self.in_text.include_year
    }

    /// Whether entries carry numbers
    pub fn is_numbered(&self) -> bool {
        self.numbering != NumberingMode::None
    }
}
