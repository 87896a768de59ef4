//! Built-in style tables
//!
//! Each style is a `static` [`StyleDefinition`]. Layout parts carry their
//! own punctuation; the renderer drops affixes around missing fields and
//! cleans up doubled punctuation where two affixes meet.

use bibcite_domain::ReferenceType;
use tracing::warn;

use super::definition::*;
use super::StyleId;
use crate::error::ConfigurationError;

/// Resolve a style id to its definition
pub fn style(id: StyleId) -> &'static StyleDefinition {
    match id {
        StyleId::Apa7 => &APA7,
        StyleId::Mla9 => &MLA9,
        StyleId::Chicago17 => &CHICAGO17,
        StyleId::Harvard => &HARVARD,
        StyleId::Vancouver => &VANCOUVER,
        StyleId::Ieee => &IEEE,
        StyleId::Nature => &NATURE,
        StyleId::Science => &SCIENCE,
        StyleId::Oxford => &OXFORD,
        StyleId::Turabian => &TURABIAN,
    }
}

/// Resolve a user-supplied style id
pub fn lookup(id: &str) -> Result<&'static StyleDefinition, ConfigurationError> {
    match id.parse::<StyleId>() {
        Ok(id) => Ok(style(id)),
        Err(e) => {
            warn!(style = id, "Unknown citation style requested");
            Err(e)
        }
    }
}

const DOUBLE_QUOTES: (&str, &str) = ("\u{201C}", "\u{201D}");
const SINGLE_QUOTES: (&str, &str) = ("\u{2018}", "\u{2019}");

// ===== APA 7th edition =====

const APA_JOURNAL_SOURCE: &[Part] = &[
    italic(Field::Container, "", ""),
    italic(Field::Volume, ", ", ""),
    plain(Field::Issue, "(", ")"),
    plain(Field::Pages, ", ", ""),
];

const APA_JOURNAL: &[Part] = &[
    plain(Field::Authors, "", " "),
    plain(Field::Year, "(", "). "),
    plain(Field::Title, "", ". "),
    group(APA_JOURNAL_SOURCE, "", "", ". "),
    plain(Field::Link, "", ""),
];

const APA_BOOK_TITLE: &[Part] = &[
    italic(Field::Title, "", ""),
    plain(Field::Edition, " (", " ed.)"),
];

const APA_BOOK: &[Part] = &[
    plain(Field::Authors, "", " "),
    plain(Field::Year, "(", "). "),
    group(APA_BOOK_TITLE, "", "", ". "),
    plain(Field::Publisher, "", ". "),
    plain(Field::Link, "", ""),
];

const APA_WEBSITE: &[Part] = &[
    plain(Field::Authors, "", " "),
    plain(Field::Year, "(", "). "),
    italic(Field::Title, "", ". "),
    plain(Field::Container, "", ". "),
    plain(Field::Url, "", ""),
];

const APA_PROCEEDINGS: &[Part] = &[
    italic(Field::Container, "", ""),
    plain(Field::Pages, " (pp. ", ")"),
];

const APA_CONFERENCE: &[Part] = &[
    plain(Field::Authors, "", " "),
    plain(Field::Year, "(", "). "),
    plain(Field::Title, "", ". "),
    group(APA_PROCEEDINGS, "", "In ", ". "),
    plain(Field::Publisher, "", ". "),
    plain(Field::Link, "", ""),
];

const APA_THESIS_TITLE: &[Part] = &[
    italic(Field::Title, "", ""),
    plain(Field::Publisher, " [Thesis, ", "]"),
];

const APA_THESIS: &[Part] = &[
    plain(Field::Authors, "", " "),
    plain(Field::Year, "(", "). "),
    group(APA_THESIS_TITLE, "", "", ". "),
    plain(Field::Link, "", ""),
];

pub static APA7: StyleDefinition = StyleDefinition {
    id: StyleId::Apa7,
    name: "APA 7th edition",
    kind: CitationKind::AuthorYear,
    numbering: NumberingMode::None,
    names: NameRules {
        order: NameOrder::InvertAll,
        given: GivenForm::Initials {
            period: true,
            space: true,
        },
        sort_separator: ", ",
        delimiter: ", ",
        last_join: LastJoin::Ampersand,
        delimiter_precedes_last: DelimiterPrecedesLast::Always,
        max_authors: 20,
        et_al_use_first: 20,
        et_al_delimiter: ", ",
        editor_label: (" (Ed.)", " (Eds.)"),
    },
    in_text: InTextRules {
        open: "(",
        close: ")",
        superscript: false,
        include_year: true,
        author_year_delimiter: ", ",
        multi_delimiter: "; ",
        max_authors: 2,
        et_al_use_first: 1,
        last_join: LastJoin::Ampersand,
        delimiter_precedes_last: DelimiterPrecedesLast::Never,
        locator_delimiter: ", ",
        locator_prefix: "p. ",
        collapse_same_author: true,
        collapse_ranges: false,
    },
    title_case: TitleCase::Sentence,
    quotes: DOUBLE_QUOTES,
    punctuation_in_quote: true,
    entry_prefix: EntryPrefix::None,
    hanging_indent: true,
    no_date: "n.d.",
    layouts: &[
        (ReferenceType::Journal, APA_JOURNAL),
        (ReferenceType::Book, APA_BOOK),
        (ReferenceType::Website, APA_WEBSITE),
        (ReferenceType::Conference, APA_CONFERENCE),
        (ReferenceType::Thesis, APA_THESIS),
    ],
    default_layout: APA_BOOK,
};

// ===== MLA 9th edition =====

const MLA_JOURNAL_SOURCE: &[Part] = &[
    italic(Field::Container, "", ""),
    plain(Field::Volume, "vol. ", ""),
    plain(Field::Issue, "no. ", ""),
    plain(Field::Year, "", ""),
    plain(Field::Pages, "pp. ", ""),
];

const MLA_JOURNAL: &[Part] = &[
    plain(Field::Authors, "", ". "),
    quoted(Field::Title, "", ". "),
    group(MLA_JOURNAL_SOURCE, ", ", "", ". "),
    plain(Field::Link, "", "."),
];

const MLA_PUBLICATION: &[Part] = &[plain(Field::Publisher, "", ""), plain(Field::Year, "", "")];

const MLA_BOOK: &[Part] = &[
    plain(Field::Authors, "", ". "),
    italic(Field::Title, "", ". "),
    plain(Field::Edition, "", " ed., "),
    group(MLA_PUBLICATION, ", ", "", ". "),
    plain(Field::Link, "", "."),
];

const MLA_WEBSITE_SOURCE: &[Part] = &[
    italic(Field::Container, "", ""),
    plain(Field::Year, "", ""),
    plain(Field::Url, "", ""),
];

const MLA_WEBSITE: &[Part] = &[
    plain(Field::Authors, "", ". "),
    quoted(Field::Title, "", ". "),
    group(MLA_WEBSITE_SOURCE, ", ", "", "."),
];

const MLA_CONFERENCE_SOURCE: &[Part] = &[
    italic(Field::Container, "", ""),
    plain(Field::Publisher, "", ""),
    plain(Field::Year, "", ""),
    plain(Field::Pages, "pp. ", ""),
];

const MLA_CONFERENCE: &[Part] = &[
    plain(Field::Authors, "", ". "),
    quoted(Field::Title, "", ". "),
    group(MLA_CONFERENCE_SOURCE, ", ", "", ". "),
    plain(Field::Link, "", "."),
];

pub static MLA9: StyleDefinition = StyleDefinition {
    id: StyleId::Mla9,
    name: "MLA 9th edition",
    kind: CitationKind::AuthorYear,
    numbering: NumberingMode::None,
    names: NameRules {
        order: NameOrder::InvertAll,
        given: GivenForm::Full,
        sort_separator: ", ",
        delimiter: ", ",
        last_join: LastJoin::Word,
        delimiter_precedes_last: DelimiterPrecedesLast::Always,
        max_authors: 2,
        et_al_use_first: 1,
        et_al_delimiter: ", ",
        editor_label: (", editor", ", editors"),
    },
    in_text: InTextRules {
        open: "(",
        close: ")",
        superscript: false,
        include_year: false,
        author_year_delimiter: " ",
        multi_delimiter: "; ",
        max_authors: 2,
        et_al_use_first: 1,
        last_join: LastJoin::Word,
        delimiter_precedes_last: DelimiterPrecedesLast::Never,
        locator_delimiter: " ",
        locator_prefix: "",
        collapse_same_author: false,
        collapse_ranges: false,
    },
    title_case: TitleCase::Title,
    quotes: DOUBLE_QUOTES,
    punctuation_in_quote: true,
    entry_prefix: EntryPrefix::None,
    hanging_indent: true,
    no_date: "n.d.",
    layouts: &[
        (ReferenceType::Journal, MLA_JOURNAL),
        (ReferenceType::Book, MLA_BOOK),
        (ReferenceType::Website, MLA_WEBSITE),
        (ReferenceType::Conference, MLA_CONFERENCE),
    ],
    default_layout: MLA_BOOK,
};

// ===== Chicago 17th edition (author-date) =====

const CHICAGO_JOURNAL_SOURCE: &[Part] = &[
    italic(Field::Container, "", ""),
    plain(Field::Volume, " ", ""),
    plain(Field::Issue, " (", ")"),
    plain(Field::Pages, ": ", ""),
];

const CHICAGO_JOURNAL: &[Part] = &[
    plain(Field::Authors, "", ". "),
    plain(Field::Year, "", ". "),
    quoted(Field::Title, "", ". "),
    group(CHICAGO_JOURNAL_SOURCE, "", "", ". "),
    plain(Field::Link, "", "."),
];

const CHICAGO_BOOK: &[Part] = &[
    plain(Field::Authors, "", ". "),
    plain(Field::Year, "", ". "),
    italic(Field::Title, "", ". "),
    plain(Field::Edition, "", " ed. "),
    plain(Field::Publisher, "", ". "),
    plain(Field::Link, "", "."),
];

const CHICAGO_WEBSITE: &[Part] = &[
    plain(Field::Authors, "", ". "),
    plain(Field::Year, "", ". "),
    quoted(Field::Title, "", ". "),
    plain(Field::Container, "", ". "),
    plain(Field::Url, "", "."),
];

const CHICAGO_PROCEEDINGS: &[Part] = &[
    italic(Field::Container, "", ""),
    plain(Field::Pages, "", ""),
];

const CHICAGO_CONFERENCE: &[Part] = &[
    plain(Field::Authors, "", ". "),
    plain(Field::Year, "", ". "),
    quoted(Field::Title, "", ". "),
    group(CHICAGO_PROCEEDINGS, ", ", "In ", ". "),
    plain(Field::Publisher, "", ". "),
    plain(Field::Link, "", "."),
];

const CHICAGO_THESIS: &[Part] = &[
    plain(Field::Authors, "", ". "),
    plain(Field::Year, "", ". "),
    quoted(Field::Title, "", ". "),
    plain(Field::Publisher, "Thesis, ", ". "),
    plain(Field::Link, "", "."),
];

pub static CHICAGO17: StyleDefinition = StyleDefinition {
    id: StyleId::Chicago17,
    name: "Chicago 17th edition (author-date)",
    kind: CitationKind::AuthorYear,
    numbering: NumberingMode::None,
    names: NameRules {
        order: NameOrder::InvertAll,
        given: GivenForm::Full,
        sort_separator: ", ",
        delimiter: ", ",
        last_join: LastJoin::Word,
        delimiter_precedes_last: DelimiterPrecedesLast::Always,
        max_authors: 10,
        et_al_use_first: 7,
        et_al_delimiter: ", ",
        editor_label: (", ed.", ", eds."),
    },
    in_text: InTextRules {
        open: "(",
        close: ")",
        superscript: false,
        include_year: true,
        author_year_delimiter: " ",
        multi_delimiter: "; ",
        max_authors: 3,
        et_al_use_first: 1,
        last_join: LastJoin::Word,
        delimiter_precedes_last: DelimiterPrecedesLast::Contextual,
        locator_delimiter: ", ",
        locator_prefix: "",
        collapse_same_author: true,
        collapse_ranges: false,
    },
    title_case: TitleCase::Title,
    quotes: DOUBLE_QUOTES,
    punctuation_in_quote: true,
    entry_prefix: EntryPrefix::None,
    hanging_indent: true,
    no_date: "n.d.",
    layouts: &[
        (ReferenceType::Journal, CHICAGO_JOURNAL),
        (ReferenceType::Book, CHICAGO_BOOK),
        (ReferenceType::Website, CHICAGO_WEBSITE),
        (ReferenceType::Conference, CHICAGO_CONFERENCE),
        (ReferenceType::Thesis, CHICAGO_THESIS),
    ],
    default_layout: CHICAGO_BOOK,
};

// ===== Harvard =====

const HARVARD_VOLUME: &[Part] = &[plain(Field::Volume, "", ""), plain(Field::Issue, "(", ")")];

const HARVARD_JOURNAL_SOURCE: &[Part] = &[
    italic(Field::Container, "", ""),
    group(HARVARD_VOLUME, "", "", ""),
    plain(Field::Pages, "pp. ", ""),
];

const HARVARD_JOURNAL: &[Part] = &[
    plain(Field::Authors, "", " "),
    plain(Field::Year, "(", ") "),
    quoted(Field::Title, "", ", "),
    group(HARVARD_JOURNAL_SOURCE, ", ", "", ". "),
    plain(Field::Link, "Available at: ", "."),
];

const HARVARD_BOOK: &[Part] = &[
    plain(Field::Authors, "", " "),
    plain(Field::Year, "(", ") "),
    italic(Field::Title, "", ". "),
    plain(Field::Edition, "", " edn. "),
    plain(Field::Publisher, "", ". "),
    plain(Field::Link, "Available at: ", "."),
];

const HARVARD_WEBSITE: &[Part] = &[
    plain(Field::Authors, "", " "),
    plain(Field::Year, "(", ") "),
    italic(Field::Title, "", ". "),
    plain(Field::Container, "", ". "),
    plain(Field::Url, "Available at: ", "."),
];

const HARVARD_CONFERENCE: &[Part] = &[
    plain(Field::Authors, "", " "),
    plain(Field::Year, "(", ") "),
    quoted(Field::Title, "", ", "),
    italic(Field::Container, "in ", ". "),
    plain(Field::Publisher, "", ", "),
    plain(Field::Pages, "pp. ", ". "),
    plain(Field::Link, "Available at: ", "."),
];

pub static HARVARD: StyleDefinition = StyleDefinition {
    id: StyleId::Harvard,
    name: "Harvard",
    kind: CitationKind::AuthorYear,
    numbering: NumberingMode::None,
    names: NameRules {
        order: NameOrder::InvertAll,
        given: GivenForm::Initials {
            period: true,
            space: false,
        },
        sort_separator: ", ",
        delimiter: ", ",
        last_join: LastJoin::Word,
        delimiter_precedes_last: DelimiterPrecedesLast::Never,
        max_authors: 10,
        et_al_use_first: 1,
        et_al_delimiter: " ",
        editor_label: (" (ed.)", " (eds.)"),
    },
    in_text: InTextRules {
        open: "(",
        close: ")",
        superscript: false,
        include_year: true,
        author_year_delimiter: ", ",
        multi_delimiter: "; ",
        max_authors: 3,
        et_al_use_first: 1,
        last_join: LastJoin::Word,
        delimiter_precedes_last: DelimiterPrecedesLast::Never,
        locator_delimiter: ", ",
        locator_prefix: "p. ",
        collapse_same_author: true,
        collapse_ranges: false,
    },
    title_case: TitleCase::AsIs,
    quotes: SINGLE_QUOTES,
    punctuation_in_quote: false,
    entry_prefix: EntryPrefix::None,
    hanging_indent: false,
    no_date: "n.d.",
    layouts: &[
        (ReferenceType::Journal, HARVARD_JOURNAL),
        (ReferenceType::Book, HARVARD_BOOK),
        (ReferenceType::Website, HARVARD_WEBSITE),
        (ReferenceType::Conference, HARVARD_CONFERENCE),
    ],
    default_layout: HARVARD_BOOK,
};

// ===== Vancouver =====

const VANCOUVER_JOURNAL_ISSUE: &[Part] = &[
    plain(Field::Year, "", ""),
    plain(Field::Volume, ";", ""),
    plain(Field::Issue, "(", ")"),
    plain(Field::Pages, ":", ""),
];

const VANCOUVER_JOURNAL: &[Part] = &[
    plain(Field::Authors, "", ". "),
    plain(Field::Title, "", ". "),
    plain(Field::Container, "", ". "),
    group(VANCOUVER_JOURNAL_ISSUE, "", "", ". "),
    plain(Field::Doi, "doi:", ""),
];

const VANCOUVER_PUBLICATION: &[Part] =
    &[plain(Field::Publisher, "", ""), plain(Field::Year, "", "")];

const VANCOUVER_BOOK: &[Part] = &[
    plain(Field::Authors, "", ". "),
    plain(Field::Title, "", ". "),
    plain(Field::Edition, "", " ed. "),
    group(VANCOUVER_PUBLICATION, "; ", "", ". "),
    plain(Field::Doi, "doi:", ""),
];

const VANCOUVER_WEBSITE: &[Part] = &[
    plain(Field::Authors, "", ". "),
    plain(Field::Title, "", " [Internet]. "),
    plain(Field::Container, "", ". "),
    plain(Field::Year, "", ". "),
    plain(Field::Url, "Available from: ", ""),
];

const VANCOUVER_CONFERENCE: &[Part] = &[
    plain(Field::Authors, "", ". "),
    plain(Field::Title, "", ". "),
    plain(Field::Container, "In: ", ". "),
    group(VANCOUVER_PUBLICATION, "; ", "", ". "),
    plain(Field::Pages, "p. ", ". "),
    plain(Field::Doi, "doi:", ""),
];

pub static VANCOUVER: StyleDefinition = StyleDefinition {
    id: StyleId::Vancouver,
    name: "Vancouver",
    kind: CitationKind::Numeric,
    numbering: NumberingMode::CitationOrder,
    names: NameRules {
        order: NameOrder::InvertAll,
        given: GivenForm::Initials {
            period: false,
            space: false,
        },
        sort_separator: " ",
        delimiter: ", ",
        last_join: LastJoin::None,
        delimiter_precedes_last: DelimiterPrecedesLast::Never,
        max_authors: 6,
        et_al_use_first: 6,
        et_al_delimiter: ", ",
        editor_label: (", editor", ", editors"),
    },
    in_text: InTextRules {
        open: "[",
        close: "]",
        superscript: false,
        include_year: false,
        author_year_delimiter: " ",
        multi_delimiter: ", ",
        max_authors: 1,
        et_al_use_first: 1,
        last_join: LastJoin::None,
        delimiter_precedes_last: DelimiterPrecedesLast::Never,
        locator_delimiter: ", ",
        locator_prefix: "p. ",
        collapse_same_author: false,
        collapse_ranges: true,
    },
    title_case: TitleCase::AsIs,
    quotes: DOUBLE_QUOTES,
    punctuation_in_quote: false,
    entry_prefix: EntryPrefix::Dotted,
    hanging_indent: false,
    no_date: "n.d.",
    layouts: &[
        (ReferenceType::Journal, VANCOUVER_JOURNAL),
        (ReferenceType::Book, VANCOUVER_BOOK),
        (ReferenceType::Website, VANCOUVER_WEBSITE),
        (ReferenceType::Conference, VANCOUVER_CONFERENCE),
    ],
    default_layout: VANCOUVER_BOOK,
};

// ===== IEEE =====

const IEEE_JOURNAL_SOURCE: &[Part] = &[
    italic(Field::Container, "", ""),
    plain(Field::Volume, "vol. ", ""),
    plain(Field::Issue, "no. ", ""),
    plain(Field::Pages, "pp. ", ""),
    plain(Field::Year, "", ""),
    plain(Field::Doi, "doi: ", ""),
];

const IEEE_JOURNAL: &[Part] = &[
    plain(Field::Authors, "", ", "),
    quoted(Field::Title, "", ", "),
    group(IEEE_JOURNAL_SOURCE, ", ", "", "."),
];

const IEEE_PUBLICATION: &[Part] = &[plain(Field::Publisher, "", ""), plain(Field::Year, "", "")];

const IEEE_BOOK: &[Part] = &[
    plain(Field::Authors, "", ", "),
    italic(Field::Title, "", ", "),
    plain(Field::Edition, "", " ed. "),
    group(IEEE_PUBLICATION, ", ", "", "."),
];

const IEEE_PROCEEDINGS: &[Part] = &[
    italic(Field::Container, "in ", ""),
    plain(Field::Year, "", ""),
    plain(Field::Pages, "pp. ", ""),
    plain(Field::Doi, "doi: ", ""),
];

const IEEE_CONFERENCE: &[Part] = &[
    plain(Field::Authors, "", ", "),
    quoted(Field::Title, "", ", "),
    group(IEEE_PROCEEDINGS, ", ", "", "."),
];

const IEEE_WEBSITE: &[Part] = &[
    plain(Field::Authors, "", ", "),
    quoted(Field::Title, "", ", "),
    plain(Field::Container, "", ". "),
    plain(Field::Url, "[Online]. Available: ", ""),
];

const IEEE_THESIS_SOURCE: &[Part] = &[plain(Field::Publisher, "", ""), plain(Field::Year, "", "")];

const IEEE_THESIS: &[Part] = &[
    plain(Field::Authors, "", ", "),
    quoted(Field::Title, "", ", "),
    group(IEEE_THESIS_SOURCE, ", ", "Thesis, ", "."),
];

pub static IEEE: StyleDefinition = StyleDefinition {
    id: StyleId::Ieee,
    name: "IEEE",
    kind: CitationKind::Numeric,
    numbering: NumberingMode::CitationOrder,
    names: NameRules {
        order: NameOrder::InvertAll,
        given: GivenForm::Initials {
            period: true,
            space: true,
        },
        sort_separator: ", ",
        delimiter: ", ",
        last_join: LastJoin::Word,
        delimiter_precedes_last: DelimiterPrecedesLast::Contextual,
        max_authors: 6,
        et_al_use_first: 1,
        et_al_delimiter: " ",
        editor_label: (", Ed.", ", Eds."),
    },
    in_text: InTextRules {
        open: "[",
        close: "]",
        superscript: false,
        include_year: false,
        author_year_delimiter: " ",
        multi_delimiter: ", ",
        max_authors: 1,
        et_al_use_first: 1,
        last_join: LastJoin::None,
        delimiter_precedes_last: DelimiterPrecedesLast::Never,
        locator_delimiter: ", ",
        locator_prefix: "p. ",
        collapse_same_author: false,
        collapse_ranges: true,
    },
    title_case: TitleCase::AsIs,
    quotes: DOUBLE_QUOTES,
    punctuation_in_quote: true,
    entry_prefix: EntryPrefix::Bracketed,
    hanging_indent: false,
    no_date: "n.d.",
    layouts: &[
        (ReferenceType::Journal, IEEE_JOURNAL),
        (ReferenceType::Book, IEEE_BOOK),
        (ReferenceType::Conference, IEEE_CONFERENCE),
        (ReferenceType::Website, IEEE_WEBSITE),
        (ReferenceType::Thesis, IEEE_THESIS),
    ],
    default_layout: IEEE_BOOK,
};

// ===== Nature =====

const NATURE_JOURNAL_SOURCE: &[Part] = &[
    italic(Field::Container, "", ""),
    plain(Field::Volume, " ", ""),
    plain(Field::Pages, ", ", ""),
    plain(Field::Year, " (", ")"),
];

const NATURE_JOURNAL: &[Part] = &[
    plain(Field::Authors, "", " "),
    plain(Field::Title, "", ". "),
    group(NATURE_JOURNAL_SOURCE, "", "", ". "),
    plain(Field::Link, "", ""),
];

const NATURE_PUBLICATION: &[Part] = &[plain(Field::Publisher, "", ""), plain(Field::Year, "", "")];

const NATURE_BOOK: &[Part] = &[
    plain(Field::Authors, "", " "),
    italic(Field::Title, "", ""),
    plain(Field::Edition, " ", " edn"),
    group(NATURE_PUBLICATION, ", ", " (", ")"),
    plain(Field::Link, ". ", ""),
];

const NATURE_WEBSITE: &[Part] = &[
    plain(Field::Authors, "", " "),
    plain(Field::Title, "", ". "),
    italic(Field::Container, "", " "),
    plain(Field::Url, "", " "),
    plain(Field::Year, "(", ")."),
];

pub static NATURE: StyleDefinition = StyleDefinition {
    id: StyleId::Nature,
    name: "Nature",
    kind: CitationKind::Numeric,
    numbering: NumberingMode::CitationOrder,
    names: NameRules {
        order: NameOrder::InvertAll,
        given: GivenForm::Initials {
            period: true,
            space: true,
        },
        sort_separator: ", ",
        delimiter: ", ",
        last_join: LastJoin::Ampersand,
        delimiter_precedes_last: DelimiterPrecedesLast::Never,
        max_authors: 5,
        et_al_use_first: 1,
        et_al_delimiter: " ",
        editor_label: (" (ed.)", " (eds)"),
    },
    in_text: InTextRules {
        open: "",
        close: "",
        superscript: true,
        include_year: false,
        author_year_delimiter: " ",
        multi_delimiter: ",",
        max_authors: 1,
        et_al_use_first: 1,
        last_join: LastJoin::None,
        delimiter_precedes_last: DelimiterPrecedesLast::Never,
        locator_delimiter: ", ",
        locator_prefix: "p. ",
        collapse_same_author: false,
        collapse_ranges: true,
    },
    title_case: TitleCase::AsIs,
    quotes: DOUBLE_QUOTES,
    punctuation_in_quote: false,
    entry_prefix: EntryPrefix::Dotted,
    hanging_indent: false,
    no_date: "n.d.",
    layouts: &[
        (ReferenceType::Journal, NATURE_JOURNAL),
        (ReferenceType::Book, NATURE_BOOK),
        (ReferenceType::Website, NATURE_WEBSITE),
    ],
    default_layout: NATURE_BOOK,
};

// ===== Science =====

const SCIENCE_JOURNAL: &[Part] = &[
    plain(Field::Authors, "", ", "),
    plain(Field::Title, "", ". "),
    group(NATURE_JOURNAL_SOURCE, "", "", ". "),
    plain(Field::Link, "", ""),
];

const SCIENCE_BOOK: &[Part] = &[
    plain(Field::Authors, "", ", "),
    italic(Field::Title, "", ""),
    plain(Field::Edition, " (", " ed.)"),
    group(NATURE_PUBLICATION, ", ", " (", ")."),
];

const SCIENCE_WEBSITE: &[Part] = &[
    plain(Field::Authors, "", ", "),
    plain(Field::Title, "", ". "),
    italic(Field::Container, "", " "),
    plain(Field::Year, "(", "); "),
    plain(Field::Url, "", "."),
];

pub static SCIENCE: StyleDefinition = StyleDefinition {
    id: StyleId::Science,
    name: "Science",
    kind: CitationKind::Numeric,
    numbering: NumberingMode::CitationOrder,
    names: NameRules {
        order: NameOrder::GivenFirst,
        given: GivenForm::Initials {
            period: true,
            space: true,
        },
        sort_separator: ", ",
        delimiter: ", ",
        last_join: LastJoin::None,
        delimiter_precedes_last: DelimiterPrecedesLast::Never,
        max_authors: 5,
        et_al_use_first: 1,
        et_al_delimiter: ", ",
        editor_label: (", Ed.", ", Eds."),
    },
    in_text: InTextRules {
        open: "(",
        close: ")",
        superscript: false,
        include_year: false,
        author_year_delimiter: " ",
        multi_delimiter: ", ",
        max_authors: 1,
        et_al_use_first: 1,
        last_join: LastJoin::None,
        delimiter_precedes_last: DelimiterPrecedesLast::Never,
        locator_delimiter: ", ",
        locator_prefix: "p. ",
        collapse_same_author: false,
        collapse_ranges: true,
    },
    title_case: TitleCase::AsIs,
    quotes: DOUBLE_QUOTES,
    punctuation_in_quote: true,
    entry_prefix: EntryPrefix::Dotted,
    hanging_indent: false,
    no_date: "n.d.",
    layouts: &[
        (ReferenceType::Journal, SCIENCE_JOURNAL),
        (ReferenceType::Book, SCIENCE_BOOK),
        (ReferenceType::Website, SCIENCE_WEBSITE),
    ],
    default_layout: SCIENCE_BOOK,
};

// ===== Oxford (OSCOLA-like notes, bibliography) =====

const OXFORD_JOURNAL_SOURCE: &[Part] = &[
    italic(Field::Container, "", ""),
    plain(Field::Volume, ", ", ""),
    plain(Field::Issue, "/", ""),
    plain(Field::Year, " (", ")"),
    plain(Field::Pages, ", ", ""),
];

const OXFORD_JOURNAL: &[Part] = &[
    plain(Field::Authors, "", ", "),
    quoted(Field::Title, "", ", "),
    group(OXFORD_JOURNAL_SOURCE, "", "", "."),
];

const OXFORD_PUBLICATION: &[Part] = &[
    plain(Field::Edition, "", " edn"),
    plain(Field::Publisher, "", ""),
    plain(Field::Year, "", ""),
];

const OXFORD_BOOK_TAIL: &[Part] = &[
    group(OXFORD_PUBLICATION, ", ", "(", ")"),
    plain(Field::Link, "", ""),
];

const OXFORD_BOOK: &[Part] = &[
    plain(Field::Authors, "", ", "),
    italic(Field::Title, "", ""),
    group(OXFORD_BOOK_TAIL, ", ", " ", "."),
];

const OXFORD_WEBSITE: &[Part] = &[
    plain(Field::Authors, "", ", "),
    quoted(Field::Title, "", ""),
    plain(Field::Container, " (", ""),
    plain(Field::Year, ", ", ")"),
    plain(Field::Url, " <", ">"),
];

pub static OXFORD: StyleDefinition = StyleDefinition {
    id: StyleId::Oxford,
    name: "Oxford (notes)",
    kind: CitationKind::Footnote,
    numbering: NumberingMode::None,
    names: NameRules {
        order: NameOrder::InvertFirst,
        given: GivenForm::Full,
        sort_separator: ", ",
        delimiter: ", ",
        last_join: LastJoin::Word,
        delimiter_precedes_last: DelimiterPrecedesLast::Never,
        max_authors: 3,
        et_al_use_first: 1,
        et_al_delimiter: " ",
        editor_label: (" (ed)", " (eds)"),
    },
    in_text: InTextRules {
        open: "",
        close: "",
        superscript: true,
        include_year: false,
        author_year_delimiter: ", ",
        multi_delimiter: "; ",
        max_authors: 3,
        et_al_use_first: 1,
        last_join: LastJoin::Word,
        delimiter_precedes_last: DelimiterPrecedesLast::Never,
        locator_delimiter: ", ",
        locator_prefix: "",
        collapse_same_author: false,
        collapse_ranges: false,
    },
    title_case: TitleCase::Title,
    quotes: SINGLE_QUOTES,
    punctuation_in_quote: false,
    entry_prefix: EntryPrefix::None,
    hanging_indent: true,
    no_date: "n.d.",
    layouts: &[
        (ReferenceType::Journal, OXFORD_JOURNAL),
        (ReferenceType::Website, OXFORD_WEBSITE),
    ],
    default_layout: OXFORD_BOOK,
};

// ===== Turabian 9th edition (notes-bibliography) =====

const TURABIAN_JOURNAL_SOURCE: &[Part] = &[
    italic(Field::Container, "", ""),
    plain(Field::Volume, " ", ""),
    plain(Field::Issue, ", no. ", ""),
    plain(Field::Year, " (", ")"),
    plain(Field::Pages, ": ", ""),
];

const TURABIAN_JOURNAL: &[Part] = &[
    plain(Field::Authors, "", ". "),
    quoted(Field::Title, "", ". "),
    group(TURABIAN_JOURNAL_SOURCE, "", "", ". "),
    plain(Field::Link, "", "."),
];

const TURABIAN_PUBLICATION: &[Part] =
    &[plain(Field::Publisher, "", ""), plain(Field::Year, "", "")];

const TURABIAN_BOOK: &[Part] = &[
    plain(Field::Authors, "", ". "),
    italic(Field::Title, "", ". "),
    plain(Field::Edition, "", " ed. "),
    group(TURABIAN_PUBLICATION, ", ", "", ". "),
    plain(Field::Link, "", "."),
];

const TURABIAN_WEBSITE: &[Part] = &[
    plain(Field::Authors, "", ". "),
    quoted(Field::Title, "", ". "),
    plain(Field::Container, "", ". "),
    plain(Field::Year, "", ". "),
    plain(Field::Url, "", "."),
];

pub static TURABIAN: StyleDefinition = StyleDefinition {
    id: StyleId::Turabian,
    name: "Turabian 9th edition (notes-bibliography)",
    kind: CitationKind::Footnote,
    numbering: NumberingMode::None,
    names: NameRules {
        order: NameOrder::InvertFirst,
        given: GivenForm::Full,
        sort_separator: ", ",
        delimiter: ", ",
        last_join: LastJoin::Word,
        delimiter_precedes_last: DelimiterPrecedesLast::Always,
        max_authors: 10,
        et_al_use_first: 7,
        et_al_delimiter: ", ",
        editor_label: (", ed.", ", eds."),
    },
    in_text: InTextRules {
        open: "",
        close: "",
        superscript: true,
        include_year: false,
        author_year_delimiter: ", ",
        multi_delimiter: "; ",
        max_authors: 3,
        et_al_use_first: 1,
        last_join: LastJoin::Word,
        delimiter_precedes_last: DelimiterPrecedesLast::Contextual,
        locator_delimiter: ", ",
        locator_prefix: "",
        collapse_same_author: false,
        collapse_ranges: false,
    },
    title_case: TitleCase::Title,
    quotes: DOUBLE_QUOTES,
    punctuation_in_quote: true,
    entry_prefix: EntryPrefix::None,
    hanging_indent: true,
    no_date: "n.d.",
    layouts: &[
        (ReferenceType::Journal, TURABIAN_JOURNAL),
        (ReferenceType::Book, TURABIAN_BOOK),
        (ReferenceType::Website, TURABIAN_WEBSITE),
    ],
    default_layout: TURABIAN_BOOK,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_resolves_to_its_definition() {
        for id in StyleId::all() {
            assert_eq!(style(*id).id, *id);
        }
    }

    #[test]
    fn test_lookup_unknown_style() {
        assert!(matches!(
            lookup("apa-6th"),
            Err(ConfigurationError::UnknownStyle(_))
        ));
        assert_eq!(lookup("vancouver").unwrap().id, StyleId::Vancouver);
    }

    #[test]
    fn test_truncation_settings_are_consistent() {
        for id in StyleId::all() {
            let def = style(*id);
            assert!(def.names.et_al_use_first >= 1);
            assert!(def.names.et_al_use_first <= def.names.max_authors);
            assert!(def.in_text.et_al_use_first <= def.in_text.max_authors);
        }
    }

    #[test]
    fn test_numeric_styles_number_in_citation_order() {
        for id in [StyleId::Vancouver, StyleId::Ieee, StyleId::Nature, StyleId::Science] {
            let def = style(id);
            assert_eq!(def.kind, CitationKind::Numeric);
            assert_eq!(def.numbering, NumberingMode::CitationOrder);
            assert!(!def.uses_year_suffixes());
        }
    }

    #[test]
    fn test_layout_falls_back_to_default() {
        assert_eq!(APA7.layout_for(ReferenceType::Report), APA_BOOK);
        assert_eq!(APA7.layout_for(ReferenceType::Journal), APA_JOURNAL);
    }
}
