//! Raw `@type{key, field = value}` records as they appear in a `.bib` file

/// Entry kinds recognised by the importer. Anything else is kept as
/// [`BibTeXEntryType::Other`] so it can be written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BibTeXEntryType {
    Article,
    Book,
    Booklet,
    InBook,
    InCollection,
    InProceedings,
    Proceedings,
    Manual,
    MastersThesis,
    PhdThesis,
    Thesis,
    TechReport,
    Report,
    Online,
    Unpublished,
    Misc,
    Other(String),
}

use BibTeXEntryType as K;

/// Canonical spelling first, then accepted aliases.
const KIND_NAMES: &[(&str, BibTeXEntryType)] = &[
    ("article", K::Article),
    ("book", K::Book),
    ("booklet", K::Booklet),
    ("inbook", K::InBook),
    ("incollection", K::InCollection),
    ("inproceedings", K::InProceedings),
    ("conference", K::InProceedings),
    ("proceedings", K::Proceedings),
    ("manual", K::Manual),
    ("mastersthesis", K::MastersThesis),
    ("phdthesis", K::PhdThesis),
    ("thesis", K::Thesis),
    ("techreport", K::TechReport),
    ("report", K::Report),
    ("online", K::Online),
    ("electronic", K::Online),
    ("www", K::Online),
    ("unpublished", K::Unpublished),
    ("misc", K::Misc),
];

impl BibTeXEntryType {
    /// Resolve the word after `@`. Matching ignores ASCII case; unknown
    /// words are lowercased and preserved.
    pub fn from_name(word: &str) -> Self {
        KIND_NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(word))
            .map(|(_, kind)| kind.clone())
            .unwrap_or_else(|| K::Other(word.to_ascii_lowercase()))
    }

    /// The spelling written on export.
    pub fn name(&self) -> &str {
        if let K::Other(word) = self {
            return word;
        }
        KIND_NAMES
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(name, _)| *name)
            .unwrap_or("misc")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXField {
    pub key: String,
    /// Still LaTeX-encoded; decoding happens during conversion
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXEntry {
    pub cite_key: String,
    pub entry_type: BibTeXEntryType,
    /// Fields in source order; duplicate keys are allowed here
    pub fields: Vec<BibTeXField>,
    /// Line of the opening `@` (1-based), or 0 when built in code
    pub line: u32,
}

impl BibTeXEntry {
    pub fn new(cite_key: impl Into<String>, entry_type: BibTeXEntryType) -> Self {
        Self {
            cite_key: cite_key.into(),
            entry_type,
            fields: Vec::new(),
            line: 0,
        }
    }

    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        self.fields.push(BibTeXField { key, value });
    }

    /// First value stored under `key`, ignoring ASCII case.
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find_map(|field| field.key.eq_ignore_ascii_case(key).then_some(field.value.as_str()))
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.fields.iter().any(|field| field.key.eq_ignore_ascii_case(key))
    }
}
