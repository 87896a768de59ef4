//! Reference domain model

use super::{Author, AuthorRole};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of work a reference describes
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    Book,
    Journal,
    Website,
    Conference,
    Thesis,
    Report,
    #[default]
    Other,
}

/// A canonical, style-independent bibliographic record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Reference {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(rename = "type")]
    pub reference_type: ReferenceType,
    pub year: Option<String>,
    /// Disambiguation suffix, written only by the disambiguation pass
    pub year_suffix: Option<String>,

    // Identifiers
    pub doi: Option<String>,
    pub isbn: Option<String>,
    pub url: Option<String>,

    // Publication details
    pub publisher: Option<String>,
    pub journal_name: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub edition: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub notes: Option<String>,

    /// Language tag ("en", "th"); drives locale-aware terms and collation
    pub language: Option<String>,

    /// Manual workspace ordering; never consulted by sorting or numbering
    #[serde(default)]
    pub sort_order: i64,

    /// Bumped on every edit
    #[serde(default)]
    pub version: u64,

    /// Fields unknown to the canonical schema, preserved from imports
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
}

impl Reference {
    /// Create a new reference with required fields
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        reference_type: ReferenceType,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: Vec::new(),
            reference_type,
            year: None,
            year_suffix: None,
            doi: None,
            isbn: None,
            url: None,
            publisher: None,
            journal_name: None,
            volume: None,
            issue: None,
            pages: None,
            edition: None,
            abstract_text: None,
            notes: None,
            language: None,
            sort_order: 0,
            version: 0,
            extras: BTreeMap::new(),
        }
    }

    /// Create a reference with a freshly generated id
    pub fn with_generated_id(title: impl Into<String>, reference_type: ReferenceType) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), title, reference_type)
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.authors.push(author);
        self
    }

    pub fn with_authors(mut self, authors: impl IntoIterator<Item = Author>) -> Self {
        self.authors.extend(authors);
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_journal(mut self, journal: impl Into<String>) -> Self {
        self.journal_name = Some(journal.into());
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Creators with the given role, in insertion order
    pub fn creators(&self, role: AuthorRole) -> impl Iterator<Item = &Author> {
        self.authors.iter().filter(move |a| a.role == role)
    }

    /// The first author, falling back to the first editor, then to anyone
    pub fn primary_author(&self) -> Option<&Author> {
        self.creators(AuthorRole::Author)
            .next()
            .or_else(|| self.creators(AuthorRole::Editor).next())
            .or_else(|| self.authors.first())
    }

    /// Surname of the primary author (the full name for literal names)
    pub fn primary_surname(&self) -> Option<&str> {
        self.primary_author().map(|a| a.family_name())
    }

    /// Four-digit year if the year field contains one
    pub fn year_digits(&self) -> Option<&str> {
        let year = self.year.as_deref()?.trim();
        let start = year.find(|c: char| c.is_ascii_digit())?;
        let digits = &year[start..];
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        (end == 4).then(|| &digits[..4])
    }

    /// Record an edit so cached renderings are discarded
    pub fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}
