//! Transient metadata produced by identifier lookups

use super::{Author, Reference, ReferenceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A bibliographic record returned by a lookup provider.
///
/// Same shape as [`Reference`] minus the persistence fields (id, ordering,
/// version, disambiguation suffix). Nothing is stored until the caller
/// converts it with [`LookupResult::into_reference`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LookupResult {
    pub title: String,
    pub authors: Vec<Author>,
    #[serde(rename = "type")]
    pub reference_type: ReferenceType,
    pub year: Option<String>,
    pub doi: Option<String>,
    pub isbn: Option<String>,
    pub url: Option<String>,
    pub publisher: Option<String>,
    pub journal_name: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub edition: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub language: Option<String>,
    /// Provider that produced the record ("crossref", "openlibrary")
    pub provider: String,
    pub extras: BTreeMap<String, String>,
}

impl LookupResult {
    /// Import the result as a persisted reference with the given id
    pub fn into_reference(self, id: impl Into<String>) -> Reference {
        let mut reference = Reference::new(id, self.title, self.reference_type);
        reference.authors = self.authors;
        reference.year = self.year;
        reference.doi = self.doi;
        reference.isbn = self.isbn;
        reference.url = self.url;
        reference.publisher = self.publisher;
        reference.journal_name = self.journal_name;
        reference.volume = self.volume;
        reference.issue = self.issue;
        reference.pages = self.pages;
        reference.edition = self.edition;
        reference.abstract_text = self.abstract_text;
        reference.language = self.language;
        reference.extras = self.extras;
        reference
    }
}
