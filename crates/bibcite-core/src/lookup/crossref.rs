//! Crossref provider for DOI metadata and bibliographic search
//!
//! API docs: https://api.crossref.org/swagger-ui/index.html

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use bibcite_domain::{Author, AuthorRole, LookupResult, ReferenceType};
use bibcite_identifiers::{normalize_doi, normalize_isbn};

use super::LookupError;

pub const PROVIDER: &str = "crossref";

#[derive(Debug, Deserialize)]
struct WorkEnvelope {
    message: CrossrefWork,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    message: WorkList,
}

#[derive(Debug, Deserialize)]
struct WorkList {
    #[serde(default)]
    items: Vec<CrossrefWork>,
}

#[derive(Debug, Deserialize)]
struct CrossrefWork {
    #[serde(rename = "DOI")]
    doi: String,
    #[serde(rename = "type")]
    work_type: Option<String>,
    title: Option<Vec<String>>,
    subtitle: Option<Vec<String>>,
    author: Option<Vec<CrossrefPerson>>,
    editor: Option<Vec<CrossrefPerson>>,
    translator: Option<Vec<CrossrefPerson>>,
    #[serde(rename = "container-title")]
    container_title: Option<Vec<String>>,
    publisher: Option<String>,
    issued: Option<CrossrefDate>,
    #[serde(rename = "published-print")]
    published_print: Option<CrossrefDate>,
    #[serde(rename = "published-online")]
    published_online: Option<CrossrefDate>,
    volume: Option<String>,
    issue: Option<String>,
    page: Option<String>,
    #[serde(rename = "ISBN")]
    isbn: Option<Vec<String>>,
    #[serde(rename = "ISSN")]
    issn: Option<Vec<String>>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    language: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrossrefPerson {
    given: Option<String>,
    family: Option<String>,
    /// Organizational authors carry a single name
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrossrefDate {
    #[serde(rename = "date-parts")]
    date_parts: Option<Vec<Vec<Option<i32>>>>,
}

impl CrossrefDate {
    fn year(&self) -> Option<i32> {
        self.date_parts.as_ref()?.first()?.first().copied().flatten()
    }
}

/// Parse a `/works/{doi}` response
pub fn parse_work_response(json: &str) -> Result<LookupResult, LookupError> {
    let envelope: WorkEnvelope = serde_json::from_str(json)
        .map_err(|e| LookupError::ServiceUnavailable(format!("invalid Crossref response: {}", e)))?;
    let doi = envelope.message.doi.clone();
    parse_work(envelope.message)
        .ok_or_else(|| LookupError::NotFound(format!("{} has no title", doi)))
}

/// Parse a `/works?query...` response; works without a title are skipped
pub fn parse_search_response(json: &str) -> Result<Vec<LookupResult>, LookupError> {
    let envelope: ListEnvelope = serde_json::from_str(json)
        .map_err(|e| LookupError::ServiceUnavailable(format!("invalid Crossref response: {}", e)))?;
    Ok(envelope.message.items.into_iter().filter_map(parse_work).collect())
}

fn reference_type(work_type: Option<&str>) -> ReferenceType {
    match work_type.unwrap_or_default() {
        "journal-article" => ReferenceType::Journal,
        "book" | "monograph" | "edited-book" | "reference-book" | "book-chapter" => {
            ReferenceType::Book
        }
        "proceedings-article" | "proceedings" => ReferenceType::Conference,
        "dissertation" => ReferenceType::Thesis,
        "report" => ReferenceType::Report,
        _ => ReferenceType::Other,
    }
}

fn people(list: Option<Vec<CrossrefPerson>>, role: AuthorRole) -> impl Iterator<Item = Author> {
    list.unwrap_or_default().into_iter().filter_map(move |person| {
        let author = match (person.family, person.name) {
            (Some(family), _) => Author::new(person.given.unwrap_or_default(), family),
            (None, Some(name)) => Author::literal(name),
            (None, None) => return None,
        };
        Some(author.with_role(role))
    })
}

fn parse_work(work: CrossrefWork) -> Option<LookupResult> {
    let mut title = work.title.and_then(|t| t.into_iter().next())?;
    if title.trim().is_empty() {
        return None;
    }
    if let Some(subtitle) = work.subtitle.and_then(|s| s.into_iter().next()) {
        title = format!("{}: {}", title.trim_end(), subtitle.trim());
    }

    let authors = people(work.author, AuthorRole::Author)
        .chain(people(work.editor, AuthorRole::Editor))
        .chain(people(work.translator, AuthorRole::Translator))
        .collect();

    let year = [&work.issued, &work.published_print, &work.published_online]
        .into_iter()
        .flatten()
        .find_map(CrossrefDate::year)
        .map(|y| y.to_string());

    let mut result = LookupResult {
        title,
        authors,
        reference_type: reference_type(work.work_type.as_deref()),
        year,
        doi: Some(normalize_doi(&work.doi)),
        isbn: work.isbn.and_then(|i| i.into_iter().next()).map(|i| normalize_isbn(&i)),
        url: work.url,
        publisher: work.publisher,
        journal_name: work.container_title.and_then(|t| t.into_iter().next()),
        volume: work.volume,
        issue: work.issue,
        pages: work.page,
        abstract_text: work.abstract_text.map(|a| strip_jats_markup(&a)),
        language: work.language,
        provider: PROVIDER.to_string(),
        ..Default::default()
    };
    if let Some(issn) = work.issn.and_then(|i| i.into_iter().next()) {
        result.extras.insert("issn".to_string(), issn);
    }
    Some(result)
}

lazy_static! {
    static ref JATS_TAG: Regex = Regex::new(r"</?jats:[^>]+>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Strip JATS XML markup from Crossref abstracts
pub fn strip_jats_markup(text: &str) -> String {
    let cleaned = JATS_TAG.replace_all(text, " ");
    WHITESPACE.replace_all(cleaned.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK_RESPONSE: &str = r#"{
        "status": "ok",
        "message": {
            "DOI": "10.1038/nature14539",
            "type": "journal-article",
            "title": ["Deep learning"],
            "author": [
                {"given": "Yann", "family": "LeCun"},
                {"given": "Yoshua", "family": "Bengio"},
                {"name": "Deep Learning Consortium"}
            ],
            "container-title": ["Nature"],
            "publisher": "Springer Science and Business Media LLC",
            "issued": {"date-parts": [[2015, 5, 27]]},
            "volume": "521",
            "issue": "7553",
            "page": "436-444",
            "ISSN": ["0028-0836"],
            "abstract": "<jats:p>Deep learning allows <jats:italic>models</jats:italic> to learn.</jats:p>"
        }
    }"#;

    #[test]
    fn test_parse_work_response() {
        let result = parse_work_response(WORK_RESPONSE).unwrap();
        assert_eq!(result.title, "Deep learning");
        assert_eq!(result.reference_type, ReferenceType::Journal);
        assert_eq!(result.doi.as_deref(), Some("10.1038/nature14539"));
        assert_eq!(result.year.as_deref(), Some("2015"));
        assert_eq!(result.authors.len(), 3);
        assert_eq!(result.authors[0].family_name(), "LeCun");
        assert!(!result.authors[2].is_invertible());
        assert_eq!(result.pages.as_deref(), Some("436-444"));
        assert_eq!(result.extras.get("issn").map(String::as_str), Some("0028-0836"));
        assert_eq!(
            result.abstract_text.as_deref(),
            Some("Deep learning allows models to learn.")
        );
        assert_eq!(result.provider, "crossref");
    }

    #[test]
    fn test_untitled_work_is_not_found() {
        let json = r#"{"message": {"DOI": "10.1/x", "title": []}}"#;
        assert!(matches!(parse_work_response(json), Err(LookupError::NotFound(_))));
    }

    #[test]
    fn test_garbage_is_service_unavailable() {
        assert!(matches!(
            parse_work_response("<html>Bad gateway</html>"),
            Err(LookupError::ServiceUnavailable(_))
        ));
    }

    #[test]
    fn test_parse_search_response_skips_untitled() {
        let json = r#"{"message": {"items": [
            {"DOI": "10.1/a", "title": ["A"], "issued": {"date-parts": [[null]]}},
            {"DOI": "10.1/b"},
            {"DOI": "10.1/c", "title": ["C"], "subtitle": ["More"], "type": "book"}
        ]}}"#;
        let results = parse_search_response(json).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].year, None);
        assert_eq!(results[1].title, "C: More");
        assert_eq!(results[1].reference_type, ReferenceType::Book);
    }

    #[test]
    fn test_strip_jats_markup() {
        let input = "<jats:p>This is <jats:italic>italic</jats:italic> text.</jats:p>";
        assert_eq!(strip_jats_markup(input), "This is italic text.");
    }
}
