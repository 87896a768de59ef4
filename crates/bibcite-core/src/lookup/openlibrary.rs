//! Open Library provider for ISBN metadata
//!
//! Uses the Books API: `/api/books?bibkeys=ISBN:<isbn>&format=json&jscmd=data`

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use bibcite_domain::{parse_single_author, LookupResult, ReferenceType};

use super::LookupError;

pub const PROVIDER: &str = "openlibrary";

#[derive(Debug, Deserialize)]
struct Book {
    title: Option<String>,
    subtitle: Option<String>,
    #[serde(default)]
    authors: Vec<Named>,
    #[serde(default)]
    publishers: Vec<Named>,
    publish_date: Option<String>,
    number_of_pages: Option<u32>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

lazy_static! {
    static ref YEAR: Regex = Regex::new(r"\b(\d{4})\b").unwrap();
}

/// Book data keyed by `ISBN:<isbn>`; an empty object means no record
pub fn parse_books_response(json: &str, isbn: &str) -> Result<LookupResult, LookupError> {
    let mut books: HashMap<String, Book> = serde_json::from_str(json).map_err(|e| {
        LookupError::ServiceUnavailable(format!("invalid Open Library response: {}", e))
    })?;

    let book = books
        .remove(&format!("ISBN:{}", isbn))
        .ok_or_else(|| LookupError::NotFound(format!("ISBN {}", isbn)))?;

    let title = match (book.title, book.subtitle) {
        (Some(title), Some(subtitle)) => format!("{}: {}", title.trim_end(), subtitle.trim()),
        (Some(title), None) => title,
        (None, _) => return Err(LookupError::NotFound(format!("ISBN {} has no title", isbn))),
    };

    let mut result = LookupResult {
        title,
        authors: book.authors.iter().map(|a| parse_single_author(&a.name)).collect(),
        reference_type: ReferenceType::Book,
        year: book
            .publish_date
            .as_deref()
            .and_then(|date| YEAR.captures(date))
            .map(|c| c[1].to_string()),
        isbn: Some(isbn.to_string()),
        url: book.url,
        publisher: book.publishers.into_iter().next().map(|p| p.name),
        provider: PROVIDER.to_string(),
        ..Default::default()
    };
    if let Some(pages) = book.number_of_pages {
        result.extras.insert("number_of_pages".to_string(), pages.to_string());
    }
    Ok(result)
}
