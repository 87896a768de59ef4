//! Classification of lookup input

use serde::{Deserialize, Serialize};

use crate::validators::{is_valid_doi, is_valid_isbn, normalize_doi, normalize_isbn};

/// What a piece of user input identifies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Identifier {
    /// Normalized DOI (`10.NNNN/suffix`)
    Doi(String),
    /// ISBN digits with a valid checksum
    Isbn(String),
    /// Anything else, trimmed
    Query(String),
}

impl Identifier {
    /// Classify free-form input.
    ///
    /// A DOI is recognised after stripping resolver URLs and `doi:`
    /// prefixes. An ISBN must carry a valid checksum; digit strings that
    /// fail it are treated as a query.
    pub fn classify(input: &str) -> Self {
        let trimmed = input.trim();

        let doi = normalize_doi(trimmed);
        if is_valid_doi(&doi) {
            return Self::Doi(doi);
        }

        let isbn_candidate = strip_isbn_prefix(trimmed);
        if is_valid_isbn(isbn_candidate) {
            return Self::Isbn(normalize_isbn(isbn_candidate));
        }

        Self::Query(trimmed.to_string())
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Doi(v) | Self::Isbn(v) | Self::Query(v) => v,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Doi(_) => "doi",
            Self::Isbn(_) => "isbn",
            Self::Query(_) => "query",
        }
    }
}

fn strip_isbn_prefix(input: &str) -> &str {
    let lower = input.to_ascii_lowercase();
    for prefix in ["isbn-13:", "isbn-10:", "isbn:", "isbn"] {
        if lower.starts_with(prefix) {
            return input[prefix.len()..].trim_start();
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10.1038/nature12373", Identifier::Doi("10.1038/nature12373".into()))]
    #[case(
        "https://doi.org/10.1145/3368089.3409741",
        Identifier::Doi("10.1145/3368089.3409741".into())
    )]
    #[case("doi:10.1000/182", Identifier::Doi("10.1000/182".into()))]
    #[case("978-0-306-40615-7", Identifier::Isbn("9780306406157".into()))]
    #[case("ISBN: 0-306-40615-2", Identifier::Isbn("0306406152".into()))]
    #[case("9780306406158", Identifier::Query("9780306406158".into()))]
    #[case("  deep learning nature  ", Identifier::Query("deep learning nature".into()))]
    fn test_classify(#[case] input: &str, #[case] expected: Identifier) {
        assert_eq!(Identifier::classify(input), expected);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Identifier::Doi("10.1000/182".into())).unwrap();
        assert_eq!(json["kind"], "doi");
        assert_eq!(json["value"], "10.1000/182");
    }
}
