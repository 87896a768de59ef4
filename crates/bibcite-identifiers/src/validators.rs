//! Identifier validation functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // DOI validation regex: registrant code of 4 to 9 digits
    static ref DOI_PATTERN: Regex = Regex::new(r"^10\.\d{4,9}/\S+$").unwrap();
}

/// Prefixes stripped from DOIs, compared case-insensitively
const DOI_PREFIXES: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi.org/",
    "doi:",
    "doi ",
];

/// Strip resolver URLs, `doi:` prefixes and trailing punctuation
pub fn normalize_doi(doi: &str) -> String {
    let mut result = doi.trim();

    for prefix in DOI_PREFIXES {
        if result.len() >= prefix.len()
            && result.is_char_boundary(prefix.len())
            && result[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            result = result[prefix.len()..].trim_start();
            break;
        }
    }

    // Remove trailing punctuation picked up from prose
    result.trim_end_matches(['.', ',', ';']).to_string()
}

/// Whether a (normalized) DOI has the `10.NNNN/suffix` shape
pub fn is_valid_doi(doi: &str) -> bool {
    DOI_PATTERN.is_match(doi)
}

/// Keep only ISBN digits (and a check character X), uppercased
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .collect::<String>()
        .to_uppercase()
}

/// Whether the input is an ISBN-10 or ISBN-13 with a valid checksum.
///
/// Hyphens and spaces are ignored; any other character fails validation.
pub fn is_valid_isbn(isbn: &str) -> bool {
    if isbn
        .chars()
        .any(|c| !(c.is_ascii_digit() || c == 'X' || c == 'x' || c == '-' || c == ' '))
    {
        return false;
    }

    let normalized = normalize_isbn(isbn);
    match normalized.len() {
        10 => validate_isbn10(&normalized),
        13 => validate_isbn13(&normalized),
        _ => false,
    }
}

/// Validate ISBN-10 checksum
fn validate_isbn10(isbn: &str) -> bool {
    let mut sum = 0u32;

    for (i, c) in isbn.chars().enumerate() {
        let value = match c {
            'X' if i == 9 => 10,
            c => match c.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        sum += value * (10 - i as u32);
    }

    sum % 11 == 0
}

/// Validate ISBN-13 checksum
fn validate_isbn13(isbn: &str) -> bool {
    let mut sum = 0u32;

    for (i, c) in isbn.chars().enumerate() {
        let Some(value) = c.to_digit(10) else {
            return false;
        };
        sum += if i % 2 == 0 { value } else { value * 3 };
    }

    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10.1038/nature12373")]
    #[case("10.1126/science.1234567")]
    #[case("10.1000/182")]
    #[case("10.123456789/long.registrant")]
    fn test_valid_dois(#[case] doi: &str) {
        assert!(is_valid_doi(doi));
    }

    #[rstest]
    #[case("11.1038/nature12373")] // Wrong prefix
    #[case("10.12/test")] // Registrant too short
    #[case("10.1234567890/test")] // Registrant too long
    #[case("nature12373")] // Missing 10.
    #[case("10.1038/")] // Empty suffix
    fn test_invalid_dois(#[case] doi: &str) {
        assert!(!is_valid_doi(doi));
    }

    #[rstest]
    #[case("0-306-40615-2")] // ISBN-10
    #[case("978-0-306-40615-7")] // ISBN-13
    #[case("0306406152")]
    #[case("9780306406157")]
    #[case("080442957X")] // ISBN-10 with X
    fn test_valid_isbns(#[case] isbn: &str) {
        assert!(is_valid_isbn(isbn));
    }

    #[rstest]
    #[case("0-306-40615-1")] // Bad checksum
    #[case("978-0-306-40615-8")] // Bad checksum
    #[case("12345")] // Too short
    #[case("X306406152")] // X only allowed as check digit
    #[case("isbn 0306406152")] // Prefix is not part of the number
    fn test_invalid_isbns(#[case] isbn: &str) {
        assert!(!is_valid_isbn(isbn));
    }

    #[test]
    fn test_normalize_doi() {
        assert_eq!(
            normalize_doi("https://doi.org/10.1038/nature12373"),
            "10.1038/nature12373"
        );
        assert_eq!(normalize_doi("DOI: 10.1038/nature12373"), "10.1038/nature12373");
        assert_eq!(normalize_doi("10.1038/nature12373."), "10.1038/nature12373");
    }
}
