//! Validation for references

use super::{Reference, ReferenceType};
use serde::{Deserialize, Serialize};

/// Severity of a validation issue
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

/// A validation error or warning for one field
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub severity: ValidationSeverity,
}

/// Rejection of a reference before persistence
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("required field `{field}` is missing")]
    MissingField { field: String },
    #[error("field `{field}` is invalid: {message}")]
    InvalidField { field: String, message: String },
}

fn issue(field: &str, message: &str, severity: ValidationSeverity) -> ValidationIssue {
    ValidationIssue {
        field: field.to_string(),
        message: message.to_string(),
        severity,
    }
}

/// Validate a reference and return errors/warnings
pub fn validate_reference(reference: &Reference) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    // Required fields
    if reference.id.trim().is_empty() {
        issues.push(issue("id", "Reference id is required", ValidationSeverity::Error));
    }

    if reference.title.trim().is_empty() {
        issues.push(issue("title", "Title is required", ValidationSeverity::Error));
    }

    // Recommended fields
    if reference.authors.is_empty() {
        issues.push(issue(
            "authors",
            "Authors are recommended",
            ValidationSeverity::Warning,
        ));
    }

    match reference.year.as_deref() {
        None => issues.push(issue("year", "Year is recommended", ValidationSeverity::Warning)),
        Some(_) if reference.year_digits().is_none() => issues.push(issue(
            "year",
            "Year does not contain a four-digit year",
            ValidationSeverity::Warning,
        )),
        Some(_) => {}
    }

    if let Some(doi) = reference.doi.as_deref() {
        if !doi.starts_with("10.") || !doi.contains('/') {
            issues.push(issue(
                "doi",
                "DOI should look like 10.NNNN/suffix",
                ValidationSeverity::Warning,
            ));
        }
    }

    // Type-specific recommendations
    match reference.reference_type {
        ReferenceType::Journal if reference.journal_name.is_none() => issues.push(issue(
            "journal_name",
            "Journal name is recommended for journal articles",
            ValidationSeverity::Warning,
        )),
        ReferenceType::Book if reference.publisher.is_none() => issues.push(issue(
            "publisher",
            "Publisher is recommended for books",
            ValidationSeverity::Warning,
        )),
        ReferenceType::Website if reference.url.is_none() => issues.push(issue(
            "url",
            "URL is recommended for websites",
            ValidationSeverity::Warning,
        )),
        ReferenceType::Thesis if reference.publisher.is_none() => issues.push(issue(
            "publisher",
            "Granting institution is recommended for theses",
            ValidationSeverity::Info,
        )),
        _ => {}
    }

    issues
}

/// Reject a reference whose required fields are missing.
///
/// Warnings and informational issues never fail.
pub fn ensure_valid(reference: &Reference) -> Result<(), ValidationError> {
    match validate_reference(reference)
        .into_iter()
        .find(|i| i.severity == ValidationSeverity::Error)
    {
        Some(error) => Err(ValidationError::MissingField { field: error.field }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Author;

    #[test]
    fn test_missing_title_is_error() {
        let reference = Reference::new("r1", "", ReferenceType::Book);
        let result = ensure_valid(&reference);
        assert_eq!(
            result,
            Err(ValidationError::MissingField {
                field: "title".to_string()
            })
        );
    }

    #[test]
    fn test_complete_reference_passes() {
        let reference = Reference::new("r1", "A Book", ReferenceType::Book)
            .with_author(Author::new("Jane", "Doe"))
            .with_year("2021")
            .with_publisher("Acme");
        assert!(ensure_valid(&reference).is_ok());
        assert!(validate_reference(&reference).is_empty());
    }

    #[test]
    fn test_journal_without_journal_name_warns() {
        let reference = Reference::new("r1", "Paper", ReferenceType::Journal)
            .with_author(Author::new("Jane", "Doe"))
            .with_year("2021");
        let issues = validate_reference(&reference);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "journal_name");
        assert_eq!(issues[0].severity, ValidationSeverity::Warning);
        assert!(ensure_valid(&reference).is_ok());
    }

    #[test]
    fn test_bad_year_warns() {
        let reference = Reference::new("r1", "Paper", ReferenceType::Other)
            .with_author(Author::new("Jane", "Doe"))
            .with_year("circa");
        let issues = validate_reference(&reference);
        assert!(issues.iter().any(|i| i.field == "year"));
    }
}
