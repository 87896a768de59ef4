//! Import pipelines for BibTeX and RIS
//!
//! Imports never fail as a whole: each malformed entry is skipped and
//! reported as a [`ParseError`] next to the references that did parse.

use rayon::prelude::*;
use tracing::{info, warn};

use bibcite_bibtex::{assemble, parse_chunk, tokenize};
use bibcite_domain::{validate_reference, Reference, ValidationSeverity};

use crate::conversions::bibtex_entry_to_reference;
use crate::error::{ParseError, ValidationWarning};
use crate::ris;

/// Detected import format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    BibTeX,
    Ris,
    Unknown,
}

/// References parsed from one document plus everything that went wrong
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub references: Vec<Reference>,
    pub errors: Vec<ParseError>,
    /// Missing required or recommended fields on imported references
    pub warnings: Vec<ValidationWarning>,
}

impl ImportReport {
    fn finish(mut self, format: &str) -> Self {
        for reference in &self.references {
            self.warnings.extend(
                validate_reference(reference)
                    .into_iter()
                    .filter(|issue| issue.severity != ValidationSeverity::Info)
                    .map(|issue| ValidationWarning {
                        reference_id: reference.id.clone(),
                        field: issue.field,
                        message: issue.message,
                    }),
            );
        }
        for error in &self.errors {
            warn!(format, "Skipped entry: {}", error);
        }
        info!(
            format,
            imported = self.references.len(),
            failed = self.errors.len(),
            "Import finished"
        );
        self
    }
}

/// Guess the format of a document from its first significant line
pub fn detect_format(content: &str) -> ImportFormat {
    let trimmed = content.trim_start_matches('\u{FEFF}').trim();

    if trimmed.starts_with('@') {
        return ImportFormat::BibTeX;
    }
    if trimmed.starts_with("TY  -") || trimmed.starts_with("TY -") || trimmed.contains("\nTY  -") {
        return ImportFormat::Ris;
    }

    let lower = trimmed.to_lowercase();
    if ["@article", "@book", "@inproceedings", "@misc", "@online", "@phdthesis"]
        .iter()
        .any(|kind| lower.contains(kind))
    {
        return ImportFormat::BibTeX;
    }
    if trimmed.contains("\nER  -") || trimmed.contains("\nAU  -") {
        return ImportFormat::Ris;
    }

    ImportFormat::Unknown
}

/// Import a BibTeX document, parsing entries in parallel
pub fn import_bibtex(content: &str) -> ImportReport {
    let tokenized = tokenize(content);
    let parsed: Vec<_> = tokenized
        .chunks
        .par_iter()
        .map(|chunk| (chunk.index, parse_chunk(chunk, &tokenized.strings)))
        .collect();
    let (entries, errors) = assemble(parsed, tokenized.errors);

    ImportReport {
        references: entries.iter().map(bibtex_entry_to_reference).collect(),
        errors: errors.into_iter().map(ParseError::from).collect(),
        warnings: Vec::new(),
    }
    .finish("bibtex")
}

/// Import an RIS document
pub fn import_ris(content: &str) -> ImportReport {
    let parsed = ris::parse(content);

    ImportReport {
        references: parsed.entries.iter().map(ris::ris_entry_to_reference).collect(),
        errors: parsed.errors,
        warnings: Vec::new(),
    }
    .finish("ris")
}

/// Import a document in whichever format it appears to be
pub fn import_auto(content: &str) -> ImportReport {
    match detect_format(content) {
        ImportFormat::BibTeX => import_bibtex(content),
        ImportFormat::Ris => import_ris(content),
        ImportFormat::Unknown => {
            let report = import_bibtex(content);
            if report.references.is_empty() && report.errors.is_empty() {
                import_ris(content)
            } else {
                report
            }
        }
    }
}
