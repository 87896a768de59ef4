//! Export pipelines for BibTeX and RIS
//!
//! Fields the target format cannot hold are dropped and reported as
//! [`SerializationError`]s; the rest of the batch is always written.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use bibcite_bibtex::{format_entries as format_bibtex, BibTeXEntry};
use bibcite_domain::Reference;

use crate::conversions::references_to_bibtex_entries;
use crate::error::SerializationError;
use crate::ris::{self, RisEntry};

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    BibTeX,
    Ris,
}

/// Options for export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub include_abstract: bool,
    pub include_keywords: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_abstract: true,
            include_keywords: true,
        }
    }
}

/// Serialized text plus the fields that could not be written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub text: String,
    pub errors: Vec<SerializationError>,
}

fn log_report(format: &str, count: usize, report: &ExportReport) {
    for error in &report.errors {
        warn!(format, "{}", error);
    }
    info!(format, exported = count, dropped_fields = report.errors.len(), "Export finished");
}

/// Export references to BibTeX with unique cite keys
pub fn export_bibtex(references: &[Reference], options: &ExportOptions) -> ExportReport {
    let (entries, errors) = references_to_bibtex_entries(references);
    let entries: Vec<BibTeXEntry> = entries
        .into_iter()
        .map(|mut entry| {
            entry.fields.retain(|f| {
                let key = f.key.to_lowercase();
                (options.include_abstract || key != "abstract")
                    && (options.include_keywords || key != "keywords")
            });
            entry
        })
        .collect();

    let report = ExportReport {
        text: format_bibtex(&entries),
        errors,
    };
    log_report("bibtex", references.len(), &report);
    report
}

/// Export references to RIS
pub fn export_ris(references: &[Reference], options: &ExportOptions) -> ExportReport {
    let (entries, errors) = ris::references_to_ris_entries(references);
    let entries: Vec<RisEntry> = entries
        .into_iter()
        .map(|mut entry| {
            entry.tags.retain(|t| {
                (options.include_abstract || t.tag != "AB")
                    && (options.include_keywords || t.tag != "KW")
            });
            entry
        })
        .collect();

    let report = ExportReport {
        text: ris::format_entries(&entries),
        errors,
    };
    log_report("ris", references.len(), &report);
    report
}

pub fn export(
    references: &[Reference],
    format: ExportFormat,
    options: &ExportOptions,
) -> ExportReport {
    match format {
        ExportFormat::BibTeX => export_bibtex(references, options),
        ExportFormat::Ris => export_ris(references, options),
    }
}
