//! BibTeX / RIS import and export integration tests

mod common;

use bibcite_core::{
    export_bibtex, export_ris, import_auto, import_bibtex, import_ris, AuthorRole, ExportOptions,
    Reference, ReferenceType,
};
use common::fixtures::{load_bibtex_fixture, load_ris_fixture};

fn summary(reference: &Reference) -> (String, Option<String>, ReferenceType) {
    (
        reference.title.clone(),
        reference.year.clone(),
        reference.reference_type,
    )
}

// === Import ===

#[test]
fn test_malformed_entry_is_isolated() {
    let report = import_bibtex(&load_bibtex_fixture("malformed.bib"));

    let ids: Vec<&str> = report.references.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["good2020", "after2023"]);
    assert_eq!(report.errors.len(), 2);

    let error = &report.errors[0];
    assert_eq!(error.index, 1);
    assert_eq!(error.key.as_deref(), Some("broken2021"));
    assert!(error.line.is_some());

    // Closed early by a stray brace: the trailing year must not be lost silently
    let error = &report.errors[1];
    assert_eq!(error.index, 2);
    assert_eq!(error.key.as_deref(), Some("extra2022"));
    assert_eq!(error.reason, "unbalanced braces");
}

#[test]
fn test_bibtex_library_import() {
    let report = import_bibtex(&load_bibtex_fixture("library.bib"));
    assert_eq!(report.references.len(), 5);
    assert!(report.errors.is_empty());

    let lecun = &report.references[0];
    assert_eq!(lecun.journal_name.as_deref(), Some("Nature"));
    assert_eq!(lecun.authors.len(), 3);
    assert_eq!(lecun.doi.as_deref(), Some("10.1038/nature14539"));

    let thesis = report.references.iter().find(|r| r.id == "nguyen2019").unwrap();
    assert_eq!(thesis.reference_type, ReferenceType::Thesis);
    assert_eq!(thesis.title, "Café Culture and Urban Space");
    assert_eq!(thesis.publisher.as_deref(), Some("University of Melbourne"));

    let who = report.references.iter().find(|r| r.id == "who2020").unwrap();
    assert!(!who.authors[0].is_invertible());
    assert_eq!(who.authors[0].display_name(), "World Health Organization");
}

#[test]
fn test_ris_sample_import() {
    let report = import_ris(&load_ris_fixture("sample.ris"));
    assert!(report.errors.is_empty(), "{:?}", report.errors);

    let ids: Vec<&str> = report.references.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["lecun2015", "meadows2008", "somchai2561"]);

    let lecun = &report.references[0];
    assert_eq!(lecun.pages.as_deref(), Some("436–444"));
    assert_eq!(
        lecun.extras.get("keywords").map(String::as_str),
        Some("neural networks, representation learning")
    );
    assert_eq!(lecun.creators(AuthorRole::Author).count(), 3);

    let book = &report.references[1];
    assert_eq!(book.isbn.as_deref(), Some("9781603580557"));

    let thai = &report.references[2];
    assert_eq!(thai.reference_type, ReferenceType::Thesis);
    assert!(!thai.authors[0].is_invertible());
    assert_eq!(thai.language.as_deref(), Some("th"));
}

#[test]
fn test_auto_detection_of_both_fixtures() {
    assert_eq!(import_auto(&load_bibtex_fixture("library.bib")).references.len(), 5);
    assert_eq!(import_auto(&load_ris_fixture("sample.ris")).references.len(), 3);
}

#[test]
fn test_unterminated_ris_entry_is_reported() {
    let ris = "TY  - JOUR\nID  - first\nTI  - First\nER  - \n\n\
               TY  - BOOK\nID  - second\nTI  - Second\n";
    let report = import_ris(ris);
    assert_eq!(report.references.len(), 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].index, 1);
}

// === Export and round trips ===

#[test]
fn test_ris_export_round_trip_preserves_title_year_type() {
    let original = import_bibtex(&load_bibtex_fixture("library.bib")).references;
    let exported = export_ris(&original, &ExportOptions::default());

    let reparsed = import_ris(&exported.text);
    assert!(reparsed.errors.is_empty(), "{:?}", reparsed.errors);
    assert_eq!(reparsed.references.len(), original.len());

    for (before, after) in original.iter().zip(&reparsed.references) {
        assert_eq!(summary(before), summary(after));
        assert_eq!(before.id, after.id);
    }
}

#[test]
fn test_bibtex_export_round_trip_preserves_title_year_type() {
    let original = import_ris(&load_ris_fixture("sample.ris")).references;
    let exported = export_bibtex(&original, &ExportOptions::default());
    assert!(exported.errors.is_empty(), "{:?}", exported.errors);

    let reparsed = import_bibtex(&exported.text);
    assert!(reparsed.errors.is_empty(), "{:?}", reparsed.errors);
    assert_eq!(reparsed.references.len(), original.len());
    for (before, after) in original.iter().zip(&reparsed.references) {
        assert_eq!(summary(before), summary(after));
        assert_eq!(before.authors.len(), after.authors.len());
    }
}

#[test]
fn test_export_keeps_literal_names_literal() {
    let original = import_bibtex(&load_bibtex_fixture("library.bib")).references;
    let bibtex = export_bibtex(&original, &ExportOptions::default());
    assert!(bibtex.text.contains("{{World Health Organization}}"));

    let reparsed = import_bibtex(&bibtex.text);
    let who = reparsed
        .references
        .iter()
        .find(|r| r.title.starts_with("Coronavirus"))
        .unwrap();
    assert!(!who.authors[0].is_invertible());
}
