//! Bibliography and citation formatting integration tests

mod common;

use bibcite_core::{
    import_bibtex, Author, BibliographyRequest, CitationEngine, CiteItem, CiteRequest, Reference,
    ReferenceType, StyleId,
};
use common::fixtures::load_bibtex_fixture;
use rstest::rstest;

fn library() -> Vec<Reference> {
    let report = import_bibtex(&load_bibtex_fixture("library.bib"));
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    report.references
}

fn smith(id: &str, title: &str) -> Reference {
    Reference::new(id, title, ReferenceType::Journal)
        .with_author(Author::new("J.", "Smith"))
        .with_year("2020")
}

fn cite_one(engine: &CitationEngine, style: &str, references: &[Reference], id: &str) -> String {
    engine
        .cite(&CiteRequest {
            scope: "manuscript",
            style,
            references,
            citation_order: None,
            items: &[CiteItem::new(id)],
            note_number: None,
        })
        .unwrap()
        .text
}

// === Author-year disambiguation ===

#[test]
fn test_same_author_year_gets_suffixes_by_title() {
    // Input order is deliberately reversed
    let refs = vec![smith("y", "Y"), smith("x", "X")];
    let engine = CitationEngine::default();
    assert_eq!(cite_one(&engine, "apa7", &refs, "x"), "(Smith, 2020a)");
    assert_eq!(cite_one(&engine, "apa7", &refs, "y"), "(Smith, 2020b)");
}

#[test]
fn test_suffixes_match_between_citation_and_bibliography() {
    let refs = vec![smith("x", "X"), smith("y", "Y")];
    let engine = CitationEngine::default();
    let bibliography = engine
        .format_bibliography(&BibliographyRequest {
            scope: "manuscript",
            style: "harvard",
            references: &refs,
            citation_order: None,
        })
        .unwrap();

    for entry in &bibliography.entries {
        let suffix = entry.year_suffix.as_deref().unwrap();
        let citation = cite_one(&engine, "harvard", &refs, &entry.reference_id);
        assert!(citation.contains(&format!("2020{}", suffix)), "{}", citation);
        assert!(entry.text.to_plain().contains(&format!("2020{}", suffix)));
    }
}

#[test]
fn test_adding_a_reference_reassigns_suffixes() {
    let engine = CitationEngine::default();
    let mut refs = vec![smith("b", "B")];
    assert_eq!(cite_one(&engine, "apa7", &refs, "b"), "(Smith, 2020)");

    refs.push(smith("a", "A"));
    assert_eq!(cite_one(&engine, "apa7", &refs, "b"), "(Smith, 2020b)");
}

// === Truncation ===

#[test]
fn test_twenty_five_authors_show_twenty_then_et_al() {
    let mut reference =
        Reference::new("big", "Large Collaboration", ReferenceType::Journal).with_year("2020");
    for i in 1..=25 {
        reference = reference.with_author(Author::new("A.", format!("Author{:02}", i)));
    }

    let text = CitationEngine::default()
        .format_bibliography(&BibliographyRequest {
            scope: "manuscript",
            style: "apa7",
            references: std::slice::from_ref(&reference),
            citation_order: None,
        })
        .unwrap()
        .to_plain();

    assert_eq!(text.matches(", A.").count(), 20);
    assert!(text.contains("Author20, A., et al."), "{}", text);
    assert!(!text.contains("Author21"));
}

// === Every style over a mixed library ===

#[rstest]
#[case("apa7", false)]
#[case("mla9", false)]
#[case("chicago17", false)]
#[case("harvard", false)]
#[case("vancouver", true)]
#[case("ieee", true)]
#[case("nature", true)]
#[case("science", true)]
#[case("oxford", false)]
#[case("turabian", false)]
fn test_style_formats_whole_library(#[case] style: &str, #[case] numbered: bool) {
    let refs = library();
    let engine = CitationEngine::default();
    let request = BibliographyRequest {
        scope: "library",
        style,
        references: &refs,
        citation_order: None,
    };
    let bibliography = engine.format_bibliography(&request).unwrap();

    assert_eq!(bibliography.style, style.parse::<StyleId>().unwrap());
    assert_eq!(bibliography.entries.len(), refs.len());
    assert!(bibliography.warnings.is_empty(), "{:?}", bibliography.warnings);
    for entry in &bibliography.entries {
        assert!(!entry.text.to_plain().is_empty());
        assert_eq!(entry.number.is_some(), numbered);
    }
    if numbered {
        let numbers: Vec<u32> = bibliography.entries.iter().filter_map(|e| e.number).collect();
        assert_eq!(numbers, (1..=refs.len() as u32).collect::<Vec<_>>());
    }

    // Same input, same output
    assert_eq!(engine.format_bibliography(&request).unwrap(), bibliography);
}

#[test]
fn test_alphabetical_order_of_library() {
    let refs = library();
    let bibliography = CitationEngine::default()
        .format_bibliography(&BibliographyRequest {
            scope: "library",
            style: "apa7",
            references: &refs,
            citation_order: None,
        })
        .unwrap();
    let ids: Vec<&str> = bibliography.entries.iter().map(|e| e.reference_id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["lecun2015", "meadows2008", "nguyen2019", "vaswani2017", "who2020"]
    );
}

#[test]
fn test_imported_entry_renders_in_apa() {
    let refs = library();
    let bibliography = CitationEngine::default()
        .format_bibliography(&BibliographyRequest {
            scope: "library",
            style: "apa7",
            references: &refs,
            citation_order: None,
        })
        .unwrap();
    let first = bibliography.entries[0].text.to_plain();
    assert!(first.starts_with(
        "LeCun, Y., Bengio, Y., & Hinton, G. (2015). Deep learning. Nature, 521(7553), 436–444."
    ));
    assert!(first.ends_with("https://doi.org/10.1038/nature14539"));
}

#[test]
fn test_numeric_style_follows_citation_order() {
    let refs = library();
    let order = vec!["who2020".to_string(), "lecun2015".to_string()];
    let engine = CitationEngine::default();
    let bibliography = engine
        .format_bibliography(&BibliographyRequest {
            scope: "library",
            style: "ieee",
            references: &refs,
            citation_order: Some(&order),
        })
        .unwrap();
    assert_eq!(bibliography.entries[0].reference_id, "who2020");
    assert_eq!(bibliography.entries[1].reference_id, "lecun2015");
    // Uncited entries follow alphabetically
    assert_eq!(bibliography.entries[2].reference_id, "meadows2008");

    let citation = engine
        .cite(&CiteRequest {
            scope: "library",
            style: "ieee",
            references: &refs,
            citation_order: Some(&order),
            items: &[CiteItem::new("lecun2015"), CiteItem::new("who2020")],
            note_number: None,
        })
        .unwrap();
    assert_eq!(citation.text, "[1, 2]");
}

#[test]
fn test_unknown_style_fails_only_that_call() {
    let refs = library();
    let engine = CitationEngine::default();
    let request = BibliographyRequest {
        scope: "library",
        style: "bluebook",
        references: &refs,
        citation_order: None,
    };
    assert!(engine.format_bibliography(&request).is_err());
    assert!(engine
        .format_bibliography(&BibliographyRequest {
            style: "apa7",
            ..request
        })
        .is_ok());
}

#[test]
fn test_footnote_style_returns_note() {
    let refs = library();
    let citation = CitationEngine::default()
        .cite(&CiteRequest {
            scope: "library",
            style: "chicago17",
            references: &refs,
            citation_order: None,
            items: &[CiteItem::new("meadows2008").with_locator("12")],
            note_number: Some(4),
        })
        .unwrap();
    assert!(!citation.text.is_empty());
}
